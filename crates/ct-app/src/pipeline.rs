use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ct_core::config::GeneratorConfig;
use ct_core::tabulate::Tabulator;
use ct_core::ucs_tables::UcsTables;
use ct_core::unicode_data::UnicodeData;
use ct_core::{load_ucs_tables, load_unicode_data, write_case_table, write_encoding_table};
use tempfile::NamedTempFile;

/// Run every generation stage.
///
/// A missing UnicodeData file stops the run immediately. Other stages fail
/// independently: the case table is still written if the UCS tables cannot
/// be loaded, and the other way round.
///
/// # Errors
/// Returns an error naming the stages that failed.
pub fn run(config: &GeneratorConfig) -> Result<()> {
    let mut failed: Vec<&str> = Vec::new();
    let mut tab = Tabulator::new(config.tab_width);

    // 1. UnicodeData (fatal)
    let unicode = load_unicode_data(&config.unicode_data).inspect_err(|e| {
        log::error!("Échec du chargement de UnicodeData : {e}");
    })?;
    log::info!("UnicodeData chargé ({} codepoints).", unicode.len());

    // 2. Table de casse
    if let Err(e) = case_stage(&mut tab, config, &unicode) {
        log::error!("Échec de l'écriture de la table de casse : {e:#}");
        failed.push("table de casse");
    }

    // 3. UCSTables + tables d'encodage
    match load_ucs_tables(&config.ucs_tables) {
        Ok(tables) => {
            log::info!("UCSTables chargé ({} tables).", tables.len());
            if let Err(e) = encoding_stage(&mut tab, config, &unicode, &tables) {
                log::error!("Échec de la génération des tables d'encodage : {e:#}");
                failed.push("tables d'encodage");
            }
        }
        Err(e) => {
            log::error!("Échec du chargement de UCSTables : {e}");
            failed.push("UCSTables");
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Étapes en échec : {}", failed.join(", "));
    }
    Ok(())
}

fn case_stage(
    tab: &mut Tabulator,
    config: &GeneratorConfig,
    unicode: &UnicodeData,
) -> Result<()> {
    tab.clear();
    write_case_table(tab, unicode, &config.case_struct_name, &config.unicode_version);
    commit(&config.case_output, tab)?;
    log::info!("Table de casse écrite dans {}.", config.case_output.display());
    Ok(())
}

fn encoding_stage(
    tab: &mut Tabulator,
    config: &GeneratorConfig,
    unicode: &UnicodeData,
    tables: &UcsTables,
) -> Result<()> {
    tab.clear();
    for spec in &config.encodings {
        write_encoding_table(tab, unicode, tables, spec)
            .with_context(|| format!("table {}", spec.source))?;
    }
    commit(&config.encoding_output, tab)?;
    log::info!(
        "Tables d'encodage écrites dans {}.",
        config.encoding_output.display()
    );
    Ok(())
}

/// Write the tabulator contents to `path`.
///
/// The text goes to a temporary file in the same directory which then
/// replaces `path`, so a failed write leaves any previous file intact.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file cannot
/// be written or renamed.
pub fn commit(path: &Path, tab: &Tabulator) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Impossible de créer {}", dir.display()))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Impossible de créer un fichier dans {}", dir.display()))?;
    file.write_all(tab.render().as_bytes())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Impossible de remplacer {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::encoding::EncodingSpec;
    use std::fmt::Write as _;
    use std::path::PathBuf;

    const UNICODE_DATA: &str = "\
0020;SPACE;Zs;0;WS;;;;;N;;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
00A0;NO-BREAK SPACE;Zs;0;CS;<noBreak> 0020;;;;N;NON-BREAKING SPACE;;;;
00C0;LATIN CAPITAL LETTER A WITH GRAVE;Lu;0;L;0041 0300;;;;N;LATIN CAPITAL LETTER A GRAVE;;;00E0;
00E0;LATIN SMALL LETTER A WITH GRAVE;Ll;0;L;0061 0300;;;;N;LATIN SMALL LETTER A GRAVE;;00C0;;00C0
20AC;EURO SIGN;Sc;0;ET;;;;;N;;;;;
";

    /// Table with bytes 0x20/0x41/0x61/0xA0/0xC0/0xE0 as in Latin 1, 0x80 as the euro,
    /// plus 0xC1 → U+0041 and 0x60 → U+00A0 where byte and codepoint disagree on ASCII.
    fn ucs_tables(name: &str, extra: Option<(usize, u32)>) -> String {
        let mut slots = vec![0xFFFF_FFFFu32; 256];
        for b in [0x20, 0x41, 0x61, 0xA0, 0xC0, 0xE0] {
            slots[b] = b as u32;
        }
        slots[0x80] = 0x20AC;
        slots[0xC1] = 0x41;
        slots[0x60] = 0xA0;
        if let Some((b, cp)) = extra {
            slots[b] = cp;
        }

        let mut out = format!("; generated\n{name}\n");
        for chunk in slots.chunks(16) {
            let fields: Vec<String> = chunk.iter().map(|v| format!("&{v:X}")).collect();
            let _ = writeln!(out, "        & {}", fields.join(","));
        }
        out
    }

    fn setup(ucs: Option<&str>) -> (tempfile::TempDir, GeneratorConfig) {
        let dir = tempfile::tempdir().unwrap();
        let unicode = dir.path().join("UnicodeData.txt");
        std::fs::write(&unicode, UNICODE_DATA).unwrap();
        let tables = dir.path().join("UCSTables");
        if let Some(src) = ucs {
            std::fs::write(&tables, src).unwrap();
        }

        let mut config = GeneratorConfig {
            unicode_data: unicode,
            ucs_tables: tables,
            encodings: vec![EncodingSpec::new("Latin1", "encoding_acorn_latin1", "RISC OS Latin 1")],
            ..GeneratorConfig::default()
        };
        config.set_output_dir(&dir.path().join("out"));
        (dir, config)
    }

    #[test]
    fn writes_both_outputs() {
        let (_dir, config) = setup(Some(&ucs_tables("Latin1", None)));
        run(&config).unwrap();

        let case = std::fs::read_to_string(&config.case_output).unwrap();
        assert!(case.starts_with("/**\n"));
        assert!(case.contains("\t{0x41,\t0x0,\t0x61,\t0x0},\t// Latin Capital Letter A\n"));
        assert!(case.contains("\t{0xe0,\t0xc0,\t0x0,\t0xc0},\t// Latin Small Letter A With Grave\n"));
        assert!(!case.contains("Space"));
        assert!(case.ends_with("\t{-1,\t0x0,\t0x0,\t0x0}\t// End of Table\n};\n"));

        let enc = std::fs::read_to_string(&config.encoding_output).unwrap();
        let rows: Vec<&str> = enc.lines().filter(|l| l.starts_with('\t')).collect();
        assert_eq!(
            rows,
            vec![
                "\t{65,\t'\\xc1'},\t// Latin Capital Letter A",
                "\t{160,\t'\\xa0'},\t// No-Break Space",
                "\t{192,\t'\\xc0'},\t// Latin Capital Letter A With Grave",
                "\t{224,\t'\\xe0'},\t// Latin Small Letter A With Grave",
                "\t{8364,\t'\\x80'},\t// Euro Sign",
                "\t{0,\t'\\0'}\t\t// End of Table",
            ]
        );
    }

    #[test]
    fn missing_codepoint_aborts_only_encoding_stage() {
        let (_dir, config) = setup(Some(&ucs_tables("Latin1", Some((0xFF, 0x00FF)))));
        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("tables d'encodage"));
        assert!(config.case_output.exists());
        assert!(!config.encoding_output.exists());
    }

    #[test]
    fn unknown_table_aborts_encoding_stage() {
        let (_dir, config) = setup(Some(&ucs_tables("Latin2", None)));
        assert!(run(&config).is_err());
        assert!(config.case_output.exists());
        assert!(!config.encoding_output.exists());
    }

    #[test]
    fn missing_ucs_tables_still_writes_case_table() {
        let (_dir, config) = setup(None);
        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("UCSTables"));
        assert!(config.case_output.exists());
        assert!(!config.encoding_output.exists());
    }

    #[test]
    fn missing_unicode_data_is_fatal() {
        let (dir, mut config) = setup(Some(&ucs_tables("Latin1", None)));
        config.unicode_data = dir.path().join("absent.txt");
        assert!(run(&config).is_err());
        assert!(!config.case_output.exists());
        assert!(!config.encoding_output.exists());
    }

    #[test]
    fn commit_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("table.txt");
        std::fs::write(&path, "old contents\n").unwrap();

        let mut tab = Tabulator::default();
        tab.add_line("new");
        commit(&path, &tab).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }
}
