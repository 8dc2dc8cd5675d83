use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::encoding::EncodingSpec;
use crate::error::TableError;
use crate::tabulate::DEFAULT_TAB_WIDTH;

/// Complete generator configuration.
///
/// Serialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ct_core::config::GeneratorConfig;
/// let config = GeneratorConfig::default();
/// assert_eq!(config.tab_width, 8);
/// assert_eq!(config.encodings.len(), 16);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GeneratorConfig {
    // === Entrées ===
    /// UnicodeData.txt from the Unicode Character Database.
    pub unicode_data: PathBuf,
    /// UCSTables dump of the RISC OS encodings.
    pub ucs_tables: PathBuf,

    // === Sorties ===
    /// Destination of the case conversion table.
    pub case_output: PathBuf,
    /// Destination of the encoding tables.
    pub encoding_output: PathBuf,

    // === Format ===
    /// Tab stop used to align columns.
    pub tab_width: usize,
    /// UnicodeData version quoted in the case table header.
    pub unicode_version: String,
    /// Name of the generated case conversion array.
    pub case_struct_name: String,

    // === Encodages ===
    /// Encoding tables to generate, in output order.
    pub encodings: Vec<EncodingSpec>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            unicode_data: PathBuf::from("UnicodeData.txt"),
            ucs_tables: PathBuf::from("UCSTables"),
            case_output: PathBuf::from("case_table.txt"),
            encoding_output: PathBuf::from("encoding_tables.txt"),
            tab_width: DEFAULT_TAB_WIDTH,
            unicode_version: "17.0.0".to_string(),
            case_struct_name: "case_table".to_string(),
            encodings: default_encodings(),
        }
    }
}

impl GeneratorConfig {
    /// Check values that would produce unusable output.
    ///
    /// # Errors
    /// Returns [`TableError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.tab_width == 0 {
            return Err(TableError::Config("tab_width doit être >= 1".to_string()));
        }
        if self.case_struct_name.is_empty() {
            return Err(TableError::Config("case_struct_name vide".to_string()));
        }
        for (i, spec) in self.encodings.iter().enumerate() {
            if spec.source.is_empty() || spec.struct_name.is_empty() {
                return Err(TableError::Config(format!(
                    "encodage #{i} : source et struct_name sont requis"
                )));
            }
        }
        Ok(())
    }

    /// Resolve every output path relative to `dir`.
    pub fn set_output_dir(&mut self, dir: &Path) {
        self.case_output = dir.join(file_name_or(&self.case_output, "case_table.txt"));
        self.encoding_output =
            dir.join(file_name_or(&self.encoding_output, "encoding_tables.txt"));
    }
}

fn file_name_or(path: &Path, fallback: &str) -> PathBuf {
    path.file_name()
        .map_or_else(|| PathBuf::from(fallback), PathBuf::from)
}

/// The sixteen RISC OS encodings, in output order.
#[must_use]
pub fn default_encodings() -> Vec<EncodingSpec> {
    [
        ("Latin1", "encoding_acorn_latin1", "RISC OS Latin 1"),
        ("Latin2", "encoding_acorn_latin2", "RISC OS Latin 2"),
        ("Latin3", "encoding_acorn_latin3", "RISC OS Latin 3"),
        ("Latin4", "encoding_acorn_latin4", "RISC OS Latin 4"),
        ("Latin5", "encoding_acorn_latin5", "RISC OS Latin 5"),
        ("Latin6", "encoding_acorn_latin6", "RISC OS Latin 6"),
        ("Latin7", "encoding_acorn_latin7", "RISC OS Latin 7"),
        ("Latin8", "encoding_acorn_latin8", "RISC OS Latin 8"),
        ("Latin9", "encoding_acorn_latin9", "RISC OS Latin 9"),
        ("Latin10", "encoding_acorn_latin10", "RISC OS Latin 10"),
        ("Cyrillic", "encoding_acorn_cyrillic", "RISC OS Cyrillic"),
        ("Welsh", "encoding_acorn_welsh", "RISC OS Welsh"),
        ("Greek", "encoding_acorn_greek", "RISC OS Greek"),
        ("Hebrew", "encoding_acorn_hebrew", "RISC OS Hebrew"),
        ("Cyrillic2", "encoding_acorn_cyrillic2", "RISC OS Cyrillic 2"),
        ("Bfont", "encoding_acorn_bfont", "RISC OS BFont"),
    ]
    .into_iter()
    .map(|(source, struct_name, title)| EncodingSpec::new(source, struct_name, title))
    .collect()
}

/// Structure intermédiaire pour la désérialisation TOML.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    input: Option<InputSection>,
    #[serde(default)]
    output: Option<OutputSection>,
    #[serde(default)]
    format: Option<FormatSection>,
    #[serde(default)]
    encoding: Option<Vec<EncodingSpec>>,
}

/// Input section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct InputSection {
    unicode_data: Option<PathBuf>,
    ucs_tables: Option<PathBuf>,
}

/// Output section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct OutputSection {
    case_table: Option<PathBuf>,
    encoding_tables: Option<PathBuf>,
}

/// Format section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct FormatSection {
    tab_width: Option<usize>,
    unicode_version: Option<String>,
    case_struct_name: Option<String>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// Relative paths in the file are kept as written, i.e. relative to the
/// working directory.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or fails validation.
///
/// # Example
/// ```no_run
/// use ct_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Erreur de configuration dans {}", path.display()))
}

/// Parse TOML config text over the defaults.
///
/// # Errors
/// Returns an error if the TOML is malformed or fails validation.
pub fn parse_config(content: &str) -> Result<GeneratorConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = GeneratorConfig::default();

    if let Some(i) = file.input {
        if let Some(v) = i.unicode_data {
            config.unicode_data = v;
        }
        if let Some(v) = i.ucs_tables {
            config.ucs_tables = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.case_table {
            config.case_output = v;
        }
        if let Some(v) = o.encoding_tables {
            config.encoding_output = v;
        }
    }

    if let Some(f) = file.format {
        if let Some(v) = f.tab_width {
            config.tab_width = v;
        }
        if let Some(v) = f.unicode_version {
            config.unicode_version = v;
        }
        if let Some(v) = f.case_struct_name {
            config.case_struct_name = v;
        }
    }

    if let Some(v) = file.encoding {
        config.encodings = v;
    }

    config.validate()?;
    Ok(config)
}
