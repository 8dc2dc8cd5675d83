use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::names::title_case;
use crate::tabulate::Tabulator;
use crate::ucs_tables::{LegacyTable, UcsTables};
use crate::unicode_data::UnicodeData;

/// Bytes below this are plain ASCII in every encoding and are not written out.
const FIRST_RENDERED_BYTE: u8 = 0x80;

/// One legacy encoding to generate.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EncodingSpec {
    /// Table name in the UCSTables dump, e.g. `Latin1`.
    pub source: String,
    /// Name of the generated C array.
    pub struct_name: String,
    /// Human readable name for the header comment.
    pub title: String,
}

impl EncodingSpec {
    #[must_use]
    pub fn new(source: &str, struct_name: &str, title: &str) -> Self {
        Self {
            source: source.to_string(),
            struct_name: struct_name.to_string(),
            title: title.to_string(),
        }
    }
}

/// A codepoint and the byte that encodes it.
///
/// Ordering and equality only consider the codepoint.
#[derive(Clone, Debug)]
pub struct EncodingEntry {
    pub codepoint: u32,
    pub byte_value: u8,
    pub name: String,
}

impl PartialEq for EncodingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.codepoint == other.codepoint
    }
}

impl Eq for EncodingEntry {}

impl PartialOrd for EncodingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EncodingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.codepoint.cmp(&other.codepoint)
    }
}

/// Join a legacy table with the Unicode database.
///
/// Control bytes (0–31, 127) and unmapped bytes are left out. The result is
/// sorted by codepoint; bytes mapping to the same codepoint keep their
/// table order.
///
/// # Errors
/// Returns [`TableError::MissingCodepoint`] if the table maps a byte to a
/// codepoint absent from `unicode`.
pub fn build_encoding_table(
    unicode: &UnicodeData,
    table: &LegacyTable,
) -> Result<Vec<EncodingEntry>, TableError> {
    let mut entries = Vec::with_capacity(table.slots.len());

    for (byte_value, codepoint) in table.entries() {
        if byte_value < 32 || byte_value == 127 {
            continue;
        }
        let Some(codepoint) = codepoint else {
            continue;
        };

        let name = unicode
            .name_of(codepoint)
            .ok_or_else(|| TableError::MissingCodepoint {
                codepoint,
                byte: byte_value,
                table: table.name.clone(),
            })?;

        entries.push(EncodingEntry {
            codepoint,
            byte_value,
            name: name.to_string(),
        });
    }

    entries.sort();
    Ok(entries)
}

/// Render one `struct encoding_map` array into `tab`.
///
/// Nothing is added to `tab` if the table cannot be built.
///
/// # Errors
/// Returns [`TableError::UnknownTable`] if `spec.source` is not in `tables`,
/// or any error from [`build_encoding_table`].
///
/// # Example
/// ```
/// use ct_core::encoding::{EncodingSpec, write_encoding_table};
/// use ct_core::tabulate::Tabulator;
/// use ct_core::ucs_tables::parse_ucs_tables;
/// use ct_core::unicode_data::parse_unicode_data;
///
/// let unicode = parse_unicode_data(
///     "00E9;LATIN SMALL LETTER E WITH ACUTE;Ll;0;L;0065 0301;;;;N;;;00C9;;00C9\n".as_bytes(),
/// ).unwrap();
/// let mut src = String::from("Latin1\n");
/// for _ in 0..0xE9 { src.push_str("& &FFFFFFFF\n"); }
/// src.push_str("& &00E9\n");
/// let tables = parse_ucs_tables(src.as_bytes()).unwrap();
///
/// let mut tab = Tabulator::default();
/// let spec = EncodingSpec::new("Latin1", "encoding_latin1", "Latin 1");
/// write_encoding_table(&mut tab, &unicode, &tables, &spec).unwrap();
/// assert!(tab.render().contains("{233,\t'\\xe9'},\t// Latin Small Letter E With Acute"));
/// ```
pub fn write_encoding_table(
    tab: &mut Tabulator,
    unicode: &UnicodeData,
    tables: &UcsTables,
    spec: &EncodingSpec,
) -> Result<(), TableError> {
    let entries = build_encoding_table(unicode, tables.table(&spec.source)?)?;

    tab.add_space();
    tab.add_line("/**");
    tab.add_line(format!(" * UTF8 to {}", spec.title));
    tab.add_line(" */");
    tab.add_space();
    tab.add_line(format!("static struct encoding_map {}[] = {{", spec.struct_name));

    for entry in entries
        .iter()
        .filter(|e| e.byte_value >= FIRST_RENDERED_BYTE)
    {
        tab.add_row([
            String::new(),
            format!("{{{},", entry.codepoint),
            format!("'\\x{:02x}'}},", entry.byte_value),
            format!("// {}", title_case(&entry.name)),
        ]);
    }

    tab.add_row(["", "{0,", "'\\0'}", "// End of Table"]);
    tab.add_line("};");

    log::info!("Table d'encodage {} générée.", spec.source);
    Ok(())
}
