use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TableError;

/// Number of `;`-separated fields in a UnicodeData.txt record.
const FIELD_COUNT: usize = 15;

const FIELD_CODEPOINT: usize = 0;
const FIELD_NAME: usize = 1;
const FIELD_UPPER: usize = 12;
const FIELD_LOWER: usize = 13;
const FIELD_TITLE: usize = 14;

/// One record of the Unicode Character Database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodePoint {
    /// Scalar value of the character.
    pub codepoint: u32,
    /// Character name, `None` when the field is empty.
    pub name: Option<String>,
    /// Simple uppercase mapping.
    pub upper_case: Option<u32>,
    /// Simple lowercase mapping.
    pub lower_case: Option<u32>,
    /// Simple titlecase mapping.
    pub title_case: Option<u32>,
}

impl CodePoint {
    /// `true` if any of the three case mappings is present.
    #[must_use]
    pub fn has_case_mapping(&self) -> bool {
        self.upper_case.is_some() || self.lower_case.is_some() || self.title_case.is_some()
    }
}

/// The Unicode Character Database, keyed by codepoint.
///
/// Iteration is always in ascending codepoint order.
#[derive(Clone, Debug, Default)]
pub struct UnicodeData {
    characters: BTreeMap<u32, CodePoint>,
}

impl UnicodeData {
    /// Insert a record, replacing any earlier record with the same codepoint.
    pub fn insert(&mut self, character: CodePoint) {
        if let Some(previous) = self.characters.insert(character.codepoint, character) {
            log::debug!("U+{:04X} redéfini dans UnicodeData", previous.codepoint);
        }
    }

    #[must_use]
    pub fn get(&self, codepoint: u32) -> Option<&CodePoint> {
        self.characters.get(&codepoint)
    }

    /// Name of a known codepoint. Unnamed records yield an empty string.
    #[must_use]
    pub fn name_of(&self, codepoint: u32) -> Option<&str> {
        self.get(codepoint)
            .map(|c| c.name.as_deref().unwrap_or_default())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Records in ascending codepoint order.
    pub fn iter(&self) -> btree_map::Values<'_, u32, CodePoint> {
        self.characters.values()
    }
}

impl FromIterator<CodePoint> for UnicodeData {
    fn from_iter<I: IntoIterator<Item = CodePoint>>(iter: I) -> Self {
        let mut data = Self::default();
        for character in iter {
            data.insert(character);
        }
        data
    }
}

/// Parse UnicodeData.txt content.
///
/// Lines that do not split into exactly 15 fields are ignored.
///
/// # Errors
/// Returns [`TableError::Read`] if the reader fails.
///
/// # Example
/// ```
/// use ct_core::unicode_data::parse_unicode_data;
/// let src = "0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041\n";
/// let data = parse_unicode_data(src.as_bytes()).unwrap();
/// assert_eq!(data.get(0x61).unwrap().upper_case, Some(0x41));
/// ```
pub fn parse_unicode_data<R: BufRead>(reader: R) -> Result<UnicodeData, TableError> {
    let mut data = UnicodeData::default();

    for line in reader.lines() {
        let line = line?;
        if let Some(character) = parse_record(line.trim_end()) {
            data.insert(character);
        }
    }

    Ok(data)
}

/// Open and parse a UnicodeData.txt file.
///
/// # Errors
/// Returns [`TableError::Open`] if the file cannot be opened, or
/// [`TableError::Read`] if reading fails.
pub fn load_unicode_data(path: &Path) -> Result<UnicodeData, TableError> {
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_unicode_data(BufReader::new(file))
}

/// Parse a single record. Format: https://www.unicode.org/L2/L1999/UnicodeData.html
fn parse_record(line: &str) -> Option<CodePoint> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }

    let Ok(codepoint) = parse_hex(fields[FIELD_CODEPOINT]) else {
        log::warn!("Codepoint invalide dans UnicodeData : '{line}'");
        return None;
    };
    let Some(codepoint) = codepoint else {
        log::debug!("Ligne UnicodeData sans codepoint ignorée : '{line}'");
        return None;
    };

    let mappings = (
        parse_hex(fields[FIELD_UPPER]),
        parse_hex(fields[FIELD_LOWER]),
        parse_hex(fields[FIELD_TITLE]),
    );
    let (Ok(upper_case), Ok(lower_case), Ok(title_case)) = mappings else {
        log::warn!("Mapping de casse invalide pour U+{codepoint:04X} : '{line}'");
        return None;
    };

    let name = fields[FIELD_NAME];
    Some(CodePoint {
        codepoint,
        name: (!name.is_empty()).then(|| name.to_string()),
        upper_case,
        lower_case,
        title_case,
    })
}

/// Empty → `Ok(None)`, otherwise the hex value.
fn parse_hex(field: &str) -> Result<Option<u32>, std::num::ParseIntError> {
    if field.is_empty() {
        return Ok(None);
    }
    u32::from_str_radix(field, 16).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPITAL_A: &str = "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;";
    const SMALL_A: &str = "0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041";
    const DZ: &str = "01C5;LATIN CAPITAL LETTER D WITH SMALL LETTER Z WITH CARON;Lt;0;L;<compat> 0044 017E;;;;N;LATIN LETTER CAPITAL D SMALL Z HACEK;;01C4;01C6;01C5";

    fn parse(src: &str) -> UnicodeData {
        parse_unicode_data(src.as_bytes()).unwrap()
    }

    #[test]
    fn parses_lower_only_record() {
        let data = parse(CAPITAL_A);
        let a = data.get(0x41).unwrap();
        assert_eq!(
            *a,
            CodePoint {
                codepoint: 0x41,
                name: Some("LATIN CAPITAL LETTER A".to_string()),
                upper_case: None,
                lower_case: Some(0x61),
                title_case: None,
            }
        );
        assert!(a.has_case_mapping());
    }

    #[test]
    fn parses_all_case_fields() {
        let data = parse(DZ);
        let dz = data.get(0x1C5).unwrap();
        assert_eq!(dz.upper_case, Some(0x1C4));
        assert_eq!(dz.lower_case, Some(0x1C6));
        assert_eq!(dz.title_case, Some(0x1C5));
    }

    #[test]
    fn hex_fields_round_trip() {
        let data = parse(&format!("{CAPITAL_A}\n{SMALL_A}\n{DZ}\n"));
        for line in [CAPITAL_A, SMALL_A, DZ] {
            let fields: Vec<&str> = line.split(';').collect();
            let cp = data.get(u32::from_str_radix(fields[0], 16).unwrap()).unwrap();
            let render = |v: Option<u32>| v.map(|v| format!("{v:04X}")).unwrap_or_default();
            assert_eq!(format!("{:04X}", cp.codepoint), fields[0]);
            assert_eq!(render(cp.upper_case), fields[12]);
            assert_eq!(render(cp.lower_case), fields[13]);
            assert_eq!(render(cp.title_case), fields[14]);
        }
    }

    #[test]
    fn skips_lines_without_fifteen_fields() {
        let src = "0041;LATIN CAPITAL LETTER A;Lu\n\
                   # comment\n\
                   \n\
                   0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;;extra\n\
                   0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041\n";
        let data = parse(src);
        assert_eq!(data.len(), 1);
        assert!(data.get(0x61).is_some());
    }

    #[test]
    fn skips_record_without_codepoint() {
        let data = parse(";NO CODEPOINT;Lu;0;L;;;;;N;;;;0061;");
        assert!(data.is_empty());
    }

    #[test]
    fn skips_record_with_bad_hex() {
        let data = parse(&format!("00ZZ;BROKEN;Lu;0;L;;;;;N;;;;0061;\n{SMALL_A}"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn empty_name_is_absent() {
        let data = parse("0000;;Cc;0;BN;;;;;N;;;;;");
        assert_eq!(data.get(0).unwrap().name, None);
        assert_eq!(data.name_of(0), Some(""));
    }

    #[test]
    fn later_duplicate_overwrites() {
        let src = format!("{CAPITAL_A}\n0041;SECOND A;Lu;0;L;;;;;N;;;;;");
        let data = parse(&src);
        assert_eq!(data.len(), 1);
        assert_eq!(data.name_of(0x41), Some("SECOND A"));
    }

    #[test]
    fn iterates_in_codepoint_order() {
        let data = parse(&format!("{SMALL_A}\n{DZ}\n{CAPITAL_A}\n"));
        let order: Vec<u32> = data.iter().map(|c| c.codepoint).collect();
        assert_eq!(order, vec![0x41, 0x61, 0x1C5]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_unicode_data(&dir.path().join("UnicodeData.txt")).unwrap_err();
        assert!(matches!(err, TableError::Open { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UnicodeData.txt");
        std::fs::write(&path, format!("{CAPITAL_A}\r\n{SMALL_A}\r\n")).unwrap();
        let data = load_unicode_data(&path).unwrap();
        assert_eq!(data.len(), 2);
    }
}
