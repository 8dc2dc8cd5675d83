use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TableError;

/// Value used in the dump for a byte with no Unicode mapping.
pub const UNMAPPED: u32 = 0xFFFF_FFFF;

/// Number of byte values in an 8-bit encoding.
pub const TABLE_SIZE: usize = 256;

/// A named byte → codepoint table from the legacy encoding dump.
///
/// `slots[b]` is the codepoint for byte `b`, `None` if the byte is unmapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTable {
    pub name: String,
    pub slots: Vec<Option<u32>>,
}

impl LegacyTable {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::with_capacity(TABLE_SIZE),
        }
    }

    /// `(byte, codepoint)` pairs for every slot, unmapped ones included.
    pub fn entries(&self) -> impl Iterator<Item = (u8, Option<u32>)> + '_ {
        self.slots
            .iter()
            .take(TABLE_SIZE)
            .enumerate()
            .map(|(byte, &cp)| (byte as u8, cp))
    }

    fn push(&mut self, value: u32) {
        if self.slots.len() == TABLE_SIZE {
            log::warn!("Table {} : valeur &{value:X} au-delà de 256 octets ignorée", self.name);
            return;
        }
        self.slots.push((value != UNMAPPED).then_some(value));
    }
}

/// All legacy tables of a dump, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct UcsTables {
    tables: BTreeMap<String, LegacyTable>,
}

impl UcsTables {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LegacyTable> {
        self.tables.get(name)
    }

    /// Like [`UcsTables::get`], but a missing table is an error.
    ///
    /// # Errors
    /// Returns [`TableError::UnknownTable`] if no table has this name.
    pub fn table(&self, name: &str) -> Result<&LegacyTable, TableError> {
        self.get(name)
            .ok_or_else(|| TableError::UnknownTable(name.to_string()))
    }

    /// Table names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn insert(&mut self, table: LegacyTable) {
        if self.tables.contains_key(&table.name) {
            log::warn!("Table {} redéfinie dans UCSTables", table.name);
        }
        self.tables.insert(table.name.clone(), table);
    }
}

/// Parse the assembly-style UCSTables dump.
///
/// Table name lines start a new table. `& &XXXX,&XXXX,...` lines append to
/// the current one. Comments (`;`) and conditional markers (`[`, `]`) are
/// skipped. Malformed data is logged and skipped.
///
/// # Errors
/// Returns [`TableError::Read`] if the reader fails.
///
/// # Example
/// ```
/// use ct_core::ucs_tables::parse_ucs_tables;
/// let src = "; Latin 1\nLatin1\n        & &0000,&0001,&FFFFFFFF\n";
/// let tables = parse_ucs_tables(src.as_bytes()).unwrap();
/// assert_eq!(tables.get("Latin1").unwrap().slots, vec![Some(0), Some(1), None]);
/// ```
pub fn parse_ucs_tables<R: BufRead>(reader: R) -> Result<UcsTables, TableError> {
    let mut tables = UcsTables::default();
    let mut current: Option<LegacyTable> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        // Vides, commentaires, conditionnelles ASM
        if line.is_empty() || line.starts_with([';', '[', ']']) {
            continue;
        }

        if line.starts_with('&') {
            let Some(table) = current.as_mut() else {
                continue;
            };
            let Some(data) = line.strip_prefix("& ") else {
                log::warn!("Ligne UCSTables inattendue '{line}'");
                continue;
            };
            parse_data_line(table, data);
        } else {
            if let Some(done) = current.take() {
                tables.insert(done);
            }
            current = Some(LegacyTable::new(line));
        }
    }

    if let Some(done) = current {
        tables.insert(done);
    }

    Ok(tables)
}

/// Open and parse a UCSTables file.
///
/// # Errors
/// Returns [`TableError::Open`] if the file cannot be opened, or
/// [`TableError::Read`] if reading fails.
pub fn load_ucs_tables(path: &Path) -> Result<UcsTables, TableError> {
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ucs_tables(BufReader::new(file))
}

fn parse_data_line(table: &mut LegacyTable, data: &str) {
    for field in data.split(',').map(str::trim) {
        let Some(hex) = field.strip_prefix('&') else {
            log::warn!("Champ inattendu '{field}' dans UCSTables");
            continue;
        };
        match u32::from_str_radix(hex, 16) {
            Ok(value) => table.push(value),
            Err(e) => log::warn!("Champ '{field}' illisible dans UCSTables : {e}"),
        }
    }
}
