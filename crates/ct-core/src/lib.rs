/// Parsing, cross-referencing and rendering of character tables for chartab.
///
/// This crate turns the Unicode Character Database and the RISC OS UCS
/// tables into C array literals: a case conversion table and one
/// byte ↔ codepoint map per legacy encoding.

pub mod case;
pub mod config;
pub mod encoding;
pub mod error;
pub mod names;
pub mod tabulate;
pub mod ucs_tables;
pub mod unicode_data;

pub use case::{CaseEntry, build_case_table, write_case_table};
pub use config::GeneratorConfig;
pub use encoding::{EncodingEntry, EncodingSpec, build_encoding_table, write_encoding_table};
pub use error::TableError;
pub use tabulate::Tabulator;
pub use ucs_tables::{LegacyTable, UcsTables, load_ucs_tables};
pub use unicode_data::{CodePoint, UnicodeData, load_unicode_data};
