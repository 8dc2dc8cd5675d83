use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from table loading and generation.
#[derive(Error, Debug)]
pub enum TableError {
    /// A source file could not be opened.
    #[error("Impossible d'ouvrir {}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source stream failed part way through.
    #[error("Erreur de lecture : {source}")]
    Read {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A legacy table maps a byte to a codepoint the Unicode database does not know.
    #[error("Codepoint U+{codepoint:04X} (octet {byte:#04x} de {table}) absent de UnicodeData")]
    MissingCodepoint {
        /// The unknown codepoint.
        codepoint: u32,
        /// Byte value that referenced it.
        byte: u8,
        /// Name of the legacy table.
        table: String,
    },

    /// No legacy table with this name was loaded.
    #[error("Table d'encodage inconnue : {0}")]
    UnknownTable(String),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
