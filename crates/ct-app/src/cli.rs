use std::path::PathBuf;

use clap::Parser;

use ct_core::config::GeneratorConfig;

/// chartab — Case conversion and legacy encoding table generator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml, ou les valeurs intégrées.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Chemin vers UnicodeData.txt (remplace la config).
    #[arg(long)]
    pub unicode_data: Option<PathBuf>,

    /// Chemin vers le dump UCSTables (remplace la config).
    #[arg(long)]
    pub ucs_tables: Option<PathBuf>,

    /// Dossier de sortie pour case_table.txt et encoding_tables.txt.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Largeur de tabulation pour l'alignement des colonnes.
    #[arg(long)]
    pub tab_width: Option<usize>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Apply command line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut GeneratorConfig) {
        if let Some(ref path) = self.unicode_data {
            config.unicode_data.clone_from(path);
        }
        if let Some(ref path) = self.ucs_tables {
            config.ucs_tables.clone_from(path);
        }
        if let Some(ref dir) = self.out_dir {
            config.set_output_dir(dir);
        }
        if let Some(width) = self.tab_width {
            config.tab_width = width;
        }
    }
}
