use std::io::Write;

use anyhow::Result;
use clap::Parser;
use ct_core::config::GeneratorConfig;

pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{:<8}{style:#} {}",
                record.level(),
                record.args()
            )
        })
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 4. Appliquer les overrides CLI
    cli.apply_overrides(&mut config);
    config.validate()?;

    // 5. Générer
    pipeline::run(&config)
}

/// Load `--config` if the file exists, otherwise fall back to the built-in defaults.
fn resolve_config(cli: &cli::Cli) -> Result<GeneratorConfig> {
    if cli.config.exists() {
        ct_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(GeneratorConfig::default())
    }
}
