use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use casebook_cli::args::Cli;
use casebook_cli::{commands, logging};
use casebook_core::config::LoggingConfig;
use casebook_core::{load_config, load_config_from_env, validate_config, Config};

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "casebook.toml";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&LoggingConfig::default());
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging);
    info!(manifest = %config.catalog.manifest.display(), "Configuration loaded");

    if let Err(e) = commands::run(cli, config).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn load(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to load config from environment")?,
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}
