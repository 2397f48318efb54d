//! stylekit: command-line front end for the CSS sanitizer, token
//! registry, revision history, and preset library.

mod cli;
mod commands;
mod host;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use stylekit_common::{JsonFileStore, StyleKitError};
use stylekit_config::StyleKitConfig;
use stylekit_tokens::StyleService;

use crate::commands::Runner;
use crate::host::{EnvIdentity, LogInvalidator};

fn init_logging(directive: &str, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn store_path(args: &cli::Args, config: &StyleKitConfig) -> Result<PathBuf, StyleKitError> {
    if let Some(path) = args.store.clone().or_else(|| config.store.path.clone()) {
        return Ok(path);
    }
    Ok(stylekit_config::default_store_path()?)
}

fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = match args.config {
        Some(ref path) => stylekit_config::load_config_from(path),
        None => stylekit_config::load_config(),
    };
    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level)
        .unwrap_or_default();
    let json_logs = loaded.as_ref().map(|c| c.logging.json).unwrap_or(false);
    init_logging(
        args.log_level.as_deref().unwrap_or(config_level.as_filter()),
        json_logs,
    );

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        StyleKitConfig::default()
    });

    let path = match store_path(&args, &config) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let store = match JsonFileStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(path = %path.display(), "option store opened");

    let service = StyleService::from_config(store, &config)
        .with_invalidator(Arc::new(LogInvalidator))
        .with_identity(Arc::new(EnvIdentity));

    let runner = Runner {
        service: &service,
        config: &config,
        config_path: args.config.as_deref(),
    };
    let mut stdout = std::io::stdout().lock();
    match runner.run(args.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
