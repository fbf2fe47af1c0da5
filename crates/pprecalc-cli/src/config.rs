//! Config file lookup and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pprecalc::RecalcConfig;
use tracing::{info, warn};

use crate::cli::Args;

const CONFIG_FILE: &str = "config.toml";

/// Candidate config paths in lookup order
fn candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("pprecalc").join(CONFIG_FILE));
    }
    paths
}

fn load_file(explicit: Option<&Path>) -> Result<RecalcConfig> {
    for path in candidates(explicit) {
        match RecalcConfig::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Err(e) if e.is_not_found() => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to load {}", path.display()));
            }
        }
    }

    warn!("No config file found, using defaults");
    Ok(RecalcConfig::default())
}

/// Resolve the run configuration: file (or defaults), then flag overrides
pub fn resolve(args: &Args) -> Result<RecalcConfig> {
    let mut config = load_file(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut RecalcConfig, args: &Args) {
    if let Some(url) = &args.database_url {
        config.database.url = url.clone();
    }
    if let Some(threads) = args.threads {
        config.recalc.workers = threads;
    }
}
