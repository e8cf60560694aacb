//! CLI subcommands.

pub mod config;
pub mod process;
pub mod report;

use std::path::PathBuf;

use tracing::debug;

use pricetrack_core::TrackerConfig;

/// The config file in effect: `-c/--config` if given, else the per-user default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path)
}

/// Load the configuration named on the command line, else the default file, else defaults.
///
/// A file named with `-c/--config` must exist; the default file is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TrackerConfig> {
    let path = config_file(config_path);
    if config_path.is_none() && !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(TrackerConfig::default());
    }

    debug!("Loading config from {}", path.display());
    TrackerConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path.display(), e))
}
