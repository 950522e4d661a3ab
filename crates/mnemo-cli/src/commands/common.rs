//! Shared helpers for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mnemo_nm::AnalysisConfig;
use tracing::debug;

/// Return the default mnemo config path (~/.mnemo/config.yaml).
pub fn default_config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".mnemo").join("config.yaml"))
}

/// Load the analysis config.
///
/// An explicit path must exist. Without one, the default path is used if
/// present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&str>) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        return AnalysisConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"));
    }

    let path = default_config_path()?;
    if path.exists() {
        debug!(path = %path.display(), "using default config file");
        AnalysisConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        debug!("no config file, using defaults");
        Ok(AnalysisConfig::default())
    }
}
