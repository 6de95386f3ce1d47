//! Configuration file loading

use super::schema::ConfigSchema;
use crate::coalescer::CallCoalescer;
use crate::error::{Error, Result, ResultExt};
use spotfeed_geo::GridClusterer;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Candidate file names, checked in order
const CONFIG_CANDIDATES: [&str; 3] = [".spotfeed.toml", "spotfeed.toml", ".config/spotfeed.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or discover one in the
    /// current directory, or fall back to defaults.
    ///
    /// An explicit path that does not exist is an error; a missing
    /// discovered file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::config_not_found(p));
                }
                Self::from_file(p)
            }
            None => match find_config_file(Path::new(".")) {
                Some(found) => Self::from_file(&found),
                None => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load and validate a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let schema = load_config_file(path)?;
        let config = Self {
            schema,
            path: Some(path.to_path_buf()),
        };
        config.validate().context(format!("In {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let divisor = self.schema.clustering.grid_divisor;
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(Error::invalid_config_value(
                "clustering.grid_divisor",
                format!("grid_divisor must be a positive number, got {divisor}"),
            ));
        }
        if self.schema.coalescer.interval_ms == 0 {
            return Err(Error::invalid_config_value(
                "coalescer.interval_ms",
                "interval_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Clusterer built from `[clustering]`
    pub fn clusterer(&self) -> Result<GridClusterer> {
        Ok(GridClusterer::with_divisor(self.schema.clustering.grid_divisor)?)
    }

    /// Quiet interval from `[coalescer]`
    #[must_use]
    pub fn coalescer_interval(&self) -> Duration {
        Duration::from_millis(self.schema.coalescer.interval_ms)
    }

    /// A fresh coalescer using `[coalescer]`
    #[must_use]
    pub fn coalescer(&self) -> CallCoalescer {
        CallCoalescer::new(self.coalescer_interval())
    }
}

/// Find a configuration file under `dir`
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path.display(), e)).with_source(e))?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("Failed to parse config file {}", path.display()))
    })
}
