//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use spotfeed_geo::DEFAULT_GRID_DIVISOR;

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub coalescer: CoalescerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Map marker clustering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Grid cells across each viewport axis
    #[serde(default = "default_grid_divisor")]
    pub grid_divisor: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            grid_divisor: default_grid_divisor(),
        }
    }
}

fn default_grid_divisor() -> f64 {
    DEFAULT_GRID_DIVISOR
}

/// Input coalescing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoalescerConfig {
    /// Quiet interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    500
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
