//! Core utilities for spotfeed map tools
//!
//! This crate provides shared functionality used by the map tooling and any
//! app embedding it:
//!
//! - **Call coalescing**: collapse bursty UI input into one delayed action
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use spotfeed_core::config::Config;
//! use spotfeed_geo::Viewport;
//!
//! let config = Config::load(None).expect("invalid config");
//! let clusterer = config.clusterer().expect("invalid grid divisor");
//!
//! let result = clusterer.cluster(&Viewport::new(52.5, 13.4, 0.1, 0.1), Vec::<spotfeed_geo::Marker>::new());
//! assert!(result.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod coalescer;
pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::coalescer::CallCoalescer;
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
