//! Configuration loading and schema definitions
//!
//! Settings shared by the CLI and any embedding app: grid divisor, coalescing
//! interval and logging.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
