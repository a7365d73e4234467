//! Configuration for the strata terrain core.
//!
//! Settings persist to disk as a RON file. Every struct deserializes with
//! `#[serde(default)]`, so partial or older files keep loading, and CLI flags
//! override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, StreamingConfig};
pub use error::ConfigError;
