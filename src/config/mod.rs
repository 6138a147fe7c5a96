//! JSON configuration for the command-line tool.
pub mod classify;

pub use classify::{load_config, InputConfig, OutputConfig, RuntimeConfig};
