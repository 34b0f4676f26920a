pub mod detect;
pub mod formats;
pub mod parse;

use auszug_core::config::{load_config, EngineConfig};
use auszug_core::error::AuszugError;
use std::path::Path;

/// Config from `--config`, or the defaults.
pub fn engine_config(path: Option<&Path>) -> Result<EngineConfig, AuszugError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(EngineConfig::default()),
    }
}
