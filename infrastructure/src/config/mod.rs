//! Configuration file loading for thecamp
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `THECAMP_*` environment variables (`THECAMP_HTTP__TIMEOUT_SECS=10`)
//! 2. Explicitly specified file
//! 3. Project root: `./thecamp.toml` or `./.thecamp.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/thecamp/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileConfig, FileHttpConfig, FileLettersConfig};
pub use loader::ConfigLoader;
