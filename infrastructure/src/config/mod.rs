//! Configuration file loading for mock-trial
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MOCK_TRIAL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./trial.toml` or `./.trial.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mock-trial/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBatchConfig, FileConfig, FileHearingConfig, FileMemoryConfig, FileModelsConfig,
    FileOutputConfig, FileProviderConfig, FileRetrievalConfig,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
