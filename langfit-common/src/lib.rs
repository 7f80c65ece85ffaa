//! # LangFit Common Library
//!
//! Shared code for the LangFit crates:
//! - Error type and `Result` alias
//! - TOML configuration (engine tuning, logging, data file overrides)
//! - Configuration file resolution

pub mod config;
pub mod error;

pub use config::{
    CategoryWeights, ConfigResolver, ConfigSource, EngineConfig, LoggingConfig, TomlConfig,
};
pub use error::{Error, Result};
