//! Configuration module for the Ember runtime.
//!
//! This module provides layered configuration loading (files, environment,
//! programmatic overrides) and validation for logging, dispatch behavior and
//! the per-bot handler chains.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotConfig, DispatchConfig, EmberConfig, LogFormat, LogLevel, LogOutput, LogRotation,
    LoggingConfig, SpanEventConfig,
};
pub use validation::validate_config;
