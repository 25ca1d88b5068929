//! Ember Runtime - configuration, logging and session management.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `EmberConfig`)
//! - Logging setup driven by that configuration (`LoggingBuilder`)
//! - The [`Gateway`], which attaches bots and routes their inbound events
//!   through the OneBot pipeline
//!
//! ```rust,ignore
//! use ember_adapter_onebot::{OneBotRegistry, OneBotRegistryExt};
//! use ember_runtime::{Gateway, config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let registry = OneBotRegistry::new();
//! registry.install(EchoHandler);
//!
//! let gateway = Gateway::from_config(&config, Arc::new(registry));
//! gateway.attach_configured(bot).await?;
//! gateway.handle_json(bot_id, &frame).await?;
//! ```
//!
//! Transports are not part of this crate: anything that can produce a bot id
//! and a JSON payload can drive a [`Gateway`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;

// Re-exports
pub use config::{BotConfig, ConfigError, ConfigLoader, ConfigResult, EmberConfig, Profile};
pub use error::{RuntimeError, RuntimeResult};
pub use gateway::Gateway;
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
