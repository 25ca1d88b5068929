//! Runtime error types.

use ember_core::{DispatchError, ResolutionError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No session is attached under this bot id, or no config entry exists.
    #[error("Bot not found: {0}")]
    UnknownBot(String),

    /// A session is already attached under this bot id.
    #[error("Bot already exists: {0}")]
    BotExists(String),

    /// The bot is disabled in configuration.
    #[error("Bot is disabled: {0}")]
    BotDisabled(String),

    /// Strict handler checking found ids in the chain that do not resolve.
    #[error(
        "Bot {bot} names {} unresolvable handler(s): {}",
        .handlers.len(),
        list_handlers(.handlers)
    )]
    UnresolvedHandlers {
        bot: String,
        handlers: Vec<ResolutionError>,
    },

    /// Dispatching an event failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn list_handlers(errors: &[ResolutionError]) -> String {
    errors
        .iter()
        .map(|err| err.handler().as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
