//! Bot trait and related types.
//!
//! This module defines the [`Bot`] trait, the connection-facing half of a bot
//! session. The transport layer implements it; handlers receive it through a
//! [`BotContext`](super::BotContext) and use it to talk back to the protocol
//! implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type for API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The bot is not connected.
    #[error("bot is not connected")]
    NotConnected,
    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,
    /// The API returned an error.
    #[error("API error ({retcode}): {message}")]
    Failed {
        /// Protocol return code.
        retcode: i32,
        /// Message reported by the implementation.
        message: String,
    },
    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// The core Bot trait.
///
/// A Bot is one live connection to a protocol implementation. Ember never
/// creates bots itself; the transport does, and hands them to the runtime
/// together with the handler chain that should see their events.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Returns the bot's unique identifier (the OneBot `self_id`).
    fn id(&self) -> &str;

    /// Returns the name of the protocol adapter serving this bot.
    fn adapter_name(&self) -> &str;

    /// Calls a protocol API action with JSON parameters.
    async fn call_api(&self, action: &str, params: Value) -> ApiResult<Value>;
}

/// Shared, type-erased bot handle.
pub type BoxedBot = Arc<dyn Bot>;
