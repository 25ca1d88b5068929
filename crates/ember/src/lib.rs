//! # Ember
//!
//! An inbound OneBot v11 event engine with ordered, blockable handler chains.
//!
//! ## Overview
//!
//! Every payload a bot receives goes through the same three steps:
//!
//! ```text
//! ┌──────────┐     ┌────────────┐     ┌──────────────┐     ┌────────────────────────────┐
//! │ raw JSON │────▶│ classifier │────▶│ deserializer │────▶│ dispatcher                 │
//! │          │     │ (leaf tag) │     │ (typed event)│     │ chain: A ─▶ B ─▶ C (Block?) │
//! └──────────┘     └────────────┘     └──────────────┘     └────────────────────────────┘
//! ```
//!
//! - **Classifier**: walks the `post_type` taxonomy down to one of the leaf kinds
//! - **Deserializer**: decodes the payload into that leaf's event struct
//! - **Registry**: maps handler ids to instances, with a no-op fallback
//! - **Dispatcher**: invokes the leaf's capability on each handler in the bot's
//!   chain until one returns `Block`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ember::prelude::*;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl OneBotHandler for Echo {
//!     async fn on_private_message(
//!         &self,
//!         ctx: &BotContext,
//!         event: &PrivateMessageEvent,
//!     ) -> HandlerOutcome {
//!         ctx.bot()
//!             .call_api("send_private_msg", json!({
//!                 "user_id": event.user_id,
//!                 "message": event.plain_text(),
//!             }))
//!             .await?;
//!         Ok(HandlerResult::Block)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = OneBotRegistry::new();
//!     registry.install(Echo);
//!
//!     let gateway = Gateway::new(EventPipeline::new(Arc::new(registry)));
//!     gateway.attach(bot, HandlerChain::new(["Echo"])).await?;
//!     gateway.handle_json("10001", &frame).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use ember_adapter_onebot as onebot;
pub use ember_core as core;
pub use ember_framework as framework;
pub use ember_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use ember::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use ember_runtime::{EmberConfig, Gateway, LoggingBuilder, RuntimeError};

    // Handlers and events
    pub use ember_adapter_onebot::prelude::*;

    // Bot types - for calling back into the bot from handlers
    pub use ember_core::{ApiError, ApiResult, Bot, BoxedBot};

    pub use serde_json::json;
}
