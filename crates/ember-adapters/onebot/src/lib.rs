//! # Ember Adapter for OneBot v11
//!
//! Everything OneBot-specific about the inbound event path.
//!
//! ## Overview
//!
//! - [`taxonomy`]: the fixed discriminator tree of recognized event shapes
//! - [`classify`]: raw event → [`LeafTag`], total, never fails
//! - [`model`]: one serde struct per leaf
//! - [`TypedEvent`]: the closed set of leaves, dispatchable to [`OneBotHandler`]
//! - [`EventDeserializer`]: pluggable raw → typed conversion ([`SerdeDeserializer`] by default)
//! - [`EventPipeline`]: classify → deserialize → dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ember_adapter_onebot::prelude::*;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl OneBotHandler for Echo {
//!     async fn on_group_message(&self, ctx: &BotContext, event: &GroupMessageEvent) -> HandlerOutcome {
//!         println!("[{}] {}", event.group_id, event.plain_text());
//!         Ok(HandlerResult::Continue)
//!     }
//! }
//!
//! let registry = OneBotRegistry::new();
//! let echo = registry.install(Echo);
//! let pipeline = EventPipeline::new(Arc::new(registry));
//!
//! let ctx = BotContext::new(bot, HandlerChain::new([echo]));
//! pipeline.handle_json(&ctx, &payload).await?;
//! ```
//!
//! ## Event Taxonomy
//!
//! ```text
//! post_type
//! ├── message  { private, group }
//! ├── notice   { group_upload, group_admin, group_decrease, group_increase, group_ban,
//! │              friend_add, group_recall, friend_recall, group_card, offline_file,
//! │              notify { poke (group | private), lucky_king, honor } }
//! ├── request  { friend, group }
//! └── meta_event → unhandled
//! ```

pub mod classifier;
pub mod deserializer;
pub mod event;
pub mod handler;
pub mod model;
pub mod pipeline;
pub mod taxonomy;

pub use classifier::{Classification, ClassificationMiss, Discriminant, classify};
pub use deserializer::{EventDeserializer, SerdeDeserializer};
pub use event::TypedEvent;
pub use handler::{
    NoopHandler, OneBotDispatcher, OneBotHandler, OneBotRegistry, OneBotRegistryExt,
};
pub use model::OneBotEvent;
pub use pipeline::EventPipeline;
pub use taxonomy::LeafTag;

/// Prelude for writing OneBot handlers.
pub mod prelude {
    pub use super::model::*;
    pub use super::{
        EventPipeline, LeafTag, OneBotEvent, OneBotHandler, OneBotRegistry, OneBotRegistryExt,
        TypedEvent,
    };
    pub use async_trait::async_trait;
    pub use ember_core::{BotContext, HandlerChain, HandlerId, HandlerOutcome, HandlerResult};
    pub use ember_framework::DispatchOutcome;
    pub use std::sync::Arc;
}
