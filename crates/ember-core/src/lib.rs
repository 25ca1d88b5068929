//! # Ember Core
//!
//! The core types of the Ember event gateway.
//!
//! This crate holds everything the dispatch engine and its collaborators agree
//! on, without committing to a protocol:
//!
//! ## Foundation Layer
//!
//! - **Raw Events**: Immutable, order-preserving key/value trees ([`RawEvent`])
//! - **Handler Data**: Identifiers, chains and results ([`HandlerId`], [`HandlerChain`], [`HandlerResult`])
//! - **Errors**: The dispatch error taxonomy ([`DispatchError`] and friends)
//!
//! ## Integration Layer
//!
//! - **Bot Abstraction**: The connection-facing bot handle ([`Bot`])
//! - **Session Context**: A bot paired with its handler chain ([`BotContext`])
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌──────────────┐    ┌────────────┐
//! │ RawEvent │───▶│ Classifier │───▶│ Deserializer │───▶│ Dispatcher │──▶ handler chain
//! └──────────┘    └────────────┘    └──────────────┘    └────────────┘
//! ```
//!
//! The classifier, deserializer and dispatcher live in `ember-framework` and the
//! protocol adapters; this crate only defines what flows between them.

pub mod foundation;
pub mod integration;

pub use foundation::{
    DeserializationError, DispatchError, DispatchResult, EventError, HandlerChain,
    HandlerError, HandlerId, HandlerOutcome, HandlerResult, RawEvent, ResolutionError,
};
pub use integration::{ApiError, ApiResult, Bot, BotContext, BoxedBot};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::integration::{Bot, BotContext, BoxedBot};
}
