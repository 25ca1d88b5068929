//! Capability selection.
//!
//! A protocol adapter defines one handler trait with one method per event
//! leaf. Rather than writing a chain walk per method, each typed event
//! implements [`Dispatchable`] for that trait: it names the method it selects
//! and knows how to call it. The [`Dispatcher`](crate::Dispatcher) then drives
//! every leaf through the same loop.
//!
//! ```rust,ignore
//! #[async_trait]
//! impl Dispatchable<dyn OneBotHandler> for TypedEvent {
//!     fn capability(&self) -> &'static str {
//!         "on_private_message"
//!     }
//!
//!     async fn invoke(&self, handler: &dyn OneBotHandler, ctx: &BotContext) -> HandlerOutcome {
//!         handler.on_private_message(ctx, &self.0).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use ember_core::{BotContext, HandlerOutcome};

/// A typed event that selects and invokes one capability on handlers of type `H`.
#[async_trait]
pub trait Dispatchable<H: ?Sized + Send + Sync>: Send + Sync {
    /// Name of the handler method this event selects.
    fn capability(&self) -> &'static str;

    /// Calls the selected method on `handler`.
    async fn invoke(&self, handler: &H, ctx: &BotContext) -> HandlerOutcome;
}
