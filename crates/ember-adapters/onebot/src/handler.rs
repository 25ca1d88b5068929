//! The OneBot handler capability surface.
//!
//! A handler implements [`OneBotHandler`] and overrides only the capabilities
//! it cares about; every other one returns [`HandlerResult::Continue`] and
//! does nothing.
//!
//! ```rust,ignore
//! struct Echo;
//!
//! #[async_trait]
//! impl OneBotHandler for Echo {
//!     async fn on_private_message(
//!         &self,
//!         ctx: &BotContext,
//!         event: &PrivateMessageEvent,
//!     ) -> HandlerOutcome {
//!         let params = json!({ "user_id": event.user_id, "message": event.plain_text() });
//!         ctx.bot().call_api("send_private_msg", params).await?;
//!         Ok(HandlerResult::Block)
//!     }
//! }
//!
//! let registry = OneBotRegistry::new();
//! registry.install(Echo);
//! ```

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ember_core::{BotContext, HandlerId, HandlerOutcome, HandlerResult};
use ember_framework::{Dispatcher, FallbackHandler, HandlerRegistry};

use crate::model::*;

/// A registry of OneBot handlers.
pub type OneBotRegistry = HandlerRegistry<dyn OneBotHandler>;

/// A dispatcher over OneBot handlers.
pub type OneBotDispatcher = Dispatcher<dyn OneBotHandler>;

// ============================================================================
// Capabilities
// ============================================================================

/// One capability per taxonomy leaf.
///
/// Every capability receives the bot context and the typed event, and returns
/// whether the chain should go on. Returning `Err` aborts the remaining chain
/// for that event.
#[async_trait]
pub trait OneBotHandler: Send + Sync {
    /// A private message.
    async fn on_private_message(
        &self,
        _ctx: &BotContext,
        _event: &PrivateMessageEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A group message.
    async fn on_group_message(
        &self,
        _ctx: &BotContext,
        _event: &GroupMessageEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A file uploaded to a group.
    async fn on_group_upload(&self, _ctx: &BotContext, _event: &GroupUploadEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A group admin was set or unset.
    async fn on_group_admin(&self, _ctx: &BotContext, _event: &GroupAdminEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A member left or was removed from a group.
    async fn on_group_decrease(
        &self,
        _ctx: &BotContext,
        _event: &GroupDecreaseEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A member joined a group.
    async fn on_group_increase(
        &self,
        _ctx: &BotContext,
        _event: &GroupIncreaseEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A member was muted or unmuted.
    async fn on_group_ban(&self, _ctx: &BotContext, _event: &GroupBanEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A friend was added.
    async fn on_friend_add(&self, _ctx: &BotContext, _event: &FriendAddEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A group message was recalled.
    async fn on_group_recall(&self, _ctx: &BotContext, _event: &GroupRecallEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A private message was recalled.
    async fn on_friend_recall(
        &self,
        _ctx: &BotContext,
        _event: &FriendRecallEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A member's group card changed.
    async fn on_group_card(&self, _ctx: &BotContext, _event: &GroupCardEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// An offline file was received.
    async fn on_offline_file(&self, _ctx: &BotContext, _event: &OfflineFileEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A poke inside a group (`group_id > 0`).
    async fn on_group_poke(&self, _ctx: &BotContext, _event: &PokeEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A poke in a private conversation.
    async fn on_private_poke(&self, _ctx: &BotContext, _event: &PokeEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A red packet's lucky king was decided.
    async fn on_lucky_king(&self, _ctx: &BotContext, _event: &LuckyKingEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// A member's group honor changed.
    async fn on_honor(&self, _ctx: &BotContext, _event: &HonorEvent) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// Someone asked to become a friend.
    async fn on_friend_request(
        &self,
        _ctx: &BotContext,
        _event: &FriendRequestEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }

    /// Someone asked to join a group, or invited the bot.
    async fn on_group_request(
        &self,
        _ctx: &BotContext,
        _event: &GroupRequestEvent,
    ) -> HandlerOutcome {
        Ok(HandlerResult::Continue)
    }
}

// ============================================================================
// Default Handler
// ============================================================================

/// The handler substituted for ids that fail to resolve.
///
/// Every capability continues without side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl OneBotHandler for NoopHandler {}

static NOOP: LazyLock<Arc<dyn OneBotHandler>> = LazyLock::new(|| Arc::new(NoopHandler));

impl FallbackHandler for dyn OneBotHandler {
    fn fallback() -> Arc<Self> {
        Arc::clone(&NOOP)
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Registration shortcuts for [`OneBotRegistry`].
pub trait OneBotRegistryExt {
    /// Registers `handler` under its bare type name and returns that id.
    fn install<T: OneBotHandler + 'static>(&self, handler: T) -> HandlerId;
}

impl OneBotRegistryExt for OneBotRegistry {
    fn install<T: OneBotHandler + 'static>(&self, handler: T) -> HandlerId {
        let id = HandlerId::of::<T>();
        self.register(id.clone(), Arc::new(handler));
        id
    }
}
