//! Per-bot dispatch context.

use std::fmt;

use super::bot::BoxedBot;
use crate::foundation::handler::HandlerChain;

/// A bot paired with the handler chain that processes its events.
///
/// The dispatcher borrows this for the duration of one dispatch and never
/// mutates it. Cloning is cheap: both halves are reference-counted.
#[derive(Clone)]
pub struct BotContext {
    bot: BoxedBot,
    chain: HandlerChain,
}

impl BotContext {
    /// Creates a context for `bot` with the given chain.
    pub fn new(bot: BoxedBot, chain: HandlerChain) -> Self {
        Self { bot, chain }
    }

    /// Returns the bot handle.
    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    /// Returns the bot's identifier.
    pub fn id(&self) -> &str {
        self.bot.id()
    }

    /// Returns the handler chain.
    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    /// Returns a copy of this context using a different chain.
    pub fn with_chain(&self, chain: HandlerChain) -> Self {
        Self {
            bot: self.bot.clone(),
            chain,
        }
    }
}

impl fmt::Debug for BotContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotContext")
            .field("bot_id", &self.bot.id())
            .field("adapter", &self.bot.adapter_name())
            .field("chain", &self.chain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::HandlerId;
    use crate::integration::bot::{ApiError, ApiResult, Bot};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct MockBot;

    #[async_trait]
    impl Bot for MockBot {
        fn id(&self) -> &str {
            "10001"
        }

        fn adapter_name(&self) -> &str {
            "test"
        }

        async fn call_api(&self, _action: &str, _params: Value) -> ApiResult<Value> {
            Err(ApiError::NotConnected)
        }
    }

    #[test]
    fn test_with_chain_keeps_bot() {
        let ctx = BotContext::new(Arc::new(MockBot), HandlerChain::new(["a", "b"]));
        let swapped = ctx.with_chain(HandlerChain::new(["c"]));

        assert_eq!(swapped.id(), "10001");
        assert_eq!(swapped.chain().as_slice(), &[HandlerId::from("c")]);
        assert_eq!(ctx.chain().len(), 2);
    }

    #[tokio::test]
    async fn test_bot_reachable_through_context() {
        let ctx = BotContext::new(Arc::new(MockBot), HandlerChain::empty());
        let err = ctx
            .bot()
            .call_api("send_private_msg", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotConnected));
    }
}
