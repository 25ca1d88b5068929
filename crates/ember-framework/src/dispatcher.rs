//! Handler chain dispatcher.
//!
//! This module provides the [`Dispatcher`], the one routine that walks a bot's
//! handler chain for every kind of event. The event decides *which* handler
//! method is called (see [`Dispatchable`]); the dispatcher decides *who* is
//! called and *when to stop*:
//!
//! 1. Handler ids are taken from the [`BotContext`] chain in order
//! 2. Each id is resolved through the [`HandlerRegistry`] (falling back on failure)
//! 3. The event's capability is invoked and awaited before the next handler starts
//! 4. [`HandlerResult::Block`] stops the walk immediately
//! 5. A handler error or panic is logged and aborts the remaining chain
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//! let ctx = BotContext::new(bot, HandlerChain::new(["logger", "echo"]));
//!
//! match dispatcher.dispatch(&ctx, &event).await? {
//!     DispatchOutcome::Blocked { handler, .. } => println!("consumed by {handler}"),
//!     outcome => println!("{} handler(s) saw it", outcome.invoked()),
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use ember_core::{
    BotContext, DispatchError, DispatchResult, HandlerError, HandlerId, HandlerResult,
};
use futures::FutureExt;
use tracing::{Instrument, debug, debug_span, error, trace};

use crate::handler::Dispatchable;
use crate::registry::HandlerRegistry;

/// How a dispatch call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event matched no known shape; no handler was consulted.
    Unhandled,
    /// Every handler in the chain ran and none blocked.
    Completed {
        /// Number of handlers invoked.
        invoked: usize,
    },
    /// A handler blocked the event.
    Blocked {
        /// The handler that blocked.
        handler: HandlerId,
        /// Number of handlers invoked, the blocking one included.
        invoked: usize,
    },
}

impl DispatchOutcome {
    /// Returns the number of handlers that were invoked.
    pub fn invoked(&self) -> usize {
        match self {
            Self::Unhandled => 0,
            Self::Completed { invoked } | Self::Blocked { invoked, .. } => *invoked,
        }
    }

    /// Returns `true` if a handler blocked the event.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Walks handler chains for handlers of type `H`.
///
/// # Thread Safety
///
/// `Dispatcher` holds no per-event state. Any number of dispatch calls may run
/// concurrently against the same dispatcher; each one walks its own chain
/// sequentially.
pub struct Dispatcher<H: ?Sized> {
    registry: Arc<HandlerRegistry<H>>,
}

impl<H: ?Sized> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<H: ?Sized + Send + Sync> Dispatcher<H> {
    /// Creates a dispatcher resolving handlers through `registry`.
    pub fn new(registry: Arc<HandlerRegistry<H>>) -> Self {
        Self { registry }
    }

    /// Returns the handler registry.
    pub fn registry(&self) -> &Arc<HandlerRegistry<H>> {
        &self.registry
    }

    /// Dispatches `event` to every handler in the context's chain.
    ///
    /// # Returns
    ///
    /// [`DispatchOutcome::Completed`] when the chain was exhausted,
    /// [`DispatchOutcome::Blocked`] when a handler consumed the event, or
    /// [`DispatchError::Handler`] when a handler failed. Resolution failures
    /// are never returned; they fall back to the registry's default handler.
    pub async fn dispatch<E>(&self, ctx: &BotContext, event: &E) -> DispatchResult<DispatchOutcome>
    where
        E: Dispatchable<H>,
    {
        let capability = event.capability();
        let span = debug_span!("dispatch", bot_id = %ctx.id(), capability);
        self.walk(ctx, event, capability).instrument(span).await
    }

    async fn walk<E>(
        &self,
        ctx: &BotContext,
        event: &E,
        capability: &'static str,
    ) -> DispatchResult<DispatchOutcome>
    where
        E: Dispatchable<H>,
    {
        let mut invoked = 0;

        for id in ctx.chain() {
            let handler = self.registry.resolve(id);
            invoked += 1;

            let result = AssertUnwindSafe(event.invoke(&*handler, ctx))
                .catch_unwind()
                .await;

            let source = match result {
                Ok(Ok(HandlerResult::Continue)) => continue,
                Ok(Ok(HandlerResult::Block)) => {
                    debug!(handler = %id, invoked, "Handler blocked the event, stopping chain");
                    return Ok(DispatchOutcome::Blocked {
                        handler: id.clone(),
                        invoked,
                    });
                }
                Ok(Err(err)) => HandlerError::Failed(err),
                Err(payload) => HandlerError::Panicked(panic_message(payload.as_ref())),
            };

            error!(handler = %id, error = %source, "Handler failed, aborting remaining chain");
            return Err(DispatchError::Handler {
                handler: id.clone(),
                capability,
                source,
            });
        }

        trace!(invoked, "Handler chain exhausted");
        Ok(DispatchOutcome::Completed { invoked })
    }
}

impl<H: ?Sized> fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handler_count", &self.registry.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FallbackHandler;
    use async_trait::async_trait;
    use ember_core::{ApiError, ApiResult, Bot, HandlerChain, HandlerOutcome};
    use parking_lot::Mutex;
    use serde_json::Value;

    #[async_trait]
    trait Probe: Send + Sync {
        async fn on_ping(&self, ctx: &BotContext, seq: u32) -> HandlerOutcome;
    }

    struct Silent;

    #[async_trait]
    impl Probe for Silent {
        async fn on_ping(&self, _ctx: &BotContext, _seq: u32) -> HandlerOutcome {
            Ok(HandlerResult::Continue)
        }
    }

    impl FallbackHandler for dyn Probe {
        fn fallback() -> Arc<Self> {
            Arc::new(Silent)
        }
    }

    struct Ping(u32);

    #[async_trait]
    impl Dispatchable<dyn Probe> for Ping {
        fn capability(&self) -> &'static str {
            "on_ping"
        }

        async fn invoke(&self, handler: &dyn Probe, ctx: &BotContext) -> HandlerOutcome {
            handler.on_ping(ctx, self.0).await
        }
    }

    #[derive(Clone, Copy)]
    enum Reply {
        Continue,
        Block,
        Fail,
        Panic,
    }

    type Log = Arc<Mutex<Vec<(&'static str, u32)>>>;

    struct Recording {
        name: &'static str,
        reply: Reply,
        log: Log,
    }

    #[async_trait]
    impl Probe for Recording {
        async fn on_ping(&self, _ctx: &BotContext, seq: u32) -> HandlerOutcome {
            self.log.lock().push((self.name, seq));
            match self.reply {
                Reply::Continue => Ok(HandlerResult::Continue),
                Reply::Block => Ok(HandlerResult::Block),
                Reply::Fail => Err(anyhow::anyhow!("{} exploded", self.name)),
                Reply::Panic => panic!("{} panicked", self.name),
            }
        }
    }

    struct MockBot;

    #[async_trait]
    impl Bot for MockBot {
        fn id(&self) -> &str {
            "test-bot"
        }

        fn adapter_name(&self) -> &str {
            "test"
        }

        async fn call_api(&self, _action: &str, _params: Value) -> ApiResult<Value> {
            Err(ApiError::NotConnected)
        }
    }

    fn setup(handlers: &[(&'static str, Reply)]) -> (Dispatcher<dyn Probe>, Log) {
        let log = Log::default();
        let registry: HandlerRegistry<dyn Probe> = HandlerRegistry::new();
        for &(name, reply) in handlers {
            registry.register(
                name,
                Arc::new(Recording {
                    name,
                    reply,
                    log: Arc::clone(&log),
                }),
            );
        }
        (Dispatcher::new(Arc::new(registry)), log)
    }

    fn context(chain: &[&str]) -> BotContext {
        BotContext::new(Arc::new(MockBot), HandlerChain::new(chain.iter().copied()))
    }

    #[tokio::test]
    async fn test_walks_chain_in_order() {
        let (dispatcher, log) = setup(&[
            ("a", Reply::Continue),
            ("b", Reply::Continue),
            ("c", Reply::Continue),
        ]);

        let outcome = dispatcher
            .dispatch(&context(&["c", "a", "b"]), &Ping(1))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Completed { invoked: 3 });
        assert_eq!(*log.lock(), [("c", 1), ("a", 1), ("b", 1)]);
    }

    #[tokio::test]
    async fn test_block_stops_chain() {
        let (dispatcher, log) = setup(&[
            ("a", Reply::Continue),
            ("b", Reply::Block),
            ("c", Reply::Continue),
        ]);

        let outcome = dispatcher
            .dispatch(&context(&["a", "b", "c"]), &Ping(7))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Blocked {
                handler: HandlerId::from("b"),
                invoked: 2,
            }
        );
        assert_eq!(*log.lock(), [("a", 7), ("b", 7)]);
    }

    #[tokio::test]
    async fn test_unregistered_handler_is_skipped() {
        let (dispatcher, log) = setup(&[("b", Reply::Continue)]);

        let outcome = dispatcher
            .dispatch(&context(&["ghost", "b"]), &Ping(2))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Completed { invoked: 2 });
        assert_eq!(*log.lock(), [("b", 2)]);
    }

    #[tokio::test]
    async fn test_only_unregistered_handler() {
        let (dispatcher, log) = setup(&[]);

        let outcome = dispatcher
            .dispatch(&context(&["ghost"]), &Ping(3))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Completed { invoked: 1 });
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_handler_error_aborts_chain() {
        let (dispatcher, log) = setup(&[
            ("a", Reply::Continue),
            ("b", Reply::Fail),
            ("c", Reply::Continue),
        ]);

        let err = dispatcher
            .dispatch(&context(&["a", "b", "c"]), &Ping(4))
            .await
            .unwrap_err();

        match err {
            DispatchError::Handler {
                handler,
                capability,
                source: HandlerError::Failed(inner),
            } => {
                assert_eq!(handler.as_str(), "b");
                assert_eq!(capability, "on_ping");
                assert_eq!(inner.to_string(), "b exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*log.lock(), [("a", 4), ("b", 4)]);
    }

    #[tokio::test]
    async fn test_handler_panic_aborts_chain() {
        let (dispatcher, log) = setup(&[("a", Reply::Panic), ("b", Reply::Continue)]);

        let err = dispatcher
            .dispatch(&context(&["a", "b"]), &Ping(5))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Handler {
                source: HandlerError::Panicked(ref msg),
                ..
            } if msg == "a panicked"
        ));
        assert_eq!(*log.lock(), [("a", 5)]);
    }

    #[tokio::test]
    async fn test_empty_chain_completes() {
        let (dispatcher, _log) = setup(&[("a", Reply::Block)]);

        let outcome = dispatcher.dispatch(&context(&[]), &Ping(0)).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::Completed { invoked: 0 });
        assert_eq!(outcome.invoked(), 0);
        assert!(!outcome.is_blocked());
    }

    #[tokio::test]
    async fn test_repeat_dispatch_is_identical() {
        let (dispatcher, log) = setup(&[
            ("a", Reply::Continue),
            ("b", Reply::Block),
            ("c", Reply::Continue),
        ]);
        let ctx = context(&["a", "ghost", "b", "c"]);

        let first = dispatcher.dispatch(&ctx, &Ping(9)).await.unwrap();
        let first_log = std::mem::take(&mut *log.lock());
        let second = dispatcher.dispatch(&ctx, &Ping(9)).await.unwrap();
        let second_log = log.lock().clone();

        assert_eq!(first, second);
        assert_eq!(first_log, second_log);
        assert_eq!(first_log, [("a", 9), ("b", 9)]);
    }
}
