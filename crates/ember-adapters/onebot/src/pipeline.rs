//! Classify, deserialize, dispatch.
//!
//! [`EventPipeline`] is the whole inbound path for one OneBot event:
//!
//! ```text
//! RawEvent ──classify──▶ LeafTag ──deserialize──▶ TypedEvent ──dispatch──▶ handler chain
//!                           │
//!                           └── Unhandled ──▶ DispatchOutcome::Unhandled
//! ```
//!
//! An unhandled event stops right after classification: the deserializer and
//! the registry are never consulted.

use std::sync::Arc;

use ember_core::{BotContext, DeserializationError, DispatchResult, RawEvent};
use ember_framework::{DispatchOutcome, Dispatcher};
use tracing::{error, trace};

use crate::classifier::classify;
use crate::deserializer::{EventDeserializer, SerdeDeserializer};
use crate::event::TypedEvent;
use crate::handler::{OneBotDispatcher, OneBotRegistry};

/// The inbound OneBot event path.
#[derive(Clone)]
pub struct EventPipeline {
    deserializer: Arc<dyn EventDeserializer>,
    dispatcher: OneBotDispatcher,
}

impl EventPipeline {
    /// Creates a pipeline using the serde deserializer.
    pub fn new(registry: Arc<OneBotRegistry>) -> Self {
        Self::with_deserializer(registry, Arc::new(SerdeDeserializer))
    }

    /// Creates a pipeline with a custom deserializer.
    pub fn with_deserializer(
        registry: Arc<OneBotRegistry>,
        deserializer: Arc<dyn EventDeserializer>,
    ) -> Self {
        Self {
            deserializer,
            dispatcher: Dispatcher::new(registry),
        }
    }

    /// Returns the handler registry.
    pub fn registry(&self) -> &Arc<OneBotRegistry> {
        self.dispatcher.registry()
    }

    /// Runs one raw event through classification, deserialization and dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Deserialize`](ember_core::DispatchError::Deserialize)
    /// when a recognized event is malformed or the deserializer hands back a
    /// different leaf than the one classified, and
    /// [`DispatchError::Handler`](ember_core::DispatchError::Handler) when a
    /// handler fails.
    pub async fn handle(&self, ctx: &BotContext, raw: &RawEvent) -> DispatchResult<DispatchOutcome> {
        let classification = classify(raw);
        let leaf = classification.leaf;
        if leaf.is_unhandled() {
            return Ok(DispatchOutcome::Unhandled);
        }

        let event = self
            .deserializer
            .deserialize(raw, leaf)
            .and_then(|event| match event.leaf() {
                found if found == leaf => Ok(event),
                found => Err(DeserializationError::LeafMismatch {
                    expected: leaf.name(),
                    found: found.name(),
                }),
            })
            .inspect_err(|err| {
                error!(
                    bot_id = %ctx.id(),
                    %leaf,
                    path = %classification.path_string(),
                    error = %err,
                    "Failed to deserialize event"
                );
            })?;
        trace!(bot_id = %ctx.id(), %leaf, "Deserialized event");

        self.dispatch(ctx, &event).await
    }

    /// Parses `text` as a JSON object and handles it.
    pub async fn handle_json(&self, ctx: &BotContext, text: &str) -> DispatchResult<DispatchOutcome> {
        let raw = RawEvent::parse(text)?;
        self.handle(ctx, &raw).await
    }

    /// Dispatches an already typed event to the context's handler chain.
    pub async fn dispatch(
        &self,
        ctx: &BotContext,
        event: &TypedEvent,
    ) -> DispatchResult<DispatchOutcome> {
        self.dispatcher.dispatch(ctx, event).await
    }
}

impl std::fmt::Debug for EventPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPipeline")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::OneBotHandler;
    use crate::model::*;
    use crate::taxonomy::LeafTag;
    use async_trait::async_trait;
    use ember_core::{
        ApiError, ApiResult, Bot, DispatchError, EventError, HandlerChain,
        HandlerError, HandlerId, HandlerOutcome, HandlerResult,
    };
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Log = Arc<Mutex<Vec<String>>>;

    struct MockBot;

    #[async_trait]
    impl Bot for MockBot {
        fn id(&self) -> &str {
            "10001"
        }

        fn adapter_name(&self) -> &str {
            "onebot"
        }

        async fn call_api(&self, _action: &str, _params: Value) -> ApiResult<Value> {
            Err(ApiError::NotConnected)
        }
    }

    /// Logs `name:capability` for every call and answers with `reply`.
    struct Recorder {
        name: &'static str,
        reply: HandlerResult,
        log: Log,
    }

    impl Recorder {
        fn record(&self, capability: &str) -> HandlerOutcome {
            self.log.lock().push(format!("{}:{capability}", self.name));
            Ok(self.reply)
        }
    }

    #[async_trait]
    impl OneBotHandler for Recorder {
        async fn on_private_message(
            &self,
            _ctx: &BotContext,
            _event: &PrivateMessageEvent,
        ) -> HandlerOutcome {
            self.record("private_message")
        }

        async fn on_group_message(
            &self,
            _ctx: &BotContext,
            _event: &GroupMessageEvent,
        ) -> HandlerOutcome {
            self.record("group_message")
        }

        async fn on_group_poke(&self, _ctx: &BotContext, _event: &PokeEvent) -> HandlerOutcome {
            self.record("group_poke")
        }

        async fn on_private_poke(&self, _ctx: &BotContext, _event: &PokeEvent) -> HandlerOutcome {
            self.record("private_poke")
        }

        async fn on_friend_request(
            &self,
            _ctx: &BotContext,
            _event: &FriendRequestEvent,
        ) -> HandlerOutcome {
            self.record("friend_request")
        }
    }

    struct Failing;

    #[async_trait]
    impl OneBotHandler for Failing {
        async fn on_private_message(
            &self,
            _ctx: &BotContext,
            _event: &PrivateMessageEvent,
        ) -> HandlerOutcome {
            anyhow::bail!("storage offline")
        }
    }

    /// Counts calls, then defers to serde.
    #[derive(Default)]
    struct CountingDeserializer {
        calls: AtomicUsize,
    }

    impl EventDeserializer for CountingDeserializer {
        fn deserialize(
            &self,
            raw: &RawEvent,
            leaf: LeafTag,
        ) -> Result<TypedEvent, DeserializationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SerdeDeserializer.deserialize(raw, leaf)
        }
    }

    fn registry_with(handlers: &[(&'static str, HandlerResult)], log: &Log) -> Arc<OneBotRegistry> {
        let registry = OneBotRegistry::new();
        for &(name, reply) in handlers {
            registry.register(
                name,
                Arc::new(Recorder {
                    name,
                    reply,
                    log: Arc::clone(log),
                }),
            );
        }
        Arc::new(registry)
    }

    fn context(chain: &[&str]) -> BotContext {
        BotContext::new(Arc::new(MockBot), HandlerChain::new(chain.iter().copied()))
    }

    const PRIVATE_MESSAGE: &str = r#"{
        "time": 1700000000, "self_id": 10001, "post_type": "message",
        "message_type": "private", "sub_type": "friend", "message_id": 1,
        "user_id": 20002, "message": [{"type": "text", "data": {"text": "hi"}}],
        "raw_message": "hi", "font": 0, "sender": {"user_id": 20002, "nickname": "a"}
    }"#;

    fn poke(group_id: i64) -> String {
        format!(
            r#"{{"post_type":"notice","notice_type":"notify","sub_type":"poke",
                "group_id":{group_id},"user_id":1,"target_id":10001}}"#
        )
    }

    #[tokio::test]
    async fn test_private_message_walks_chain() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(
            &[
                ("a", HandlerResult::Continue),
                ("b", HandlerResult::Continue),
            ],
            &log,
        ));

        let outcome = pipeline
            .handle_json(&context(&["a", "b"]), PRIVATE_MESSAGE)
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Completed { invoked: 2 });
        assert_eq!(*log.lock(), ["a:private_message", "b:private_message"]);
    }

    #[tokio::test]
    async fn test_block_skips_rest_of_chain() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(
            &[
                ("a", HandlerResult::Continue),
                ("b", HandlerResult::Block),
                ("c", HandlerResult::Continue),
            ],
            &log,
        ));

        let outcome = pipeline
            .handle_json(&context(&["a", "b", "c"]), PRIVATE_MESSAGE)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Blocked {
                handler: HandlerId::from("b"),
                invoked: 2,
            }
        );
        assert_eq!(*log.lock(), ["a:private_message", "b:private_message"]);
    }

    #[tokio::test]
    async fn test_unregistered_handler_uses_default() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(&[], &log));

        let outcome = pipeline
            .handle_json(&context(&["missing"]), PRIVATE_MESSAGE)
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Completed { invoked: 1 });
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_poke_routes_by_group_id() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(&[("a", HandlerResult::Continue)], &log));
        let ctx = context(&["a"]);

        pipeline.handle_json(&ctx, &poke(123)).await.unwrap();
        pipeline.handle_json(&ctx, &poke(0)).await.unwrap();

        assert_eq!(*log.lock(), ["a:group_poke", "a:private_poke"]);
    }

    #[tokio::test]
    async fn test_bare_poke_routes_without_user_fields() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(&[("a", HandlerResult::Continue)], &log));
        let ctx = context(&["a"]);

        let group = pipeline
            .handle_json(
                &ctx,
                r#"{"post_type":"notice","notice_type":"notify","sub_type":"poke","group_id":123}"#,
            )
            .await
            .unwrap();
        let private = pipeline
            .handle_json(
                &ctx,
                r#"{"post_type":"notice","notice_type":"notify","sub_type":"poke","group_id":0}"#,
            )
            .await
            .unwrap();

        assert_eq!(group, DispatchOutcome::Completed { invoked: 1 });
        assert_eq!(private, DispatchOutcome::Completed { invoked: 1 });
        assert_eq!(*log.lock(), ["a:group_poke", "a:private_poke"]);
    }

    /// Always decodes the payload as a private poke.
    struct PrivatePokeDeserializer;

    impl EventDeserializer for PrivatePokeDeserializer {
        fn deserialize(
            &self,
            raw: &RawEvent,
            _leaf: LeafTag,
        ) -> Result<TypedEvent, DeserializationError> {
            SerdeDeserializer.deserialize(raw, LeafTag::PrivatePoke)
        }
    }

    #[tokio::test]
    async fn test_deserializer_leaf_mismatch_is_rejected() {
        let log = Log::default();
        let pipeline = EventPipeline::with_deserializer(
            registry_with(&[("a", HandlerResult::Continue)], &log),
            Arc::new(PrivatePokeDeserializer),
        );

        let err = pipeline
            .handle_json(&context(&["a"]), &poke(123))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Deserialize(DeserializationError::LeafMismatch {
                expected: "group_poke",
                found: "private_poke",
            })
        ));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_event_touches_nothing() {
        let log = Log::default();
        let deserializer = Arc::new(CountingDeserializer::default());
        let pipeline = EventPipeline::with_deserializer(
            registry_with(&[("a", HandlerResult::Continue)], &log),
            deserializer.clone(),
        );
        let ctx = context(&["a", "missing"]);

        let outcome = pipeline
            .handle_json(&ctx, r#"{"post_type":"unknown_type"}"#)
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Unhandled);

        let meta = pipeline
            .handle_json(&ctx, r#"{"post_type":"meta_event","meta_event_type":"heartbeat"}"#)
            .await
            .unwrap();
        assert_eq!(meta, DispatchOutcome::Unhandled);

        assert_eq!(deserializer.calls.load(Ordering::SeqCst), 0);
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_same_event_twice_is_identical() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(
            &[
                ("a", HandlerResult::Continue),
                ("b", HandlerResult::Block),
            ],
            &log,
        ));
        let ctx = context(&["a", "ghost", "b", "a"]);

        let first = pipeline.handle_json(&ctx, PRIVATE_MESSAGE).await.unwrap();
        let first_log = std::mem::take(&mut *log.lock());
        let second = pipeline.handle_json(&ctx, PRIVATE_MESSAGE).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first_log, *log.lock());
    }

    #[tokio::test]
    async fn test_malformed_known_event_surfaces() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(&[("a", HandlerResult::Continue)], &log));

        let err = pipeline
            .handle_json(
                &context(&["a"]),
                r#"{"post_type":"request","request_type":"friend","user_id":1}"#,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Deserialize(DeserializationError::Malformed {
                leaf: "friend_request",
                ..
            })
        ));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_event_error() {
        let pipeline = EventPipeline::new(Arc::new(OneBotRegistry::new()));

        let err = pipeline
            .handle_json(&context(&[]), "[1, 2]")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Event(EventError::NotAnObject { .. })));
    }

    #[tokio::test]
    async fn test_handler_error_aborts_chain() {
        let log = Log::default();
        let registry = registry_with(&[("after", HandlerResult::Continue)], &log);
        registry.register("failing", Arc::new(Failing));
        let pipeline = EventPipeline::new(registry);

        let err = pipeline
            .handle_json(&context(&["failing", "after"]), PRIVATE_MESSAGE)
            .await
            .unwrap_err();

        match err {
            DispatchError::Handler {
                handler,
                capability,
                source: HandlerError::Failed(_),
            } => {
                assert_eq!(handler.as_str(), "failing");
                assert_eq!(capability, "on_private_message");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_typed_event_directly() {
        let log = Log::default();
        let pipeline = EventPipeline::new(registry_with(&[("a", HandlerResult::Block)], &log));
        let raw = RawEvent::parse(&poke(9)).unwrap();
        let event = TypedEvent::decode(&raw, LeafTag::GroupPoke).unwrap();

        let outcome = pipeline.dispatch(&context(&["a"]), &event).await.unwrap();

        assert!(outcome.is_blocked());
        assert_eq!(*log.lock(), ["a:group_poke"]);
    }
}
