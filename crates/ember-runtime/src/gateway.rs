//! Session table in front of the event pipeline.
//!
//! The [`Gateway`] is what a transport talks to: it attaches bots as they
//! connect, looks up the session for each inbound payload, and hands the
//! payload to the [`EventPipeline`].
//!
//! ```rust,ignore
//! let gateway = Gateway::from_config(&config, Arc::new(registry));
//! gateway.attach_configured(bot).await?;
//!
//! // for every frame received on the bot's connection
//! gateway.handle_json(bot_id, &frame).await?;
//! ```
//!
//! Sessions are cloned out of the table before dispatch, so replacing a
//! bot's chain never changes a dispatch already in flight.

use std::collections::HashMap;
use std::sync::Arc;

use ember_adapter_onebot::{EventPipeline, OneBotRegistry};
use ember_core::{BotContext, BoxedBot, HandlerChain, RawEvent};
use ember_framework::DispatchOutcome;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{BotConfig, DispatchConfig, EmberConfig};
use crate::error::{RuntimeError, RuntimeResult};

/// Routes inbound events to the right bot session.
pub struct Gateway {
    pipeline: EventPipeline,
    dispatch: DispatchConfig,
    bots: HashMap<String, BotConfig>,
    sessions: RwLock<HashMap<String, BotContext>>,
}

impl Gateway {
    /// Creates a gateway with lenient handler checking and no configured bots.
    pub fn new(pipeline: EventPipeline) -> Self {
        Self {
            pipeline,
            dispatch: DispatchConfig::default(),
            bots: HashMap::new(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a gateway from loaded configuration.
    pub fn from_config(config: &EmberConfig, registry: Arc<OneBotRegistry>) -> Self {
        let mut gateway = Self::new(EventPipeline::new(registry));
        gateway.dispatch = config.dispatch;
        gateway.bots = config
            .bots
            .iter()
            .map(|bot| (bot.id.clone(), bot.clone()))
            .collect();
        gateway
    }

    /// Sets strict handler checking for subsequent attaches.
    pub fn strict_handlers(mut self, strict: bool) -> Self {
        self.dispatch.strict_handlers = strict;
        self
    }

    /// Returns the event pipeline.
    pub fn pipeline(&self) -> &EventPipeline {
        &self.pipeline
    }

    /// Attaches `bot` with an explicit handler chain.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::BotExists`] if a session with the same id is attached;
    /// [`RuntimeError::UnresolvedHandlers`] if strict checking is on and the
    /// chain names handlers that do not resolve.
    pub async fn attach(&self, bot: BoxedBot, chain: HandlerChain) -> RuntimeResult<BotContext> {
        let id = bot.id().to_string();
        self.check_chain(&id, &chain)?;

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(RuntimeError::BotExists(id));
        }

        let ctx = BotContext::new(bot, chain);
        info!(
            bot_id = %id,
            adapter = ctx.bot().adapter_name(),
            handlers = ctx.chain().len(),
            "Attached bot"
        );
        sessions.insert(id, ctx.clone());
        Ok(ctx)
    }

    /// Attaches `bot` with the handler chain from its configuration entry.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownBot`] if the bot has no configuration entry and
    /// [`RuntimeError::BotDisabled`] if the entry is disabled, plus the errors
    /// of [`attach`](Self::attach).
    pub async fn attach_configured(&self, bot: BoxedBot) -> RuntimeResult<BotContext> {
        let config = self
            .bots
            .get(bot.id())
            .ok_or_else(|| RuntimeError::UnknownBot(bot.id().to_string()))?;
        if !config.enabled {
            return Err(RuntimeError::BotDisabled(config.id.clone()));
        }
        debug!(bot_id = %config.id, name = config.display_name(), "Using configured chain");
        self.attach(bot, config.chain()).await
    }

    /// Replaces the handler chain of an attached bot.
    ///
    /// Dispatches already running keep the chain they started with.
    pub async fn set_chain(&self, bot_id: &str, chain: HandlerChain) -> RuntimeResult<()> {
        self.check_chain(bot_id, &chain)?;

        let mut sessions = self.sessions.write().await;
        let ctx = sessions
            .get_mut(bot_id)
            .ok_or_else(|| RuntimeError::UnknownBot(bot_id.to_string()))?;
        *ctx = ctx.with_chain(chain);
        debug!(bot_id, handlers = ctx.chain().len(), "Replaced handler chain");
        Ok(())
    }

    /// Detaches a bot, returning its last session.
    pub async fn detach(&self, bot_id: &str) -> Option<BotContext> {
        let removed = self.sessions.write().await.remove(bot_id);
        if removed.is_some() {
            info!(bot_id, "Detached bot");
        }
        removed
    }

    /// Returns a snapshot of a bot's session.
    pub async fn session(&self, bot_id: &str) -> Option<BotContext> {
        self.sessions.read().await.get(bot_id).cloned()
    }

    /// Returns the ids of all attached bots, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Handles one raw event received on `bot_id`'s connection.
    pub async fn handle(&self, bot_id: &str, raw: &RawEvent) -> RuntimeResult<DispatchOutcome> {
        let ctx = self.require_session(bot_id).await?;
        Ok(self.pipeline.handle(&ctx, raw).await?)
    }

    /// Parses and handles one JSON payload received on `bot_id`'s connection.
    pub async fn handle_json(&self, bot_id: &str, text: &str) -> RuntimeResult<DispatchOutcome> {
        let ctx = self.require_session(bot_id).await?;
        Ok(self.pipeline.handle_json(&ctx, text).await?)
    }

    async fn require_session(&self, bot_id: &str) -> RuntimeResult<BotContext> {
        self.session(bot_id)
            .await
            .ok_or_else(|| RuntimeError::UnknownBot(bot_id.to_string()))
    }

    fn check_chain(&self, bot_id: &str, chain: &HandlerChain) -> RuntimeResult<()> {
        let Err(errors) = self.pipeline.registry().validate_chain(chain) else {
            return Ok(());
        };

        if self.dispatch.strict_handlers {
            return Err(RuntimeError::UnresolvedHandlers {
                bot: bot_id.to_string(),
                handlers: errors,
            });
        }

        for err in &errors {
            warn!(bot_id, error = %err, "Chain names a handler that will be skipped");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("pipeline", &self.pipeline)
            .field("strict_handlers", &self.dispatch.strict_handlers)
            .field("configured_bots", &self.bots.len())
            .finish_non_exhaustive()
    }
}
