//! Echo Bot Example
//!
//! A small demonstration of the Ember handler chain. OneBot payloads are read
//! from stdin, one JSON object per line, and every API call a handler makes is
//! printed to stdout instead of being sent over a connection.
//!
//! # Handler Chain
//!
//! ```text
//! Logger ─▶ Ping ─▶ Echo ─▶ PokeBack
//! ```
//!
//! - `Logger` logs every message and always continues
//! - `Ping` and `Echo` answer their command and block the rest of the chain
//! - `PokeBack` pokes back whoever poked the bot
//!
//! # Usage
//!
//! ```bash
//! echo '{"post_type":"message","message_type":"private","message_id":1,
//!        "user_id":42,"message":"/echo hi","self_id":10001}' \
//!     | cargo run --package echo-bot
//! ```

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use ember::prelude::*;
use ember::runtime::config::{ConfigLoader, load_config_from_file};
use ember::runtime::logging;
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Parser)]
#[command(about = "Feed OneBot events from stdin through an Ember handler chain")]
struct Args {
    /// Configuration file. Defaults to the usual search paths.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bot id the events are attributed to.
    #[arg(long, default_value = "10001")]
    bot_id: String,

    /// Refuse to start if the chain names unregistered handlers.
    #[arg(long)]
    strict: bool,
}

// ============================================================================
// Bot
// ============================================================================

/// A bot whose API calls are written to stdout.
struct StdoutBot {
    id: String,
}

#[async_trait]
impl Bot for StdoutBot {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_name(&self) -> &str {
        "stdout"
    }

    async fn call_api(&self, action: &str, params: Value) -> ApiResult<Value> {
        println!("{}", json!({ "action": action, "params": params }));
        Ok(json!({ "status": "ok", "retcode": 0 }))
    }
}

async fn reply(
    ctx: &BotContext,
    event: &MessageEvent,
    group_id: Option<i64>,
    text: &str,
) -> ApiResult<Value> {
    match group_id {
        Some(group_id) => {
            ctx.bot()
                .call_api(
                    "send_group_msg",
                    json!({ "group_id": group_id, "message": text }),
                )
                .await
        }
        None => {
            ctx.bot()
                .call_api(
                    "send_private_msg",
                    json!({ "user_id": event.user_id, "message": text }),
                )
                .await
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Logs every message.
struct Logger;

#[async_trait]
impl OneBotHandler for Logger {
    async fn on_private_message(
        &self,
        _ctx: &BotContext,
        event: &PrivateMessageEvent,
    ) -> HandlerOutcome {
        let nickname = event.sender.display_name().unwrap_or("Unknown");
        info!("[Private] {} ({}): {}", nickname, event.user_id, event.plain_text());
        Ok(HandlerResult::Continue)
    }

    async fn on_group_message(
        &self,
        _ctx: &BotContext,
        event: &GroupMessageEvent,
    ) -> HandlerOutcome {
        let nickname = event.sender.display_name().unwrap_or("Unknown");
        info!(
            "[Group {}] {} ({}): {}",
            event.group_id,
            nickname,
            event.user_id,
            event.plain_text()
        );
        Ok(HandlerResult::Continue)
    }
}

/// Answers `/ping`.
struct Ping;

impl Ping {
    async fn handle(
        ctx: &BotContext,
        event: &MessageEvent,
        group_id: Option<i64>,
    ) -> HandlerOutcome {
        if event.plain_text().trim() != "/ping" {
            return Ok(HandlerResult::Continue);
        }
        reply(ctx, event, group_id, "Pong!").await?;
        Ok(HandlerResult::Block)
    }
}

#[async_trait]
impl OneBotHandler for Ping {
    async fn on_private_message(
        &self,
        ctx: &BotContext,
        event: &PrivateMessageEvent,
    ) -> HandlerOutcome {
        Self::handle(ctx, event, None).await
    }

    async fn on_group_message(
        &self,
        ctx: &BotContext,
        event: &GroupMessageEvent,
    ) -> HandlerOutcome {
        Self::handle(ctx, event, Some(event.group_id)).await
    }
}

/// Repeats whatever follows `/echo `.
struct Echo;

impl Echo {
    async fn handle(
        ctx: &BotContext,
        event: &MessageEvent,
        group_id: Option<i64>,
    ) -> HandlerOutcome {
        let text = event.plain_text();
        let Some(content) = text.strip_prefix("/echo ") else {
            return Ok(HandlerResult::Continue);
        };
        reply(ctx, event, group_id, content).await?;
        Ok(HandlerResult::Block)
    }
}

#[async_trait]
impl OneBotHandler for Echo {
    async fn on_private_message(
        &self,
        ctx: &BotContext,
        event: &PrivateMessageEvent,
    ) -> HandlerOutcome {
        Self::handle(ctx, event, None).await
    }

    async fn on_group_message(
        &self,
        ctx: &BotContext,
        event: &GroupMessageEvent,
    ) -> HandlerOutcome {
        Self::handle(ctx, event, Some(event.group_id)).await
    }
}

/// Pokes back whoever poked the bot.
struct PokeBack;

#[async_trait]
impl OneBotHandler for PokeBack {
    async fn on_group_poke(&self, ctx: &BotContext, event: &PokeEvent) -> HandlerOutcome {
        if event.targets_self() {
            ctx.bot()
                .call_api(
                    "group_poke",
                    json!({ "group_id": event.group_id, "user_id": event.user_id }),
                )
                .await?;
        }
        Ok(HandlerResult::Continue)
    }

    async fn on_private_poke(&self, ctx: &BotContext, event: &PokeEvent) -> HandlerOutcome {
        if event.targets_self() {
            ctx.bot()
                .call_api("friend_poke", json!({ "user_id": event.user_id }))
                .await?;
        }
        Ok(HandlerResult::Continue)
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config_from_file(path)?,
        None => ConfigLoader::new().with_user_config_dir().load_validated()?,
    };
    logging::init_from_config(&config.logging);

    let registry = OneBotRegistry::new();
    registry.install(Logger);
    registry.install(Ping);
    registry.install(Echo);
    registry.install(PokeBack);

    let gateway = Gateway::from_config(&config, Arc::new(registry))
        .strict_handlers(args.strict || config.dispatch.strict_handlers);

    let bot: BoxedBot = Arc::new(StdoutBot {
        id: args.bot_id.clone(),
    });
    if config.bot(&args.bot_id).is_some() {
        gateway.attach_configured(bot).await?;
    } else {
        let chain = HandlerChain::new(["Logger", "Ping", "Echo", "PokeBack"]);
        gateway.attach(bot, chain).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match gateway.handle_json(&args.bot_id, &line).await {
            Ok(outcome) => info!(?outcome, "Event handled"),
            Err(e) => error!("Failed to handle event: {}", e),
        }
    }

    Ok(())
}
