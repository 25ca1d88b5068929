//! Integration layer - Interfaces to the outside world.
//!
//! - [`Bot`]: the handle a transport provides for one connection
//! - [`BotContext`]: a bot paired with its handler chain

pub mod bot;
pub mod context;

pub use bot::{ApiError, ApiResult, Bot, BoxedBot};
pub use context::BotContext;
