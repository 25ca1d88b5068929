//! Foundation layer - Core abstractions and type system.
//!
//! This module contains the fundamental building blocks of Ember:
//! - Raw, loosely-typed inbound events
//! - Handler identifiers, chains and results
//! - The error taxonomy shared by every layer

pub mod error;
pub mod handler;
pub mod raw;

pub use error::{
    DeserializationError, DispatchError, DispatchResult, EventError, HandlerError, ResolutionError,
};
pub use handler::{HandlerChain, HandlerId, HandlerOutcome, HandlerResult};
pub use raw::RawEvent;
