//! # Ember Framework
//!
//! Protocol-agnostic dispatch machinery.
//!
//! This layer provides:
//! - [`Dispatchable`]: the capability selector a typed event implements for a
//!   handler trait
//! - [`HandlerRegistry`]: handler id → instance lookup with a shared fallback
//! - [`Dispatcher`]: the single chain-walking routine with block and failure
//!   short-circuiting
//!
//! Protocol adapters supply the handler trait, the typed events, and the
//! fallback handler; everything here is generic over them.

pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use handler::Dispatchable;
pub use registry::{FallbackHandler, HandlerRegistry};
