//! Unified error types for the Ember core.
//!
//! Classification never fails, so it has no error type here; an event that
//! matches nothing is simply unhandled. Everything that *can* go wrong on the
//! way from raw payload to handler is listed below.

use thiserror::Error;

use super::handler::HandlerId;

// =============================================================================
// Raw Event Errors
// =============================================================================

/// Errors raised while turning transport bytes into a [`RawEvent`](super::RawEvent).
#[derive(Debug, Error)]
pub enum EventError {
    /// The payload is not valid JSON.
    #[error("malformed event JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("event payload must be a JSON object, got {found}")]
    NotAnObject {
        /// The JSON kind that was found instead.
        found: &'static str,
    },
}

// =============================================================================
// Deserialization Errors
// =============================================================================

/// A classified event could not be converted into its typed form.
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// Required fields are missing or have the wrong shape.
    #[error("malformed `{leaf}` event: {source}")]
    Malformed {
        /// The leaf the event was classified as.
        leaf: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The requested leaf has no typed representation.
    #[error("leaf `{leaf}` has no typed representation")]
    Unsupported {
        /// The requested leaf.
        leaf: &'static str,
    },

    /// The deserializer produced an event for a different leaf.
    #[error("expected a `{expected}` event, deserializer produced `{found}`")]
    LeafMismatch {
        /// The leaf the event was classified as.
        expected: &'static str,
        /// The leaf of the event that came back.
        found: &'static str,
    },
}

impl DeserializationError {
    /// Creates a malformed-event error.
    pub fn malformed(leaf: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { leaf, source }
    }

    /// Creates an unsupported-leaf error.
    pub fn unsupported(leaf: &'static str) -> Self {
        Self::Unsupported { leaf }
    }

    /// Returns the leaf the failure refers to.
    pub fn leaf(&self) -> &'static str {
        match self {
            Self::Malformed { leaf, .. } | Self::Unsupported { leaf } => *leaf,
            Self::LeafMismatch { expected, .. } => *expected,
        }
    }
}

// =============================================================================
// Resolution Errors
// =============================================================================

/// A handler id could not be turned into a live instance.
///
/// The dispatcher never sees this: resolution falls back to the default
/// handler. It is only surfaced by explicit validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Nothing was registered under this id.
    #[error("handler `{0}` is not registered")]
    NotRegistered(HandlerId),

    /// A factory was registered but failed to build the handler.
    #[error("handler `{handler}` failed to instantiate: {reason}")]
    InstantiationFailed {
        /// The handler id.
        handler: HandlerId,
        /// Why instantiation failed.
        reason: String,
    },
}

impl ResolutionError {
    /// Returns the id that failed to resolve.
    pub fn handler(&self) -> &HandlerId {
        match self {
            Self::NotRegistered(handler) | Self::InstantiationFailed { handler, .. } => handler,
        }
    }
}

// =============================================================================
// Handler Errors
// =============================================================================

/// A handler capability failed while processing an event.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The capability returned an error.
    #[error("{0:#}")]
    Failed(anyhow::Error),

    /// The capability panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Errors surfaced by a single dispatch call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The raw payload could not be read.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The classified event could not be deserialized.
    #[error(transparent)]
    Deserialize(#[from] DeserializationError),

    /// A handler failed; the rest of the chain was skipped.
    #[error("handler `{handler}` failed in `{capability}`: {source}")]
    Handler {
        /// The failing handler.
        handler: HandlerId,
        /// The capability that was being invoked.
        capability: &'static str,
        /// What went wrong.
        #[source]
        source: HandlerError,
    },
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
