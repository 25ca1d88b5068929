//! Handler identifiers, chains and results.
//!
//! These are plain data: the registry maps a [`HandlerId`] to an instance, a
//! [`HandlerChain`] lists which ids a bot consults and in what order, and a
//! [`HandlerResult`] tells the dispatcher whether to keep walking.

use std::fmt;
use std::sync::Arc;

/// A stable token naming a registered handler.
///
/// Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(Arc<str>);

impl HandlerId {
    /// Creates an identifier from an explicit name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Derives an identifier from a handler type's bare name.
    ///
    /// `my_bot::handlers::EchoHandler` becomes `EchoHandler`. Generic
    /// parameters are dropped.
    pub fn of<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let path = full.split('<').next().unwrap_or(full);
        let name = path.rsplit("::").next().unwrap_or(path);
        Self::new(name)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for HandlerId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// The ordered list of handler ids a bot consults for every event.
///
/// A chain is immutable: replacing a bot's chain means building a new one,
/// so a dispatch that already holds a clone keeps walking the order it
/// started with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerChain {
    ids: Arc<[HandlerId]>,
}

impl HandlerChain {
    /// Creates a chain from ids in the given order.
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<HandlerId>,
    {
        ids.into_iter().map(Into::into).collect()
    }

    /// Returns an empty chain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Iterates over the ids in order.
    pub fn iter(&self) -> std::slice::Iter<'_, HandlerId> {
        self.ids.iter()
    }

    /// Returns the ids as a slice.
    pub fn as_slice(&self) -> &[HandlerId] {
        &self.ids
    }

    /// Returns the number of handlers in the chain.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the chain contains no handlers.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` if `id` appears in the chain.
    pub fn contains(&self, id: &HandlerId) -> bool {
        self.ids.contains(id)
    }
}

impl<T: Into<HandlerId>> FromIterator<T> for HandlerChain {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HandlerChain {
    type Item = &'a HandlerId;
    type IntoIter = std::slice::Iter<'a, HandlerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What a handler tells the dispatcher after processing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[must_use]
pub enum HandlerResult {
    /// Let the next handler in the chain see the event.
    #[default]
    Continue,
    /// Consume the event; no later handler is invoked.
    Block,
}

impl HandlerResult {
    /// Returns `true` for [`HandlerResult::Block`].
    pub fn is_block(self) -> bool {
        matches!(self, HandlerResult::Block)
    }
}

/// What a handler capability returns.
///
/// `Err` aborts the remaining chain for that event.
pub type HandlerOutcome = anyhow::Result<HandlerResult>;
