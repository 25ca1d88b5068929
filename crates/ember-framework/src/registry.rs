//! Handler registry with a safe fallback.
//!
//! The registry is filled once at startup, mapping each [`HandlerId`] to a live
//! handler instance. Lookups never fail from the caller's point of view: an id
//! that was never registered, or whose factory failed, resolves to the shared
//! fallback handler and a warning is logged.
//!
//! ```rust,ignore
//! let registry: HandlerRegistry<dyn OneBotHandler> = HandlerRegistry::new();
//! registry.register("echo", Arc::new(EchoHandler));
//! registry.register_with("db", || Database::connect().map(|db| Arc::new(DbHandler(db)) as _))?;
//!
//! let handler = registry.resolve(&HandlerId::from("echo"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ember_core::{HandlerChain, HandlerId, ResolutionError};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Supplies the default handler substituted when resolution fails.
///
/// Implemented by protocol adapters for their handler trait object, e.g.
/// `impl FallbackHandler for dyn OneBotHandler`.
pub trait FallbackHandler {
    /// Returns the shared, stateless default handler.
    fn fallback() -> Arc<Self>;
}

enum Slot<H: ?Sized> {
    Ready(Arc<H>),
    Failed(String),
}

/// Maps handler ids to live handler instances.
///
/// # Thread Safety
///
/// Lookups take a shared read lock and clone an `Arc`, so any number of
/// dispatches may resolve concurrently.
pub struct HandlerRegistry<H: ?Sized> {
    slots: RwLock<HashMap<HandlerId, Slot<H>>>,
    fallback: Arc<H>,
}

impl<H: ?Sized + FallbackHandler> HandlerRegistry<H> {
    /// Creates an empty registry using the handler trait's default fallback.
    pub fn new() -> Self {
        Self::with_fallback(H::fallback())
    }
}

impl<H: ?Sized + FallbackHandler> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> HandlerRegistry<H> {
    /// Creates an empty registry with an explicit fallback handler.
    pub fn with_fallback(fallback: Arc<H>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            fallback,
        }
    }

    /// Registers a handler instance under `id`.
    ///
    /// Registering the same id twice replaces the earlier instance.
    pub fn register(&self, id: impl Into<HandlerId>, handler: Arc<H>) {
        let id = id.into();
        let previous = self.slots.write().insert(id.clone(), Slot::Ready(handler));
        if previous.is_some() {
            warn!(handler = %id, "Handler registered twice, previous instance replaced");
        } else {
            debug!(handler = %id, "Registered handler");
        }
    }

    /// Builds a handler with `factory` and registers it under `id`.
    ///
    /// A failing factory is remembered: the id keeps resolving to the fallback
    /// and [`try_resolve`](Self::try_resolve) reports the failure reason.
    pub fn register_with<F, E>(
        &self,
        id: impl Into<HandlerId>,
        factory: F,
    ) -> Result<(), ResolutionError>
    where
        F: FnOnce() -> Result<Arc<H>, E>,
        E: fmt::Display,
    {
        let id = id.into();
        match factory() {
            Ok(handler) => {
                self.register(id, handler);
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(handler = %id, %reason, "Handler failed to instantiate");
                self.slots
                    .write()
                    .insert(id.clone(), Slot::Failed(reason.clone()));
                Err(ResolutionError::InstantiationFailed {
                    handler: id,
                    reason,
                })
            }
        }
    }

    /// Removes `id` from the registry. Returns `true` if it was present.
    pub fn unregister(&self, id: &HandlerId) -> bool {
        self.slots.write().remove(id).is_some()
    }

    /// Looks up `id` without falling back.
    pub fn try_resolve(&self, id: &HandlerId) -> Result<Arc<H>, ResolutionError> {
        match self.slots.read().get(id) {
            Some(Slot::Ready(handler)) => Ok(Arc::clone(handler)),
            Some(Slot::Failed(reason)) => Err(ResolutionError::InstantiationFailed {
                handler: id.clone(),
                reason: reason.clone(),
            }),
            None => Err(ResolutionError::NotRegistered(id.clone())),
        }
    }

    /// Looks up `id`, substituting the fallback handler on failure.
    ///
    /// Never fails. A failed lookup is logged at warn level with the id.
    pub fn resolve(&self, id: &HandlerId) -> Arc<H> {
        self.try_resolve(id).unwrap_or_else(|err| {
            warn!(handler = %id, error = %err, "Handler skipped, substituting the default handler");
            Arc::clone(&self.fallback)
        })
    }

    /// Checks every id in `chain`, collecting failures in chain order.
    pub fn validate_chain(&self, chain: &HandlerChain) -> Result<(), Vec<ResolutionError>> {
        let errors: Vec<_> = chain
            .iter()
            .filter_map(|id| self.try_resolve(id).err())
            .collect();
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Returns the fallback handler.
    pub fn fallback(&self) -> &Arc<H> {
        &self.fallback
    }

    /// Returns `true` if `id` resolves to a live handler.
    pub fn contains(&self, id: &HandlerId) -> bool {
        matches!(self.slots.read().get(id), Some(Slot::Ready(_)))
    }

    /// Returns all registered ids, sorted.
    pub fn ids(&self) -> Vec<HandlerId> {
        let mut ids: Vec<_> = self.slots.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of registered ids, failed ones included.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl<H: ?Sized> fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    struct Quiet;

    impl Greeter for Quiet {
        fn greet(&self) -> &'static str {
            ""
        }
    }

    struct Hello;

    impl Greeter for Hello {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    impl FallbackHandler for dyn Greeter {
        fn fallback() -> Arc<Self> {
            Arc::new(Quiet)
        }
    }

    #[test]
    fn test_resolve_registered() {
        let registry: HandlerRegistry<dyn Greeter> = HandlerRegistry::new();
        registry.register("hello", Arc::new(Hello));

        let id = HandlerId::from("hello");
        assert_eq!(registry.resolve(&id).greet(), "hello");
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_unregistered_resolves_to_fallback() {
        let registry: HandlerRegistry<dyn Greeter> = HandlerRegistry::new();
        let id = HandlerId::from("missing");

        let handler = registry.resolve(&id);
        assert!(Arc::ptr_eq(&handler, registry.fallback()));
        assert_eq!(
            registry.try_resolve(&id).err(),
            Some(ResolutionError::NotRegistered(id))
        );
    }

    #[test]
    fn test_failed_factory_resolves_to_fallback() {
        let registry: HandlerRegistry<dyn Greeter> = HandlerRegistry::new();
        let result = registry.register_with("broken", || -> Result<Arc<dyn Greeter>, &str> {
            Err("database unavailable")
        });
        assert!(result.is_err());

        let id = HandlerId::from("broken");
        assert!(!registry.contains(&id));
        assert_eq!(registry.resolve(&id).greet(), "");
        match registry.try_resolve(&id) {
            Err(ResolutionError::InstantiationFailed { reason, .. }) => {
                assert_eq!(reason, "database unavailable");
            }
            _ => panic!("expected instantiation failure"),
        }
    }

    #[test]
    fn test_register_replaces() {
        let registry: HandlerRegistry<dyn Greeter> = HandlerRegistry::new();
        registry.register("g", Arc::new(Quiet));
        registry.register("g", Arc::new(Hello));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(&HandlerId::from("g")).greet(), "hello");
    }

    #[test]
    fn test_validate_chain_reports_in_order() {
        let registry: HandlerRegistry<dyn Greeter> = HandlerRegistry::new();
        registry.register("ok", Arc::new(Hello));

        assert!(registry.validate_chain(&HandlerChain::new(["ok"])).is_ok());

        let errors = registry
            .validate_chain(&HandlerChain::new(["z", "ok", "a"]))
            .unwrap_err();
        let ids: Vec<_> = errors.iter().map(|e| e.handler().as_str()).collect();
        assert_eq!(ids, ["z", "a"]);
    }

    #[test]
    fn test_concurrent_resolution() {
        let registry: HandlerRegistry<dyn Greeter> = HandlerRegistry::new();
        registry.register("hello", Arc::new(Hello));
        let known = HandlerId::from("hello");
        let unknown = HandlerId::from("nobody");

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(registry.resolve(&known).greet(), "hello");
                        assert_eq!(registry.resolve(&unknown).greet(), "");
                    }
                });
            }
        });
    }
}
