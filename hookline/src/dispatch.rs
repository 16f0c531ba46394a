//! The dispatcher.
//!
//! [`HookDispatcher`] owns one plugin instance's frozen registry and its
//! resolution cache, and exposes the engine's sole externally invoked
//! operation: [`fire`](HookDispatcher::fire). Firing is a plain synchronous
//! call chain — resolve, adapt, invoke in plan order, reconcile outputs —
//! with no timeout or cancellation imposed on handler bodies.

use tracing::debug;

use hookline_core::{ArgBuffer, DispatchError, Value};

use crate::cache::ResolutionCache;
use crate::registry::HookRegistry;

/// Dispatches hook firings for one plugin instance.
///
/// The registry is read-only after construction and the cache is a
/// concurrency-safe memo, so a dispatcher may be shared across threads and
/// fired concurrently.
pub struct HookDispatcher {
    registry: HookRegistry,
    cache: ResolutionCache,
}

impl HookDispatcher {
    /// Wrap a frozen registry.
    pub fn new(registry: HookRegistry) -> Self {
        Self {
            registry,
            cache: ResolutionCache::new(),
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Number of dispatch plans memoized so far.
    pub fn cached_plans(&self) -> usize {
        self.cache.len()
    }

    /// Fire a hook with a concrete argument list.
    ///
    /// Resolves the dispatch plan (memoized per call signature), then
    /// invokes each chosen handler in plan order: the argument list is
    /// adapted to the handler's declared arity, input slots are coerced to
    /// declared kinds, and output/by-reference slots are copied back into
    /// `args` after the handler returns.
    ///
    /// The returned value is the *last* invoked handler's return value —
    /// each invocation unconditionally overwrites the previous one — or
    /// [`Value::Null`] when the plan is empty. A handler error aborts the
    /// remaining plan entries and propagates as the original cause.
    pub fn fire(&self, hook: &str, args: &mut [Value]) -> Result<Value, DispatchError> {
        let plan = self.cache.resolve(&self.registry, hook, args);
        if plan.is_empty() {
            return Ok(Value::Null);
        }

        debug!(hook, handlers = plan.len(), "firing hook");

        let mut result = Value::Null;
        for entry in plan.iter() {
            let descriptor = &entry.descriptor;
            let mut buffer = ArgBuffer::adapt(descriptor, args);
            buffer.coerce(descriptor);
            result = descriptor
                .invoke(buffer.as_mut_slice())
                .map_err(DispatchError::Handler)?;
            buffer.write_back(descriptor, args);
        }
        Ok(result)
    }
}
