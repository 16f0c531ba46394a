//! Registry construction.
//!
//! This module provides a builder pattern for registering candidate
//! handlers and a frozen registry for immutable, thread-safe lookup.
//!
//! Candidates arrive as `(scope rank, member name, parameters, callable)`
//! tuples, one explicit registration call per candidate at plugin
//! construction time; the built registry never needs introspection again.
//! Discovery order is preserved: base-most declaring scope first, and
//! insertion order within a scope.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use hookline_core::{
    HandlerDescriptor, HandlerFn, ParamSpec, RegistrationError, TypeDesc, Value,
};

/// Reserved member-name prefix marking a framework-internal (base) hook.
///
/// Handlers carrying it are mandatory: they join every dispatch plan for
/// their hook irrespective of signature match. The prefix is stripped from
/// the hook name.
pub const BASE_HOOK_PREFIX: &str = "base_";

/// One registration awaiting validation at build time.
struct Candidate {
    scope_rank: u32,
    member: String,
    params: Vec<ParamSpec>,
    func: HandlerFn,
}

/// Builder for constructing a [`HookRegistry`].
///
/// Register every candidate handler a plugin instance exposes, then call
/// [`build`](Self::build) to freeze the registry. Malformed registrations
/// are dropped with a logged warning at build time; use
/// [`try_handler`](Self::try_handler) to surface the error instead.
///
/// # Example
/// ```ignore
/// let registry = HookRegistryBuilder::new()
///     .handler(0, "OnTick", vec![], |_args| Ok(Value::Null))
///     .handler(1, "base_OnTick", vec![], |_args| Ok(Value::Null))
///     .build();
/// ```
pub struct HookRegistryBuilder {
    candidates: Vec<Candidate>,
}

impl HookRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Register a candidate handler.
    ///
    /// `scope_rank` orders declaring scopes base-to-derived (lower rank =
    /// more base). `member` is the member's identifier; the [`BASE_HOOK_PREFIX`]
    /// marks mandatory handlers and is stripped to form the hook name.
    pub fn handler<F>(
        mut self,
        scope_rank: u32,
        member: &str,
        params: Vec<ParamSpec>,
        func: F,
    ) -> Self
    where
        F: Fn(&mut [Value]) -> Result<Value, hookline_core::BoxError> + Send + Sync + 'static,
    {
        self.handler_mut(scope_rank, member, params, func);
        self
    }

    /// Register a candidate handler (mutable version).
    pub fn handler_mut<F>(&mut self, scope_rank: u32, member: &str, params: Vec<ParamSpec>, func: F)
    where
        F: Fn(&mut [Value]) -> Result<Value, hookline_core::BoxError> + Send + Sync + 'static,
    {
        self.candidates.push(Candidate {
            scope_rank,
            member: member.to_string(),
            params,
            func: Arc::new(func),
        });
    }

    /// Register a candidate handler, surfacing validation errors eagerly
    /// instead of dropping the descriptor at build time.
    pub fn try_handler<F>(
        &mut self,
        scope_rank: u32,
        member: &str,
        params: Vec<ParamSpec>,
        func: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&mut [Value]) -> Result<Value, hookline_core::BoxError> + Send + Sync + 'static,
    {
        validate(member, &params)?;
        self.handler_mut(scope_rank, member, params, func);
        Ok(())
    }

    /// Number of registered candidates (including any that validation will
    /// later drop).
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the builder holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Freeze the registry.
    ///
    /// Candidates are stably ordered by scope rank (base-most first,
    /// insertion order within a rank), validated, and appended to their
    /// hook's list in that discovery order. A malformed candidate is
    /// dropped with a warning; the rest of the registry still builds.
    pub fn build(mut self) -> HookRegistry {
        self.candidates.sort_by_key(|c| c.scope_rank);

        let mut handlers: HashMap<String, Vec<Arc<HandlerDescriptor>>> = HashMap::new();
        for candidate in self.candidates {
            let (hook, mandatory) = match validate(&candidate.member, &candidate.params) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(
                        member = %candidate.member,
                        error = %err,
                        "dropping malformed handler registration"
                    );
                    continue;
                }
            };
            let descriptor = Arc::new(HandlerDescriptor::new(
                hook.clone(),
                candidate.params,
                mandatory,
                candidate.func,
            ));
            debug!(
                hook = %hook,
                identity = %descriptor.identity(),
                mandatory,
                "handler registered"
            );
            handlers.entry(hook).or_default().push(descriptor);
        }

        HookRegistry { handlers }
    }
}

impl Default for HookRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a member name into `(hook name, mandatory)` and check the
/// parameter list for construction-time defects.
fn validate(member: &str, params: &[ParamSpec]) -> Result<(String, bool), RegistrationError> {
    let (hook, mandatory) = match member.strip_prefix(BASE_HOOK_PREFIX) {
        Some(stripped) => (stripped, true),
        None => (member, false),
    };
    if hook.is_empty() {
        return Err(RegistrationError::EmptyHookName(member.to_string()));
    }

    for (index, param) in params.iter().enumerate() {
        let Some(default) = &param.default else {
            continue;
        };
        if param.is_output() {
            return Err(RegistrationError::DefaultOnOutput { index });
        }
        if !default_fits(&param.ty, default) {
            return Err(RegistrationError::DefaultTypeMismatch {
                index,
                ty: param.ty.to_string(),
            });
        }
    }

    Ok((hook.to_string(), mandatory))
}

/// A declared default must bind to its parameter without conversion: same
/// runtime type, a fitting numeric, or null into a null-tolerant type.
fn default_fits(ty: &TypeDesc, default: &Value) -> bool {
    if default.is_null() {
        return ty.accepts_null();
    }
    let declared = ty.underlying();
    match default.runtime_type() {
        Some(runtime) if runtime == *declared => true,
        _ => match declared {
            TypeDesc::Num(kind) => default.fits(*kind),
            TypeDesc::Any => true,
            _ => false,
        },
    }
}

/// An immutable, thread-safe registry of handler descriptors.
///
/// Created by [`HookRegistryBuilder::build`]. Lookup never mutates; the
/// registry can be shared freely once built, and its immutability is what
/// makes dispatch-plan memoization coherent for the instance's lifetime.
pub struct HookRegistry {
    handlers: HashMap<String, Vec<Arc<HandlerDescriptor>>>,
}

impl HookRegistry {
    /// All candidates for a hook, in discovery order. Empty for unknown
    /// hook names.
    pub fn candidates(&self, hook: &str) -> &[Arc<HandlerDescriptor>] {
        self.handlers.get(hook).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over the registered hook names.
    pub fn hooks(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Number of candidates registered for a hook.
    pub fn handler_count(&self, hook: &str) -> usize {
        self.candidates(hook).len()
    }

    /// Number of distinct hook names.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry holds no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
