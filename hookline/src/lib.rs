//! # hookline - Runtime-Typed Hook Dispatch Engine
//!
//! `hookline` is the host-side dispatch engine of a plugin runtime:
//! third-party plugin instances register named hooks at construction time,
//! and the host fires them by name with concrete argument lists. The engine
//! decides — from the *runtime* shapes of the arguments — which of the
//! registered handlers to invoke, adapts the call to each handler's declared
//! arity, invokes them in discovery order, and reconciles return values and
//! output parameters.
//!
//! ## Quick Start
//!
//! ```rust
//! use hookline::{HookDispatcher, HookRegistryBuilder, ParamSpec, TypeDesc, Value};
//!
//! let registry = HookRegistryBuilder::new()
//!     .handler(
//!         0,
//!         "OnGreet",
//!         vec![ParamSpec::new(TypeDesc::Str)],
//!         |args| match &args[0] {
//!             Value::Str(name) => Ok(Value::Str(format!("hello {name}"))),
//!             _ => Ok(Value::Null),
//!         },
//!     )
//!     .build();
//!
//! let dispatcher = HookDispatcher::new(registry);
//! let mut args = vec![Value::from("world")];
//! let result = dispatcher.fire("OnGreet", &mut args).unwrap();
//! assert_eq!(result, Value::from("hello world"));
//! ```
//!
//! ## Resolution model
//!
//! - Registration is explicit and happens once, through
//!   [`HookRegistryBuilder`]; the frozen [`HookRegistry`] is immutable.
//! - Candidates are graded `{no-match, convertible, exact}` by the
//!   signature matcher; the first exact match wins, otherwise the last
//!   convertible one does.
//! - Handlers whose member name carries the `base_` prefix are mandatory:
//!   they join every plan for their hook regardless of argument shape.
//! - Plans are memoized per (hook name, argument type shape) in a
//!   concurrency-safe cache for the dispatcher's lifetime.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod cache;
pub mod dispatch;
pub mod registry;

// Core data model
pub use hookline_core::{
    ArgBuffer,
    BoxError,
    DispatchError,
    HandlerDescriptor,
    HandlerFn,
    HostObject,
    MatchKind,
    NULL_TYPE_LABEL,
    NumericKind,
    ObjectRef,
    ParamFlags,
    ParamSpec,
    RegistrationError,
    TypeDesc,
    Value,
    match_signature,
};

// Orchestration
pub use cache::{DispatchPlan, PlanEntry, ResolutionCache, ResolutionKind, SignatureKey};
pub use dispatch::HookDispatcher;
pub use registry::{BASE_HOOK_PREFIX, HookRegistry, HookRegistryBuilder};

/// Prelude module - common imports for hookline hosts.
///
/// # Usage
///
/// ```rust,ignore
/// use hookline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, DispatchError, HookDispatcher, HookRegistry, HookRegistryBuilder, HostObject,
        NumericKind, ObjectRef, ParamSpec, TypeDesc, Value,
    };
}
