//! # hookline-core
//!
//! Data model and pure algorithms for the Hookline dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugin hosts and tooling that don't need the full `hookline` orchestrator.
//!
//! # Layers
//!
//! The engine resolves a hook firing in three pure stages, all defined here:
//!
//! ## Runtime values ([`Value`], [`TypeDesc`])
//!
//! Arguments cross the host boundary as an explicit tagged union because
//! dispatch happens on *runtime* shapes: the same hook name fired with an
//! `i64` and with a `Player` object can land on different handlers.
//! [`TypeDesc`] is the declared side of the same coin.
//!
//! ## Candidate description ([`HandlerDescriptor`], [`ParamSpec`])
//!
//! One immutable record per registered handler: hook name, declared
//! parameter shape, mandatory flag, bound callable. Built once at registry
//! construction, never mutated.
//!
//! ## Matching and adaptation ([`match_signature`], [`ArgBuffer`])
//!
//! The matcher grades a candidate against an adapted buffer as
//! `{no-match, convertible, exact}`; the adapter reconciles open arity
//! (defaults, zero-fill, truncation) and copies output slots back to the
//! caller after invocation.
//!
//! # Error Types
//!
//! - [`RegistrationError`] - construction-time, per-descriptor
//! - [`DispatchError`] - invocation failure, original cause surfaced
//!   transparently

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod adapter;
mod descriptor;
mod error;
mod matcher;
mod ty;
mod value;

// Re-exports
pub use adapter::ArgBuffer;
pub use descriptor::{HandlerDescriptor, HandlerFn, ParamFlags, ParamSpec};
pub use error::{BoxError, DispatchError, RegistrationError};
pub use matcher::{MatchKind, match_signature};
pub use ty::{NumericKind, TypeDesc};
pub use value::{HostObject, NULL_TYPE_LABEL, ObjectRef, Value};
