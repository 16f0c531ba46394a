//! Error types for the dispatch engine.
//!
//! Two failure families exist, mirroring the engine's lifecycle:
//!
//! - [`RegistrationError`] - construction-time problems with one candidate
//!   handler; fatal to that descriptor only, never to the registry.
//! - [`DispatchError`] - a handler body failed during `fire`; the original
//!   cause is surfaced transparently, never wrapped in an envelope.

use thiserror::Error;

/// A boxed error type for opaque handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A malformed handler registration.
///
/// The registry builder logs these and drops the offending descriptor;
/// construction of the remaining registry continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The member name reduces to an empty hook name.
    #[error("member name {0:?} yields an empty hook name")]
    EmptyHookName(String),

    /// A declared default value cannot bind to its parameter's type.
    #[error("default value for parameter {index} does not fit declared type {ty}")]
    DefaultTypeMismatch {
        /// Zero-based parameter position.
        index: usize,
        /// Rendered declared type.
        ty: String,
    },

    /// Output parameters carry no input, so a default is meaningless.
    #[error("output parameter {index} cannot declare a default value")]
    DefaultOnOutput {
        /// Zero-based parameter position.
        index: usize,
    },
}

/// An error surfaced by `fire`.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler body raised. The underlying cause is forwarded unwrapped:
    /// `Display` and `source` both come straight from the handler's error.
    #[error(transparent)]
    Handler(BoxError),
}

impl DispatchError {
    /// Extract the original handler error.
    pub fn into_cause(self) -> BoxError {
        match self {
            DispatchError::Handler(cause) => cause,
        }
    }
}

impl From<BoxError> for DispatchError {
    fn from(cause: BoxError) -> Self {
        DispatchError::Handler(cause)
    }
}
