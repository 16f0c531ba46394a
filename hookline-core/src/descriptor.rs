//! Handler descriptors.
//!
//! A [`HandlerDescriptor`] is the immutable record of one registered
//! candidate: the hook it answers to, its declared parameter shape, whether
//! it is a mandatory (base) handler, and the opaque callable bound to the
//! originating plugin instance. Descriptors are built once during registry
//! construction and never change afterwards.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use bitflags::bitflags;

use crate::error::BoxError;
use crate::ty::TypeDesc;
use crate::value::Value;

bitflags! {
    /// Directional flags on a parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParamFlags: u8 {
        /// Output-only slot: carries no input, the handler writes it.
        const OUTPUT = 1 << 0;
        /// By-reference slot: carries input and writes back on return.
        const BY_REF = 1 << 1;
    }
}

/// Declared shape of one handler parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Declared type.
    pub ty: TypeDesc,
    /// Directional flags.
    pub flags: ParamFlags,
    /// Declared default, used when the caller supplies fewer arguments.
    pub default: Option<Value>,
}

impl ParamSpec {
    /// A plain input parameter of the given type.
    pub fn new(ty: TypeDesc) -> Self {
        Self {
            ty,
            flags: ParamFlags::empty(),
            default: None,
        }
    }

    /// An output parameter of the given type.
    pub fn output(ty: TypeDesc) -> Self {
        Self {
            ty,
            flags: ParamFlags::OUTPUT,
            default: None,
        }
    }

    /// A by-reference parameter of the given type.
    pub fn by_ref(ty: TypeDesc) -> Self {
        Self {
            ty,
            flags: ParamFlags::BY_REF,
            default: None,
        }
    }

    /// Attach a declared default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether this is an output-only slot.
    pub fn is_output(&self) -> bool {
        self.flags.contains(ParamFlags::OUTPUT)
    }

    /// Whether this slot carries input and writes back.
    pub fn is_by_ref(&self) -> bool {
        self.flags.contains(ParamFlags::BY_REF)
    }

    /// Whether this parameter declares a default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether the post-invocation slot value must be copied back to the
    /// caller's argument list.
    pub fn carries_back(&self) -> bool {
        self.flags
            .intersects(ParamFlags::OUTPUT | ParamFlags::BY_REF)
    }
}

/// The opaque callable bound to a plugin instance.
///
/// Invocation receives the adapted argument buffer (exactly as many slots
/// as declared parameters) and may mutate output slots in place.
pub type HandlerFn = Arc<dyn Fn(&mut [Value]) -> Result<Value, BoxError> + Send + Sync>;

/// Immutable description of one registered handler.
pub struct HandlerDescriptor {
    hook: String,
    params: Vec<ParamSpec>,
    mandatory: bool,
    func: HandlerFn,
}

impl HandlerDescriptor {
    /// Build a descriptor. Registry construction is the only expected
    /// caller; descriptors are frozen from then on.
    pub fn new(
        hook: impl Into<String>,
        params: Vec<ParamSpec>,
        mandatory: bool,
        func: HandlerFn,
    ) -> Self {
        Self {
            hook: hook.into(),
            params,
            mandatory,
            func,
        }
    }

    /// The hook's logical name.
    pub fn hook(&self) -> &str {
        &self.hook
    }

    /// Declared parameters, in order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether this is a mandatory (base) handler, always included in
    /// dispatch plans irrespective of signature match.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// The decorated diagnostic identity: the bare hook name for
    /// parameterless handlers, otherwise the name with a parenthesized
    /// declared-type list. Distinguishes same-name candidates that differ
    /// in arity or types; matching itself is structural and never consults
    /// this string.
    pub fn identity(&self) -> String {
        if self.params.is_empty() {
            return self.hook.clone();
        }
        let mut rendered = String::with_capacity(self.hook.len() + 16);
        rendered.push_str(&self.hook);
        rendered.push('(');
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                rendered.push_str(", ");
            }
            let _ = write!(rendered, "{}", param.ty);
        }
        rendered.push(')');
        rendered
    }

    /// Run the handler body against an adapted buffer.
    pub fn invoke(&self, buffer: &mut [Value]) -> Result<Value, BoxError> {
        debug_assert_eq!(buffer.len(), self.arity());
        (self.func)(buffer)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("hook", &self.hook)
            .field("params", &self.params)
            .field("mandatory", &self.mandatory)
            .finish_non_exhaustive()
    }
}
