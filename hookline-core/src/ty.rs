//! Declared parameter types.
//!
//! A [`TypeDesc`] is the *declared* shape of one handler parameter: what the
//! handler says it accepts, as opposed to the runtime shape of a concrete
//! [`Value`](crate::Value). The matcher compares the two; the adapter uses
//! declared types to synthesize default slot values.

use std::fmt;

use crate::value::Value;

/// The numeric kinds a parameter can declare or a value can carry.
///
/// Boolean and character kinds are deliberately excluded: they never take
/// part in numeric widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl NumericKind {
    /// Whether this is one of the integer kinds.
    pub fn is_integer(self) -> bool {
        !self.is_float()
    }

    /// Whether this is one of the floating-point kinds.
    pub fn is_float(self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }

    /// Inclusive value range for integer kinds, `None` for floats.
    pub(crate) fn integer_bounds(self) -> Option<(i128, i128)> {
        match self {
            NumericKind::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            NumericKind::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            NumericKind::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            NumericKind::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            NumericKind::U8 => Some((0, u8::MAX as i128)),
            NumericKind::U16 => Some((0, u16::MAX as i128)),
            NumericKind::U32 => Some((0, u32::MAX as i128)),
            NumericKind::U64 => Some((0, u64::MAX as i128)),
            NumericKind::F32 | NumericKind::F64 => None,
        }
    }

    /// Diagnostic name, matching the runtime labels used in cache keys.
    pub fn name(self) -> &'static str {
        match self {
            NumericKind::I8 => "i8",
            NumericKind::I16 => "i16",
            NumericKind::I32 => "i32",
            NumericKind::I64 => "i64",
            NumericKind::U8 => "u8",
            NumericKind::U16 => "u16",
            NumericKind::U32 => "u32",
            NumericKind::U64 => "u64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared type of one handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// The top type: accepts any non-null value (and null, being
    /// reference-like).
    Any,
    /// Boolean value type.
    Bool,
    /// Character value type.
    Char,
    /// One of the numeric value types.
    Num(NumericKind),
    /// String reference type.
    Str,
    /// List reference type.
    List,
    /// A named host-object reference type. Matching uses the object's
    /// ancestor chain, so a declared base class accepts derived instances.
    Object(&'static str),
    /// An explicitly nullable wrapper around a value type.
    Nullable(Box<TypeDesc>),
}

impl TypeDesc {
    /// Shorthand for a numeric declared type.
    pub fn num(kind: NumericKind) -> Self {
        TypeDesc::Num(kind)
    }

    /// Wrap this type as explicitly nullable.
    pub fn nullable(self) -> Self {
        TypeDesc::Nullable(Box::new(self))
    }

    /// Strip a `Nullable` wrapper, if any.
    pub fn underlying(&self) -> &TypeDesc {
        match self {
            TypeDesc::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Whether this is a value-like type (bool, char, numeric).
    ///
    /// Value-like types have a zero default and participate in the generic
    /// conversion check; they reject null unless wrapped in `Nullable`.
    pub fn is_value_like(&self) -> bool {
        matches!(
            self,
            TypeDesc::Bool | TypeDesc::Char | TypeDesc::Num(_)
        )
    }

    /// Whether this is a reference-like type (any, string, list, object).
    pub fn is_reference_like(&self) -> bool {
        matches!(
            self,
            TypeDesc::Any | TypeDesc::Str | TypeDesc::List | TypeDesc::Object(_)
        )
    }

    /// Whether a null argument can bind to this declared type.
    pub fn accepts_null(&self) -> bool {
        self.is_reference_like() || matches!(self, TypeDesc::Nullable(_))
    }

    /// The value an unfilled slot of this type receives when the parameter
    /// declares no default: the zero value for value-like types, null
    /// otherwise.
    pub fn default_value(&self) -> Value {
        match self {
            TypeDesc::Bool => Value::Bool(false),
            TypeDesc::Char => Value::Char('\0'),
            TypeDesc::Num(kind) => match kind {
                NumericKind::I8 => Value::I8(0),
                NumericKind::I16 => Value::I16(0),
                NumericKind::I32 => Value::I32(0),
                NumericKind::I64 => Value::I64(0),
                NumericKind::U8 => Value::U8(0),
                NumericKind::U16 => Value::U16(0),
                NumericKind::U32 => Value::U32(0),
                NumericKind::U64 => Value::U64(0),
                NumericKind::F32 => Value::F32(0.0),
                NumericKind::F64 => Value::F64(0.0),
            },
            TypeDesc::Any
            | TypeDesc::Str
            | TypeDesc::List
            | TypeDesc::Object(_)
            | TypeDesc::Nullable(_) => Value::Null,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => f.write_str("any"),
            TypeDesc::Bool => f.write_str("bool"),
            TypeDesc::Char => f.write_str("char"),
            TypeDesc::Num(kind) => f.write_str(kind.name()),
            TypeDesc::Str => f.write_str("string"),
            TypeDesc::List => f.write_str("list"),
            TypeDesc::Object(name) => f.write_str(name),
            TypeDesc::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_like_rejects_null_unless_nullable() {
        assert!(!TypeDesc::Num(NumericKind::I32).accepts_null());
        assert!(TypeDesc::Num(NumericKind::I32).nullable().accepts_null());
        assert!(TypeDesc::Str.accepts_null());
        assert!(TypeDesc::Any.accepts_null());
    }

    #[test]
    fn default_values() {
        assert_eq!(TypeDesc::Bool.default_value(), Value::Bool(false));
        assert_eq!(
            TypeDesc::Num(NumericKind::U16).default_value(),
            Value::U16(0)
        );
        assert_eq!(TypeDesc::Str.default_value(), Value::Null);
        assert_eq!(
            TypeDesc::Num(NumericKind::I64).nullable().default_value(),
            Value::Null
        );
    }

    #[test]
    fn display_rendering() {
        assert_eq!(TypeDesc::Num(NumericKind::F64).to_string(), "f64");
        assert_eq!(TypeDesc::Object("Player").to_string(), "Player");
        assert_eq!(
            TypeDesc::Num(NumericKind::I32).nullable().to_string(),
            "i32?"
        );
    }

    #[test]
    fn numeric_kind_classification() {
        assert!(NumericKind::U64.is_integer());
        assert!(NumericKind::F32.is_float());
        assert_eq!(
            NumericKind::I8.integer_bounds(),
            Some((i8::MIN as i128, i8::MAX as i128))
        );
        assert_eq!(NumericKind::F64.integer_bounds(), None);
    }
}
