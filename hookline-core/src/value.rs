//! Runtime value model.
//!
//! The engine dispatches on the *runtime* shapes of arguments, so arguments
//! cross the boundary as an explicit tagged union rather than generics. Host
//! objects travel as cheaply-clonable [`ObjectRef`] handles carrying their
//! class ancestry for the subtype test.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::ty::{NumericKind, TypeDesc};

/// Diagnostic label reported by [`Value::type_label`] for null arguments,
/// and used as the null marker inside call-signature keys.
pub const NULL_TYPE_LABEL: &str = "null";

/// A host-provided reference object.
///
/// Implementors report their class name and, for types with a base-class
/// chain, every ancestor name most-derived first. Handler bodies recover the
/// concrete type through [`ObjectRef::downcast_ref`].
pub trait HostObject: Any + Send + Sync {
    /// The object's concrete (most-derived) class name.
    fn type_name(&self) -> &'static str;

    /// The class ancestry, most-derived first. The default is a chain of
    /// one: the concrete class itself.
    fn type_names(&self) -> Vec<&'static str> {
        vec![self.type_name()]
    }

    /// Upcast for downcasting in handler bodies.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a [`HostObject`].
///
/// Cloning is an `Arc` bump; two clones refer to the same underlying object,
/// which is what lets by-reference semantics propagate through dispatch
/// without the engine copying host state.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn HostObject>);

impl ObjectRef {
    /// Wrap a host object.
    pub fn new<T: HostObject>(object: T) -> Self {
        Self(Arc::new(object))
    }

    /// The concrete class name.
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Instance-of test against a declared class name, walking the
    /// ancestor chain.
    pub fn is_instance_of(&self, class: &str) -> bool {
        self.0.type_names().iter().any(|name| *name == class)
    }

    /// Downcast to a concrete host type.
    pub fn downcast_ref<T: HostObject>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Identity comparison: do both handles refer to the same object?
    pub fn same_object(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef<{}>", self.type_name())
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_object(other)
    }
}

/// A runtime argument or return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null marker.
    Null,
    /// Boolean.
    Bool(bool),
    /// Character.
    Char(char),
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Owned string.
    Str(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Shared host object.
    Object(ObjectRef),
}

impl Value {
    /// Whether this is the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The runtime type of this value, `None` for null.
    pub fn runtime_type(&self) -> Option<TypeDesc> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(TypeDesc::Bool),
            Value::Char(_) => Some(TypeDesc::Char),
            Value::I8(_) => Some(TypeDesc::Num(NumericKind::I8)),
            Value::I16(_) => Some(TypeDesc::Num(NumericKind::I16)),
            Value::I32(_) => Some(TypeDesc::Num(NumericKind::I32)),
            Value::I64(_) => Some(TypeDesc::Num(NumericKind::I64)),
            Value::U8(_) => Some(TypeDesc::Num(NumericKind::U8)),
            Value::U16(_) => Some(TypeDesc::Num(NumericKind::U16)),
            Value::U32(_) => Some(TypeDesc::Num(NumericKind::U32)),
            Value::U64(_) => Some(TypeDesc::Num(NumericKind::U64)),
            Value::F32(_) => Some(TypeDesc::Num(NumericKind::F32)),
            Value::F64(_) => Some(TypeDesc::Num(NumericKind::F64)),
            Value::Str(_) => Some(TypeDesc::Str),
            Value::List(_) => Some(TypeDesc::List),
            Value::Object(obj) => Some(TypeDesc::Object(obj.type_name())),
        }
    }

    /// The runtime type label used in call-signature keys.
    ///
    /// Null reports [`NULL_TYPE_LABEL`]; objects report their concrete
    /// class name.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => NULL_TYPE_LABEL,
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// The numeric kind of this value, `None` for non-numeric values.
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self.runtime_type() {
            Some(TypeDesc::Num(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Integer payload widened to `i128`, `None` for non-integer values.
    fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::I8(v) => Some(v as i128),
            Value::I16(v) => Some(v as i128),
            Value::I32(v) => Some(v as i128),
            Value::I64(v) => Some(v as i128),
            Value::U8(v) => Some(v as i128),
            Value::U16(v) => Some(v as i128),
            Value::U32(v) => Some(v as i128),
            Value::U64(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Float payload, `None` for non-float values.
    fn as_float(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v as f64),
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Value-preserving representability check: can this concrete numeric
    /// value be carried by `kind` without losing range or precision?
    ///
    /// Non-numeric values never fit.
    pub fn fits(&self, kind: NumericKind) -> bool {
        if let Some(v) = self.as_i128() {
            return match kind.integer_bounds() {
                Some((lo, hi)) => v >= lo && v <= hi,
                // Integer into float: exact only if the round-trip is
                // lossless.
                None => match kind {
                    NumericKind::F32 => (v as f32) as i128 == v,
                    NumericKind::F64 => (v as f64) as i128 == v,
                    _ => unreachable!(),
                },
            };
        }
        if let Some(x) = self.as_float() {
            return match kind.integer_bounds() {
                Some((lo, hi)) => {
                    if !x.is_finite() || x != x.trunc() {
                        return false;
                    }
                    // Compare in i128 space: casting the bounds to f64
                    // rounds i64::MAX up to 2^63, which would admit
                    // unrepresentable boundary values.
                    let v = x as i128;
                    v >= lo && v <= hi
                }
                None => match kind {
                    NumericKind::F32 => {
                        // NaN narrows to NaN either way but fails the
                        // round-trip equality; callers treating NaN as
                        // non-fitting is the conservative choice.
                        (x as f32) as f64 == x
                    }
                    NumericKind::F64 => true,
                    _ => unreachable!(),
                },
            };
        }
        false
    }

    /// Generic conversion to a declared type.
    ///
    /// Returns the converted value when the conversion preserves validity,
    /// `None` otherwise. This is the feasibility primitive behind
    /// convertible matches for value-like declared types, and the coercion
    /// step applied to adapted buffers before invocation.
    pub fn convert_to(&self, ty: &TypeDesc) -> Option<Value> {
        match ty {
            TypeDesc::Nullable(inner) => {
                if self.is_null() {
                    Some(Value::Null)
                } else {
                    self.convert_to(inner)
                }
            }
            TypeDesc::Any => Some(self.clone()),
            TypeDesc::Bool => match self {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::Str(s) => match s.to_ascii_lowercase().as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => None,
                },
                _ => {
                    if let Some(v) = self.as_i128() {
                        Some(Value::Bool(v != 0))
                    } else {
                        self.as_float().map(|x| Value::Bool(x != 0.0))
                    }
                }
            },
            TypeDesc::Char => match self {
                Value::Char(c) => Some(Value::Char(*c)),
                Value::Str(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(Value::Char(c)),
                        _ => None,
                    }
                }
                _ => {
                    let v = self.as_i128()?;
                    let code = u32::try_from(v).ok()?;
                    char::from_u32(code).map(Value::Char)
                }
            },
            TypeDesc::Num(kind) => self.convert_numeric(*kind),
            TypeDesc::Str => match self {
                Value::Str(s) => Some(Value::Str(s.clone())),
                _ => None,
            },
            TypeDesc::List => match self {
                Value::List(items) => Some(Value::List(items.clone())),
                _ => None,
            },
            TypeDesc::Object(class) => match self {
                Value::Object(obj) if obj.is_instance_of(class) => {
                    Some(Value::Object(obj.clone()))
                }
                _ => None,
            },
        }
    }

    fn convert_numeric(&self, kind: NumericKind) -> Option<Value> {
        match self {
            Value::Bool(b) => make_from_i128(kind, i128::from(*b)),
            Value::Char(c) => make_from_i128(kind, *c as i128),
            Value::Str(s) => {
                if kind.is_integer() {
                    make_integer(kind, s.trim().parse::<i128>().ok()?)
                } else {
                    let x = s.trim().parse::<f64>().ok()?;
                    Some(make_float(kind, x))
                }
            }
            _ => {
                if !self.fits(kind) {
                    return None;
                }
                if let Some(v) = self.as_i128() {
                    make_from_i128(kind, v)
                } else {
                    let x = self.as_float()?;
                    if kind.is_integer() {
                        make_integer(kind, x as i128)
                    } else {
                        Some(make_float(kind, x))
                    }
                }
            }
        }
    }
}

/// Build a value of `kind` from an integer payload, range-checked for
/// integer kinds.
fn make_from_i128(kind: NumericKind, v: i128) -> Option<Value> {
    if kind.is_integer() {
        make_integer(kind, v)
    } else {
        Some(make_float(kind, v as f64))
    }
}

/// Build an integer value of `kind`, range-checked.
fn make_integer(kind: NumericKind, v: i128) -> Option<Value> {
    let (lo, hi) = kind.integer_bounds()?;
    if v < lo || v > hi {
        return None;
    }
    Some(match kind {
        NumericKind::I8 => Value::I8(v as i8),
        NumericKind::I16 => Value::I16(v as i16),
        NumericKind::I32 => Value::I32(v as i32),
        NumericKind::I64 => Value::I64(v as i64),
        NumericKind::U8 => Value::U8(v as u8),
        NumericKind::U16 => Value::U16(v as u16),
        NumericKind::U32 => Value::U32(v as u32),
        NumericKind::U64 => Value::U64(v as u64),
        NumericKind::F32 | NumericKind::F64 => unreachable!(),
    })
}

/// Build a float value of `kind`.
fn make_float(kind: NumericKind, x: f64) -> Value {
    match kind {
        NumericKind::F32 => Value::F32(x as f32),
        NumericKind::F64 => Value::F64(x),
        _ => Value::F64(x),
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}
