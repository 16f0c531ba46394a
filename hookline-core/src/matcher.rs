//! Signature matching.
//!
//! Pure functions that decide whether a concrete (already arity-adapted)
//! argument buffer can bind to a handler's declared parameters, and how
//! well. The three-way [`MatchKind`] outcome drives candidate selection:
//! exact matches beat convertible ones, and a failed position fails the
//! whole candidate.

use crate::descriptor::{HandlerDescriptor, ParamSpec};
use crate::ty::TypeDesc;
use crate::value::Value;

/// Outcome of matching one candidate against an adapted buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// At least one position failed to bind.
    NoMatch,
    /// Every position bound, at least one through a non-trivial conversion.
    Convertible,
    /// Every position bound at its declared type (including value-preserving
    /// numeric widening).
    Exact,
}

/// Outcome at a single parameter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionMatch {
    Fail,
    Convertible,
    Exact,
}

/// Match an adapted argument buffer against a candidate's declared
/// parameters.
///
/// The buffer must already be adapted to the candidate's arity (see the
/// adapter module); each slot is judged independently and the per-position
/// outcomes fold into the candidate's overall [`MatchKind`].
pub fn match_signature(desc: &HandlerDescriptor, buffer: &[Value]) -> MatchKind {
    debug_assert_eq!(buffer.len(), desc.arity());

    let mut converted = false;
    for (param, arg) in desc.params().iter().zip(buffer) {
        match match_position(param, arg) {
            PositionMatch::Fail => return MatchKind::NoMatch,
            PositionMatch::Convertible => converted = true,
            PositionMatch::Exact => {}
        }
    }
    if converted {
        MatchKind::Convertible
    } else {
        MatchKind::Exact
    }
}

fn match_position(param: &ParamSpec, arg: &Value) -> PositionMatch {
    // Output slots carry no input; whatever placeholder the caller supplied
    // binds unconditionally.
    if param.is_output() {
        return PositionMatch::Exact;
    }

    // Null binds only where the declared type tolerates it.
    if arg.is_null() {
        return if param.ty.accepts_null() {
            PositionMatch::Exact
        } else {
            PositionMatch::Fail
        };
    }

    let declared = param.ty.underlying();

    // Exact runtime-type equality. By-reference is a parameter flag, not a
    // type wrapper, so the by-ref variant of a type compares equal here.
    if let Some(runtime) = arg.runtime_type() {
        if runtime == *declared {
            return PositionMatch::Exact;
        }
    }

    // Numeric widening: both sides numeric-like and the concrete value
    // representable in the declared kind without a validity failure.
    if let TypeDesc::Num(kind) = declared {
        if arg.numeric_kind().is_some() && arg.fits(*kind) {
            return PositionMatch::Exact;
        }
    }

    // Convertible, gated by feasibility.
    if declared.is_value_like() {
        if arg.convert_to(declared).is_some() {
            PositionMatch::Convertible
        } else {
            PositionMatch::Fail
        }
    } else {
        match declared {
            // The top type accepts every non-null value, never exactly.
            TypeDesc::Any => PositionMatch::Convertible,
            TypeDesc::Object(class) => match arg {
                Value::Object(obj) if obj.is_instance_of(class) => PositionMatch::Convertible,
                _ => PositionMatch::Fail,
            },
            // A non-identical runtime type cannot become a string or list
            // instance; identity was already handled above.
            _ => PositionMatch::Fail,
        }
    }
}
