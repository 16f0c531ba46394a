//! Arity adaptation.
//!
//! A caller's argument list rarely lines up with a candidate's declared
//! arity: hooks fire with whatever the host supplies, handlers declare what
//! they want. The [`ArgBuffer`] bridges the two: exactly one slot per
//! declared parameter, the overlap copied from the caller, the tail filled
//! from declared defaults or type zeroes, and output slots copied back to
//! the caller after invocation.

use crate::descriptor::HandlerDescriptor;
use crate::value::Value;

/// The per-handler argument buffer plus the bookkeeping needed to write
/// output slots back to the caller's list.
#[derive(Debug)]
pub struct ArgBuffer {
    slots: Vec<Value>,
    /// Number of leading slots filled from the caller's list. Only these
    /// positions can be written back.
    overlap: usize,
}

impl ArgBuffer {
    /// Build the buffer for one candidate from the caller's argument list.
    ///
    /// Copies `min(received, arity)` positions from the caller; remaining
    /// declared parameters take their declared default, else the declared
    /// type's zero value for value-like types, else null. Caller arguments
    /// beyond the declared arity are ignored.
    pub fn adapt(desc: &HandlerDescriptor, args: &[Value]) -> Self {
        let arity = desc.arity();
        let overlap = args.len().min(arity);

        let mut slots = Vec::with_capacity(arity);
        slots.extend_from_slice(&args[..overlap]);
        for param in &desc.params()[overlap..] {
            slots.push(match &param.default {
                Some(default) => default.clone(),
                None => param.ty.default_value(),
            });
        }

        Self { slots, overlap }
    }

    /// Coerce input slots to their declared types where a validity-preserving
    /// conversion exists, so handler bodies always observe declared kinds.
    ///
    /// Output slots and reference-like slots pass through untouched; a slot
    /// with no feasible conversion is left as supplied (the matcher already
    /// excluded such candidates from selection, mandatory handlers take
    /// arguments as they come).
    pub fn coerce(&mut self, desc: &HandlerDescriptor) {
        for (param, slot) in desc.params().iter().zip(self.slots.iter_mut()) {
            if param.is_output() || !param.ty.underlying().is_value_like() {
                continue;
            }
            if let Some(converted) = slot.convert_to(&param.ty) {
                *slot = converted;
            }
        }
    }

    /// Copy post-invocation values of output and by-reference slots back
    /// into the caller's argument list.
    ///
    /// Only positions inside the overlap region write back; synthesized
    /// tail slots have no caller-side index to land on.
    pub fn write_back(&self, desc: &HandlerDescriptor, args: &mut [Value]) {
        for index in 0..self.overlap {
            if desc.params()[index].carries_back() {
                args[index] = self.slots[index].clone();
            }
        }
    }

    /// The adapted slots.
    pub fn as_slice(&self) -> &[Value] {
        &self.slots
    }

    /// The adapted slots, mutably (handlers write output slots here).
    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        &mut self.slots
    }

    /// Number of leading slots filled from the caller's list.
    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::descriptor::{HandlerFn, ParamSpec};
    use crate::ty::{NumericKind, TypeDesc};

    fn noop() -> HandlerFn {
        Arc::new(|_args| Ok(Value::Null))
    }

    fn candidate(params: Vec<ParamSpec>) -> HandlerDescriptor {
        HandlerDescriptor::new("H", params, false, noop())
    }

    #[test]
    fn shortfall_fills_defaults_then_zeroes_then_null() {
        let desc = candidate(vec![
            ParamSpec::new(TypeDesc::Num(NumericKind::I32)),
            ParamSpec::new(TypeDesc::Str).with_default("x"),
            ParamSpec::new(TypeDesc::Num(NumericKind::U8)),
            ParamSpec::new(TypeDesc::Object("Player")),
        ]);
        let buffer = ArgBuffer::adapt(&desc, &[Value::I32(5)]);
        assert_eq!(
            buffer.as_slice(),
            &[
                Value::I32(5),
                Value::Str("x".into()),
                Value::U8(0),
                Value::Null,
            ]
        );
        assert_eq!(buffer.overlap(), 1);
    }

    #[test]
    fn surplus_arguments_are_truncated() {
        let desc = candidate(vec![ParamSpec::new(TypeDesc::Num(NumericKind::I32))]);
        let buffer = ArgBuffer::adapt(&desc, &[Value::I32(1), Value::I32(2), Value::I32(3)]);
        assert_eq!(buffer.as_slice(), &[Value::I32(1)]);
        assert_eq!(buffer.overlap(), 1);
    }

    #[test]
    fn coerce_rewrites_to_declared_kinds() {
        let desc = candidate(vec![
            ParamSpec::new(TypeDesc::Num(NumericKind::I64)),
            ParamSpec::new(TypeDesc::Num(NumericKind::I32)),
            ParamSpec::new(TypeDesc::Any),
        ]);
        let mut buffer = ArgBuffer::adapt(
            &desc,
            &[Value::I32(5), Value::Str("7".into()), Value::Str("raw".into())],
        );
        buffer.coerce(&desc);
        assert_eq!(
            buffer.as_slice(),
            &[Value::I64(5), Value::I32(7), Value::Str("raw".into())]
        );
    }

    #[test]
    fn write_back_covers_only_the_overlap() {
        let desc = candidate(vec![
            ParamSpec::by_ref(TypeDesc::Num(NumericKind::I32)),
            ParamSpec::new(TypeDesc::Num(NumericKind::I32)),
            ParamSpec::output(TypeDesc::Num(NumericKind::I32)),
        ]);
        // Caller supplied two of three arguments; the output slot is
        // synthesized and has nowhere to write back.
        let mut caller = vec![Value::I32(1), Value::I32(2)];
        let mut buffer = ArgBuffer::adapt(&desc, &caller);
        buffer.as_mut_slice()[0] = Value::I32(10);
        buffer.as_mut_slice()[1] = Value::I32(20);
        buffer.as_mut_slice()[2] = Value::I32(30);
        buffer.write_back(&desc, &mut caller);
        // Slot 0 is by-ref: written back. Slot 1 is plain input: not
        // written back. Slot 2 is outside the overlap.
        assert_eq!(caller, vec![Value::I32(10), Value::I32(2)]);
    }

    #[test]
    fn output_slot_in_overlap_writes_back() {
        let desc = candidate(vec![ParamSpec::output(TypeDesc::Num(NumericKind::I32))]);
        let mut caller = vec![Value::Null];
        let mut buffer = ArgBuffer::adapt(&desc, &caller);
        buffer.as_mut_slice()[0] = Value::I32(42);
        buffer.write_back(&desc, &mut caller);
        assert_eq!(caller, vec![Value::I32(42)]);
    }
}
