//! Resolution cache.
//!
//! Resolving a hook firing means grading every candidate through the
//! signature matcher — work that depends only on the hook name and the
//! runtime type shape of the arguments. Since the registry is frozen after
//! construction, the chosen plan for a given shape never changes, so plans
//! are memoized per instance under a [`SignatureKey`]. Empty plans are
//! cached too: registry immutability makes that strictly safe.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use hookline_core::{ArgBuffer, HandlerDescriptor, MatchKind, Value, match_signature};

use crate::registry::HookRegistry;

/// Memoization key: hook name plus the ordered runtime-type labels of the
/// concrete arguments (null marker included).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    hook: String,
    shape: Vec<&'static str>,
}

impl SignatureKey {
    /// Derive the key for a concrete call.
    pub fn new(hook: &str, args: &[Value]) -> Self {
        Self {
            hook: hook.to_string(),
            shape: args.iter().map(Value::type_label).collect(),
        }
    }

    /// The hook name.
    pub fn hook(&self) -> &str {
        &self.hook
    }

    /// The argument type labels.
    pub fn shape(&self) -> &[&'static str] {
        &self.shape
    }
}

/// How a plan entry was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// A base handler, included irrespective of signature match.
    Mandatory,
    /// The non-mandatory winner, every position exact.
    Exact,
    /// The non-mandatory winner, at least one position converted.
    Convertible,
}

/// One resolved handler within a plan.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// The chosen descriptor, shared with the registry.
    pub descriptor: Arc<HandlerDescriptor>,
    /// Why it was chosen.
    pub kind: ResolutionKind,
}

/// The resolved, ordered handler set for one call signature: every
/// mandatory candidate plus at most one non-mandatory winner, in registry
/// discovery order.
#[derive(Debug, Clone, Default)]
pub struct DispatchPlan {
    entries: Vec<PlanEntry>,
}

impl DispatchPlan {
    /// Iterate entries in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan invokes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-instance memoization of dispatch plans.
///
/// Lazily populated from any calling thread; two threads racing on the
/// same first-time key may compute the same deterministic plan twice, and
/// the last insert wins — harmless by construction.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    plans: DashMap<SignatureKey, Arc<DispatchPlan>>,
}

impl ResolutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            plans: DashMap::new(),
        }
    }

    /// Return the memoized plan for this call signature, computing and
    /// storing it on first sight.
    pub fn resolve(
        &self,
        registry: &HookRegistry,
        hook: &str,
        args: &[Value],
    ) -> Arc<DispatchPlan> {
        let key = SignatureKey::new(hook, args);
        if let Some(plan) = self.plans.get(&key) {
            return Arc::clone(&plan);
        }
        let plan = Arc::new(compute_plan(registry, hook, args));
        self.plans.insert(key, Arc::clone(&plan));
        plan
    }

    /// Number of memoized plans.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether no plan has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Grade every candidate and assemble the plan.
///
/// Selection walks candidates in discovery order: the first exact match
/// fixes the non-mandatory winner; absent an exact match the *last*
/// convertible candidate wins (a replicated compatibility quirk — see
/// DESIGN.md). Mandatory candidates are collected unconditionally. The
/// assembled plan preserves discovery order across both groups.
fn compute_plan(registry: &HookRegistry, hook: &str, args: &[Value]) -> DispatchPlan {
    let candidates = registry.candidates(hook);

    let mut winner: Option<(usize, ResolutionKind)> = None;
    for (index, descriptor) in candidates.iter().enumerate() {
        if descriptor.is_mandatory() {
            continue;
        }
        if matches!(winner, Some((_, ResolutionKind::Exact))) {
            // First exact wins; stop grading further non-mandatory
            // candidates.
            continue;
        }
        let buffer = ArgBuffer::adapt(descriptor, args);
        let graded = match_signature(descriptor, buffer.as_slice());
        trace!(
            hook,
            identity = %descriptor.identity(),
            kind = ?graded,
            "graded candidate"
        );
        match graded {
            MatchKind::Exact => winner = Some((index, ResolutionKind::Exact)),
            MatchKind::Convertible => winner = Some((index, ResolutionKind::Convertible)),
            MatchKind::NoMatch => {}
        }
    }

    let entries = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, descriptor)| {
            if descriptor.is_mandatory() {
                Some(PlanEntry {
                    descriptor: Arc::clone(descriptor),
                    kind: ResolutionKind::Mandatory,
                })
            } else {
                match winner {
                    Some((chosen, kind)) if chosen == index => Some(PlanEntry {
                        descriptor: Arc::clone(descriptor),
                        kind,
                    }),
                    _ => None,
                }
            }
        })
        .collect::<Vec<_>>();

    debug!(
        hook,
        candidates = candidates.len(),
        chosen = entries.len(),
        "dispatch plan computed"
    );

    DispatchPlan { entries }
}

#[cfg(test)]
mod tests {
    use hookline_core::{NumericKind, ParamSpec, TypeDesc};

    use super::*;
    use crate::registry::HookRegistryBuilder;

    fn registry() -> HookRegistry {
        HookRegistryBuilder::new()
            .handler(
                0,
                "H",
                vec![ParamSpec::new(TypeDesc::Num(NumericKind::I32))],
                |_args| Ok(Value::Str("int".into())),
            )
            .handler(0, "H", vec![ParamSpec::new(TypeDesc::Any)], |_args| {
                Ok(Value::Str("any".into()))
            })
            .handler(0, "base_H", vec![], |_args| Ok(Value::Null))
            .build()
    }

    #[test]
    fn signature_keys_distinguish_shapes_not_values() {
        let a = SignatureKey::new("H", &[Value::I32(1), Value::Null]);
        let b = SignatureKey::new("H", &[Value::I32(99), Value::Null]);
        let c = SignatureKey::new("H", &[Value::I64(1), Value::Null]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.shape(), &["i32", "null"]);
    }

    #[test]
    fn exact_winner_beats_convertible() {
        let registry = registry();
        let cache = ResolutionCache::new();
        let plan = cache.resolve(&registry, "H", &[Value::I32(5)]);

        let kinds: Vec<ResolutionKind> = plan.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ResolutionKind::Exact, ResolutionKind::Mandatory]);
        assert_eq!(plan.iter().next().unwrap().descriptor.identity(), "H(i32)");
    }

    #[test]
    fn last_convertible_wins_absent_exact() {
        let registry = HookRegistryBuilder::new()
            .handler(0, "H", vec![ParamSpec::new(TypeDesc::Any)], |_args| {
                Ok(Value::Str("first".into()))
            })
            .handler(0, "H", vec![ParamSpec::new(TypeDesc::Any)], |_args| {
                Ok(Value::Str("second".into()))
            })
            .build();
        let cache = ResolutionCache::new();
        let plan = cache.resolve(&registry, "H", &[Value::Str("x".into())]);
        assert_eq!(plan.len(), 1);

        let entry = plan.iter().next().unwrap();
        assert_eq!(entry.kind, ResolutionKind::Convertible);
        let mut buffer = vec![Value::Str("x".into())];
        assert_eq!(
            entry.descriptor.invoke(&mut buffer).unwrap(),
            Value::Str("second".into())
        );
    }

    #[test]
    fn plans_are_memoized_including_empty_ones() {
        let registry = registry();
        let cache = ResolutionCache::new();

        let first = cache.resolve(&registry, "H", &[Value::I32(1)]);
        let second = cache.resolve(&registry, "H", &[Value::I32(2)]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let empty = cache.resolve(&registry, "Unknown", &[]);
        assert!(empty.is_empty());
        assert_eq!(cache.len(), 2);
        let again = cache.resolve(&registry, "Unknown", &[]);
        assert!(Arc::ptr_eq(&empty, &again));
    }

    #[test]
    fn mandatory_candidates_survive_any_shape() {
        let registry = HookRegistryBuilder::new()
            .handler(
                0,
                "H",
                vec![ParamSpec::new(TypeDesc::Num(NumericKind::I32))],
                |_args| Ok(Value::Str("int".into())),
            )
            .handler(0, "base_H", vec![], |_args| Ok(Value::Null))
            .build();
        let cache = ResolutionCache::new();
        // An unparseable string matches no non-mandatory candidate, but the
        // base handler still joins the plan.
        let plan = cache.resolve(&registry, "H", &[Value::Str("nope".into())]);
        let kinds: Vec<ResolutionKind> = plan.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ResolutionKind::Mandatory]);
    }
}
