//! End-to-end `fire` semantics: empty plans, mandatory handlers, arity
//! adaptation, output reconciliation and failure propagation.

use std::fmt;

use hookline::{
    DispatchError, HookDispatcher, HookRegistryBuilder, NumericKind, ParamSpec, TypeDesc, Value,
};

mod common;
use common::CallLog;

#[test]
fn firing_an_unknown_hook_is_not_an_error() {
    let dispatcher = HookDispatcher::new(HookRegistryBuilder::new().build());

    let mut args = vec![Value::I32(5), Value::from("untouched")];
    let result = dispatcher.fire("NeverRegistered", &mut args).unwrap();

    assert_eq!(result, Value::Null);
    assert_eq!(args, vec![Value::I32(5), Value::from("untouched")]);
}

#[test]
fn lone_mandatory_handler_runs_regardless_of_argument_shape() {
    let log = CallLog::new();
    let seen = log.clone();
    let registry = HookRegistryBuilder::new()
        .handler(
            0,
            "base_OnTick",
            vec![
                ParamSpec::new(TypeDesc::Num(NumericKind::I32)),
                ParamSpec::new(TypeDesc::Num(NumericKind::I32)),
            ],
            move |args| {
                seen.record("base", args);
                Ok(Value::Bool(true))
            },
        )
        .build();
    let dispatcher = HookDispatcher::new(registry);

    // Arity shortfall: the missing slot zero-fills.
    dispatcher.fire("OnTick", &mut [Value::I32(7)]).unwrap();
    // Arity surplus: extra arguments are ignored.
    dispatcher
        .fire("OnTick", &mut [Value::I32(1), Value::I32(2), Value::I32(3)])
        .unwrap();
    // Shape that matches nothing: a mandatory handler still runs.
    dispatcher
        .fire("OnTick", &mut [Value::from("not a number")])
        .unwrap();

    assert_eq!(log.len(), 3);
    let buffers = log.buffers();
    assert_eq!(buffers[0], vec![Value::I32(7), Value::I32(0)]);
    assert_eq!(buffers[1], vec![Value::I32(1), Value::I32(2)]);
    assert_eq!(
        buffers[2],
        vec![Value::from("not a number"), Value::I32(0)]
    );
}

#[test]
fn arity_shortfall_fills_declared_defaults() {
    let log = CallLog::new();
    let seen = log.clone();
    let registry = HookRegistryBuilder::new()
        .handler(
            0,
            "OnCommand",
            vec![
                ParamSpec::new(TypeDesc::Num(NumericKind::I32)),
                ParamSpec::new(TypeDesc::Str).with_default("x"),
            ],
            move |args| {
                seen.record("cmd", args);
                Ok(Value::Null)
            },
        )
        .build();
    let dispatcher = HookDispatcher::new(registry);

    dispatcher.fire("OnCommand", &mut [Value::I32(5)]).unwrap();

    assert_eq!(
        log.buffers()[0],
        vec![Value::I32(5), Value::Str("x".into())]
    );
}

#[test]
fn output_parameter_propagates_through_fire() {
    let registry = HookRegistryBuilder::new()
        .handler(
            0,
            "OnCount",
            vec![ParamSpec::output(TypeDesc::Num(NumericKind::I32))],
            |args| {
                args[0] = Value::I32(42);
                Ok(Value::Bool(true))
            },
        )
        .build();
    let dispatcher = HookDispatcher::new(registry);

    let mut args = vec![Value::Null];
    let result = dispatcher.fire("OnCount", &mut args).unwrap();

    assert_eq!(result, Value::Bool(true));
    assert_eq!(args[0], Value::I32(42));
}

#[test]
fn by_ref_parameter_writes_back_mutations() {
    let registry = HookRegistryBuilder::new()
        .handler(
            0,
            "OnScore",
            vec![ParamSpec::by_ref(TypeDesc::Num(NumericKind::I32))],
            |args| {
                if let Value::I32(v) = args[0] {
                    args[0] = Value::I32(v + 10);
                }
                Ok(Value::Null)
            },
        )
        .build();
    let dispatcher = HookDispatcher::new(registry);

    let mut args = vec![Value::I32(5)];
    dispatcher.fire("OnScore", &mut args).unwrap();
    assert_eq!(args[0], Value::I32(15));

    // A plain input parameter would not have written back.
    let mut again = vec![Value::I32(5)];
    dispatcher.fire("OnScore", &mut again).unwrap();
    assert_eq!(again[0], Value::I32(15));
}

#[test]
fn last_invoked_handler_return_value_wins() {
    let registry = HookRegistryBuilder::new()
        .handler(0, "base_OnSave", vec![], |_args| Ok(Value::from("base")))
        .handler(1, "OnSave", vec![], |_args| Ok(Value::from("derived")))
        .build();
    let dispatcher = HookDispatcher::new(registry);

    let result = dispatcher.fire("OnSave", &mut []).unwrap();
    assert_eq!(result, Value::from("derived"));
}

#[derive(Debug, PartialEq)]
struct HandlerBlewUp;

impl fmt::Display for HandlerBlewUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("handler blew up")
    }
}

impl std::error::Error for HandlerBlewUp {}

#[test]
fn handler_failure_surfaces_the_original_error_and_aborts_the_plan() {
    let log = CallLog::new();
    let seen = log.clone();
    let registry = HookRegistryBuilder::new()
        .handler(0, "base_OnLoad", vec![], |_args| {
            Err(Box::new(HandlerBlewUp) as hookline::BoxError)
        })
        .handler(1, "OnLoad", vec![], move |args| {
            seen.record("late", args);
            Ok(Value::Null)
        })
        .build();
    let dispatcher = HookDispatcher::new(registry);

    let err = dispatcher.fire("OnLoad", &mut []).unwrap_err();

    // The surfaced error displays as the handler's own error, not as an
    // engine wrapper.
    assert_eq!(err.to_string(), "handler blew up");
    let DispatchError::Handler(cause) = err;
    assert_eq!(cause.downcast_ref::<HandlerBlewUp>(), Some(&HandlerBlewUp));

    // The remaining plan entry never ran, and the instance survives.
    assert_eq!(log.len(), 0);
    assert_eq!(dispatcher.fire("OnLoad", &mut []).unwrap_err().to_string(), "handler blew up");
}

#[test]
fn malformed_registration_does_not_poison_the_registry() {
    let registry = HookRegistryBuilder::new()
        .handler(
            0,
            "OnChat",
            vec![ParamSpec::output(TypeDesc::Num(NumericKind::I32)).with_default(1_i32)],
            |_args| Ok(Value::from("bad")),
        )
        .handler(0, "OnChat", vec![], |_args| Ok(Value::from("good")))
        .build();
    assert_eq!(registry.handler_count("OnChat"), 1);

    let dispatcher = HookDispatcher::new(registry);
    assert_eq!(
        dispatcher.fire("OnChat", &mut []).unwrap(),
        Value::from("good")
    );
}
