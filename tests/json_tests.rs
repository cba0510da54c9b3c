// tests/json_tests.rs

use dram::{BindingsNotObject, Config, Context, Value, evaluate};
use pretty_assertions::assert_eq;
use serde_json::json;

fn json_context(bindings: serde_json::Value) -> Context {
    Context::from_json(bindings, Config::new()).unwrap()
}

#[test]
fn test_scalars_from_json() {
    assert_eq!(Value::from(json!(null)), Value::Nil);
    assert_eq!(Value::from(json!(true)), Value::Boolean(true));
    assert_eq!(Value::from(json!(42)), Value::Integer(42));
    assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    assert_eq!(Value::from(json!("x")), Value::from("x"));
}

#[test]
fn test_integers_stay_integers() {
    assert_eq!(Value::from(json!(-7)), Value::Integer(-7));
    // outside i64, still representable as f64
    assert_eq!(Value::from(json!(u64::MAX)), Value::Float(u64::MAX as f64));
}

#[test]
fn test_nested_json() {
    let value = Value::from(json!({"b": {"c": "d"}, "c": ["r", "g", "b"]}));
    let Value::Map(map) = &value else {
        panic!("expected map, got {value:?}");
    };
    assert_eq!(map["c"], Value::from(vec!["r", "g", "b"]));
}

#[test]
fn test_into_json() {
    let value = Value::from(vec![
        Value::Nil,
        Value::Boolean(false),
        Value::Integer(1),
        Value::Float(2.5),
        Value::from("s"),
    ]);
    assert_eq!(value.into_json(), json!([null, false, 1, 2.5, "s"]));
}

#[test]
fn test_non_finite_float_into_json_is_null() {
    assert_eq!(Value::Float(f64::NAN).into_json(), json!(null));
    assert_eq!(Value::Float(f64::INFINITY).into_json(), json!(null));
}

#[test]
fn test_map_into_json() {
    let value: Value = [("a", Value::Integer(1))].into_iter().collect();
    assert_eq!(value.into_json(), json!({"a": 1}));
}

#[test]
fn test_context_from_json() {
    let ctx = json_context(json!({
        "n": 123,
        "obj": {"a": "first", "b": {"c": "d"}},
        "array": ["first", "second", "third"]
    }));

    assert_eq!(evaluate("n", &ctx).unwrap(), Value::Integer(123));
    assert_eq!(evaluate("obj.b.c", &ctx).unwrap(), Value::from("d"));
    assert_eq!(evaluate("array[-1]", &ctx).unwrap(), Value::from("third"));
    assert_eq!(evaluate("n == 123.0", &ctx).unwrap(), Value::Boolean(true));
}

#[test]
fn test_context_from_non_object() {
    let err = Context::from_json(json!([1, 2]), Config::new()).unwrap_err();
    assert_eq!(err, BindingsNotObject("array"));
    assert_eq!(err.to_string(), "bindings must be a JSON object, got array");
}

#[test]
fn test_result_round_trips_to_json() {
    let ctx = json_context(json!({"obj": {"c": ["r", "g", "b"]}}));
    let result = evaluate("obj.c", &ctx).unwrap();
    assert_eq!(result.into_json(), json!(["r", "g", "b"]));
}
