//! JSON <-> Value conversion utilities

use std::sync::Arc;

use thiserror::Error;

use crate::{config::Config, context::Context, value::Value};

/// Bindings must come from a JSON object.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("bindings must be a JSON object, got {0}")]
pub struct BindingsNotObject(pub &'static str);

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(f)) => Value::Float(f),
                // only reachable for arbitrary-precision numbers
                (None, None) => Value::String(n.to_string()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Value {
    /// Converts to JSON. Non-finite floats have no JSON form and become null.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Value::into_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into_json())).collect(),
            ),
        }
    }
}

impl Context {
    /// Builds a context whose bindings are the members of a JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// use dram::{Config, Context, Value};
    /// use serde_json::json;
    ///
    /// let ctx = Context::from_json(json!({"n": 123}), Config::new()).unwrap();
    /// assert_eq!(ctx.get("n"), Some(&Value::Integer(123)));
    /// ```
    pub fn from_json(
        bindings: serde_json::Value,
        config: impl Into<Arc<Config>>,
    ) -> Result<Self, BindingsNotObject> {
        match bindings {
            serde_json::Value::Object(obj) => Ok(Context::new(
                obj.into_iter().map(|(k, v)| (k, Value::from(v))),
                config,
            )),
            other => Err(BindingsNotObject(json_kind(&other))),
        }
    }
}
