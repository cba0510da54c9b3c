//! Evaluation configuration and the filter registry.
//!
//! A [`Config`] is assembled once by the host, then shared by every
//! [`Context`](crate::Context) built from it. Contexts hold it behind an
//! `Arc`, so it can no longer be changed while evaluations read it.

use std::{collections::HashMap, fmt, sync::Arc};

use thiserror::Error;

use crate::value::Value;

/// Error reported by a filter function.
///
/// The evaluator passes it to the caller unchanged, wrapped in
/// [`EvalError::Filter`](crate::EvalError::Filter) together with the filter name.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct FilterError {
    message: String,
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        FilterError {
            message: message.into(),
        }
    }

    /// The filter cannot handle this kind of input.
    pub fn invalid_input(filter: &str, input: &Value) -> Self {
        FilterError::new(format!(
            "{} cannot be applied to {}",
            filter,
            input.type_name()
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The signature every filter implements.
///
/// A filter receives the piped-in value and any extra arguments, and returns
/// a new value or an error.
pub type FilterFn = dyn Fn(&Value, &[Value]) -> Result<Value, FilterError> + Send + Sync;

/// How a variable that is absent from the bindings is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedVariables {
    /// A bare reference fails with `UnboundVariable`; as the base of an
    /// attribute or index chain it resolves to nil.
    #[default]
    Strict,
    /// Every unbound reference resolves to nil.
    Lenient,
    /// Every unbound reference fails, chain bases included.
    Error,
}

/// Filter registry and evaluation options.
///
/// # Examples
///
/// ```
/// use dram::{Config, FilterError, Value};
///
/// let mut config = Config::new();
/// config.add_filter("upcase", |input, _args| match input {
///     Value::String(s) => Ok(Value::String(s.to_uppercase())),
///     other => Err(FilterError::invalid_input("upcase", other)),
/// });
/// assert!(config.has_filter("upcase"));
/// ```
#[derive(Clone, Default)]
pub struct Config {
    filters: HashMap<String, Arc<FilterFn>>,
    undefined_variables: UndefinedVariables,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `filter` under `name`, replacing any filter already
    /// registered with that name.
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, FilterError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.filters.insert(name.clone(), Arc::new(filter)).is_some() {
            tracing::debug!(filter = %name, "replaced existing filter");
        } else {
            tracing::debug!(filter = %name, "registered filter");
        }
        self
    }

    pub fn filter(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name).map(|f| f.as_ref())
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered filter names, sorted.
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn undefined_variables(&self) -> UndefinedVariables {
        self.undefined_variables
    }

    pub fn set_undefined_variables(&mut self, policy: UndefinedVariables) -> &mut Self {
        self.undefined_variables = policy;
        self
    }

    pub fn with_undefined_variables(mut self, policy: UndefinedVariables) -> Self {
        self.undefined_variables = policy;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("filters", &self.filter_names())
            .field("undefined_variables", &self.undefined_variables)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_registration_overwrites() {
        let mut config = Config::new();
        config.add_filter("f", |_, _| Ok(Value::Integer(1)));
        config.add_filter("f", |_, _| Ok(Value::Integer(2)));

        let f = config.filter("f").unwrap();
        assert_eq!(f(&Value::Nil, &[]), Ok(Value::Integer(2)));
        assert_eq!(config.filter_names(), vec!["f"]);
    }

    #[test]
    fn test_default_policy_is_strict() {
        assert_eq!(Config::new().undefined_variables(), UndefinedVariables::Strict);
        let config = Config::new().with_undefined_variables(UndefinedVariables::Lenient);
        assert_eq!(config.undefined_variables(), UndefinedVariables::Lenient);
    }

    #[test]
    fn test_invalid_input_message() {
        let err = FilterError::invalid_input("size", &Value::Boolean(true));
        assert_eq!(err.to_string(), "size cannot be applied to boolean");
    }
}
