//! Immutable binding environments and closures.
//!
//! A [`Context`] is never changed after construction. [`Context::with`]
//! returns a new context that shares structure with the receiver through a
//! persistent `im::HashMap`, so deriving a context costs O(log n) no matter
//! how many names are bound or how many times it has been derived.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    ast::Expr,
    config::Config,
    evaluator::{EvalError, Evaluator},
    parser::{ParseError, parse},
    value::Value,
};

/// Variable bindings plus the configuration used to evaluate against them.
///
/// Cloning is cheap: both the bindings and the [`Config`] are shared.
///
/// # Examples
///
/// ```
/// use dram::{Config, Context, Value};
///
/// let ctx = Context::new([("x", 1)], Config::new());
/// let derived = ctx.with("x", 2);
///
/// assert_eq!(ctx.get("x"), Some(&Value::Integer(1)));
/// assert_eq!(derived.get("x"), Some(&Value::Integer(2)));
/// ```
#[derive(Clone)]
pub struct Context {
    bindings: im::HashMap<String, Value>,
    config: Arc<Config>,
}

impl Context {
    pub fn new<I, K, V>(bindings: I, config: impl Into<Arc<Config>>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Context {
            bindings: bindings
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            config: config.into(),
        }
    }

    /// A context with no bindings.
    pub fn empty(config: impl Into<Arc<Config>>) -> Self {
        Context {
            bindings: im::HashMap::new(),
            config: config.into(),
        }
    }

    /// Returns a context equal to this one except that `name` is bound to
    /// `value`. The receiver is left untouched.
    #[must_use]
    pub fn with(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Context {
            bindings: self.bindings.update(name.into(), value.into()),
            config: Arc::clone(&self.config),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// A snapshot of every visible binding.
    pub fn bindings(&self) -> HashMap<String, Value> {
        self.bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared configuration handle, for building sibling contexts.
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        Evaluator::new(self).evaluate(expr)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.bindings())
            .field("config", &self.config)
            .finish()
    }
}

/// An expression paired with the context it evaluates in.
///
/// The expression tree is shared between a closure and everything derived
/// from it with [`Closure::bind`].
///
/// # Examples
///
/// ```
/// use dram::{Closure, Config, Context, Value};
///
/// let ctx = Context::new([("x", 1)], Config::new());
/// let c1 = Closure::parse("x", ctx).unwrap();
/// let c2 = c1.bind("x", 2);
///
/// assert_eq!(c1.evaluate().unwrap(), Value::Integer(1));
/// assert_eq!(c2.evaluate().unwrap(), Value::Integer(2));
/// ```
#[derive(Debug, Clone)]
pub struct Closure {
    expr: Arc<Expr>,
    context: Context,
}

impl Closure {
    pub fn new(expr: impl Into<Arc<Expr>>, context: Context) -> Self {
        Closure {
            expr: expr.into(),
            context,
        }
    }

    pub fn parse(source: &str, context: Context) -> Result<Self, ParseError> {
        Ok(Closure::new(parse(source)?, context))
    }

    /// Returns a closure over the same expression whose context has `name`
    /// rebound. This closure is unaffected.
    pub fn bind(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Closure {
            expr: Arc::clone(&self.expr),
            context: self.context.with(name, value),
        }
    }

    pub fn evaluate(&self) -> Result<Value, EvalError> {
        self.context.evaluate(&self.expr)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_shadows_without_mutating() {
        let base = Context::new([("a", 1), ("b", 2)], Config::new());
        let derived = base.with("a", 10).with("c", 3);

        assert_eq!(base.get("a"), Some(&Value::Integer(1)));
        assert_eq!(base.get("c"), None);
        assert_eq!(derived.get("a"), Some(&Value::Integer(10)));
        assert_eq!(derived.get("b"), Some(&Value::Integer(2)));
        assert_eq!(derived.get("c"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_bindings_snapshot_prefers_innermost() {
        let ctx = Context::new([("a", 1)], Config::new())
            .with("a", 2)
            .with("a", 3);
        let bindings = ctx.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(ctx.len(), 1);
        assert_eq!(bindings["a"], Value::Integer(3));
    }

    #[test]
    fn test_repeated_rebinding_stays_flat() {
        let base = Context::new([("y", 0)], Config::new());
        let mut ctx = base.clone();
        for i in 0..100_000 {
            ctx = ctx.with("x", i);
        }

        assert_eq!(ctx.get("x"), Some(&Value::Integer(99_999)));
        assert_eq!(ctx.len(), 2);
        assert!(!base.contains("x"));
        drop(ctx);
    }

    #[test]
    fn test_many_distinct_names() {
        let mut ctx = Context::empty(Config::new());
        for i in 0..10_000 {
            ctx = ctx.with(format!("v{i}"), i);
        }
        assert_eq!(ctx.len(), 10_000);
        assert_eq!(ctx.get("v1234"), Some(&Value::Integer(1234)));
    }

    #[test]
    fn test_derived_contexts_share_config() {
        let ctx = Context::empty(Config::new());
        let derived = ctx.with("x", 1);
        assert!(Arc::ptr_eq(&ctx.shared_config(), &derived.shared_config()));
    }
}
