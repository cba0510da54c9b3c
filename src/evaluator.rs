use std::borrow::Cow;

use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, LogicalOp},
    config::{FilterError, UndefinedVariables},
    context::Context,
    value::Value,
};

/// Errors that can occur during expression evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable that is not bound in the context
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    /// An operator applied to operands it does not accept
    #[error("type mismatch in `{operation}`: {detail}")]
    TypeMismatch { operation: String, detail: String },

    /// A pipe naming a filter that is not registered
    #[error("unknown filter `{0}`")]
    UnknownFilter(String),

    /// A filter reported its own failure
    #[error("filter `{name}` failed: {source}")]
    Filter {
        name: String,
        #[source]
        source: FilterError,
    },
}

impl EvalError {
    fn operands(operation: impl ToString, left: &Value, right: &Value) -> Self {
        EvalError::TypeMismatch {
            operation: operation.to_string(),
            detail: format!(
                "cannot apply to {} and {}",
                left.type_name(),
                right.type_name()
            ),
        }
    }

    fn operand(operation: impl ToString, expected: &str, found: &Value) -> Self {
        EvalError::TypeMismatch {
            operation: operation.to_string(),
            detail: format!("expected {}, found {}", expected, found.type_name()),
        }
    }
}

/// Walks an expression tree against one context.
///
/// Evaluation never mutates the context, so a single tree can be evaluated
/// from many threads against many contexts at once.
pub struct Evaluator<'a> {
    context: &'a Context,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Context) -> Self {
        Evaluator { context }
    }

    /// Evaluates `expr` to a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dram::{Config, Context, Evaluator, Value, parse};
    ///
    /// let ctx = Context::new([("array", vec!["first", "second", "third"])], Config::new());
    /// let expr = parse("array[-1]").unwrap();
    ///
    /// let result = Evaluator::new(&ctx).evaluate(&expr).unwrap();
    /// assert_eq!(result, Value::from("third"));
    /// ```
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        self.eval(expr)
    }

    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => self.lookup(name, false).map(Cow::into_owned),
            Expr::Attribute { .. } | Expr::Index { .. } => self.access(expr).map(Cow::into_owned),
            Expr::Group(inner) => self.eval(inner),
            Expr::Compare { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                compare(*op, &left, &right).map(Value::Boolean)
            }
            Expr::Logical { op, operands } => self.eval_logical(*op, operands),
            Expr::Contains { left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                contains(&left, &right).map(Value::Boolean)
            }
            Expr::Filter { input, name, args } => self.eval_filter(input, name, args),
        }
    }

    fn lookup(&self, name: &str, chained: bool) -> Result<Cow<'a, Value>, EvalError> {
        if let Some(value) = self.context.get(name) {
            return Ok(Cow::Borrowed(value));
        }

        match (self.context.config().undefined_variables(), chained) {
            (UndefinedVariables::Lenient, _) | (UndefinedVariables::Strict, true) => {
                tracing::debug!(variable = name, "unbound variable resolved to nil");
                Ok(Cow::Owned(Value::Nil))
            }
            (UndefinedVariables::Strict, false) | (UndefinedVariables::Error, _) => {
                Err(EvalError::UnboundVariable(name.to_string()))
            }
        }
    }

    /// Evaluates an accessor chain, borrowing from the bindings where it can.
    ///
    /// Misses never fail here: absent keys, bad indices and unsupported
    /// kinds all come back as nil.
    fn access<'r>(&self, expr: &'r Expr) -> Result<Cow<'r, Value>, EvalError>
    where
        'a: 'r,
    {
        match expr {
            Expr::Literal(value) => Ok(Cow::Borrowed(value)),
            Expr::Variable(name) => self.lookup(name, true),
            Expr::Group(inner) => self.access(inner),
            Expr::Attribute { object, name } => Ok(match self.access(object)? {
                Cow::Borrowed(base) => attribute(base, name),
                Cow::Owned(base) => Cow::Owned(attribute(&base, name).into_owned()),
            }),
            Expr::Index { object, index } => {
                let base = self.access(object)?;
                let index = self.eval(index)?;
                Ok(match base {
                    Cow::Borrowed(base) => element(base, &index),
                    Cow::Owned(base) => Cow::Owned(element(&base, &index).into_owned()),
                })
            }
            Expr::Compare { .. }
            | Expr::Logical { .. }
            | Expr::Contains { .. }
            | Expr::Filter { .. } => self.eval(expr).map(Cow::Owned),
        }
    }

    /// Walks the operands in order and stops at the first one that decides
    /// the result: `false` for `and`, `true` for `or`.
    fn eval_logical(&self, op: LogicalOp, operands: &[Expr]) -> Result<Value, EvalError> {
        let decisive = op == LogicalOp::Or;
        for operand in operands {
            let value = self.eval(operand)?;
            let truth = value
                .as_bool()
                .ok_or_else(|| EvalError::operand(op, "boolean", &value))?;
            if truth == decisive {
                return Ok(Value::Boolean(decisive));
            }
        }
        Ok(Value::Boolean(!decisive))
    }

    fn eval_filter(&self, input: &Expr, name: &str, args: &[Expr]) -> Result<Value, EvalError> {
        let input = self.eval(input)?;
        let filter = self
            .context
            .config()
            .filter(name)
            .ok_or_else(|| EvalError::UnknownFilter(name.to_string()))?;
        let args = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(filter = name, input = input.type_name(), "applying filter");
        filter(&input, &args).map_err(|source| EvalError::Filter {
            name: name.to_string(),
            source,
        })
    }
}

/// `base.name`: map lookup, or the `first`/`last`/`size` pseudo-attributes.
fn attribute<'v>(base: &'v Value, name: &str) -> Cow<'v, Value> {
    let nil = || Cow::Owned(Value::Nil);
    match base {
        Value::Map(map) => map.get(name).map_or_else(nil, Cow::Borrowed),
        Value::List(items) => match name {
            "first" => items.first().map_or_else(nil, Cow::Borrowed),
            "last" => items.last().map_or_else(nil, Cow::Borrowed),
            "size" => Cow::Owned(Value::from(items.len())),
            _ => nil(),
        },
        Value::String(s) => match name {
            "first" => Cow::Owned(s.chars().next().map(Value::from).unwrap_or_default()),
            "last" => Cow::Owned(s.chars().next_back().map(Value::from).unwrap_or_default()),
            "size" => Cow::Owned(Value::from(s.chars().count())),
            _ => nil(),
        },
        Value::Nil | Value::Boolean(_) | Value::Integer(_) | Value::Float(_) => nil(),
    }
}

/// `base[index]` on lists and strings; negative indices count from the end.
fn element<'v>(base: &'v Value, index: &Value) -> Cow<'v, Value> {
    let nil = || Cow::Owned(Value::Nil);
    let &Value::Integer(index) = index else {
        return nil();
    };
    match base {
        Value::List(items) => resolve_index(index, items.len())
            .and_then(|i| items.get(i))
            .map_or_else(nil, Cow::Borrowed),
        Value::String(s) => Cow::Owned(
            resolve_index(index, s.chars().count())
                .and_then(|i| s.chars().nth(i))
                .map(Value::from)
                .unwrap_or_default(),
        ),
        Value::Map(_) | Value::Nil | Value::Boolean(_) | Value::Integer(_) | Value::Float(_) => {
            nil()
        }
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Equality never fails; ordering requires two numbers or two strings.
fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    if op.is_equality() {
        return Ok(left.equals(right) == (op == CompareOp::Equal));
    }
    if !left.is_orderable_with(right) {
        return Err(EvalError::operands(op, left, right));
    }

    Ok(match left.compare(right) {
        // NaN is unordered against everything
        None => false,
        Some(ordering) => match op {
            CompareOp::LessThan => ordering.is_lt(),
            CompareOp::GreaterThan => ordering.is_gt(),
            CompareOp::LessEqual => ordering.is_le(),
            CompareOp::GreaterEqual => ordering.is_ge(),
            CompareOp::Equal => ordering.is_eq(),
            CompareOp::NotEqual => ordering.is_ne(),
        },
    })
}

fn contains(left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::String(haystack), Value::String(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::String(_), needle) => Err(EvalError::operand("contains", "string", needle)),
        (Value::List(items), needle) => Ok(items.iter().any(|item| item.equals(needle))),
        (haystack, needle) => Err(EvalError::operands("contains", haystack, needle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(resolve_index(i64::MIN, 3), None);
        assert_eq!(resolve_index(0, 0), None);
    }

    #[test]
    fn test_attribute_borrows_from_maps() {
        let base: Value = [("a", Value::from("x"))].into_iter().collect();
        assert!(matches!(attribute(&base, "a"), Cow::Borrowed(_)));
        assert_eq!(attribute(&base, "missing").into_owned(), Value::Nil);
    }

    #[test]
    fn test_string_pseudo_attributes() {
        let s = Value::from("héllo");
        assert_eq!(attribute(&s, "first").into_owned(), Value::from("h"));
        assert_eq!(attribute(&s, "last").into_owned(), Value::from("o"));
        assert_eq!(attribute(&s, "size").into_owned(), Value::Integer(5));
        assert_eq!(element(&s, &Value::Integer(1)).into_owned(), Value::from("é"));
    }

    #[test]
    fn test_non_integer_index_is_nil() {
        let list = Value::from(vec![1, 2]);
        assert_eq!(element(&list, &Value::Float(0.0)).into_owned(), Value::Nil);
        assert_eq!(element(&list, &Value::from("0")).into_owned(), Value::Nil);
    }

    #[test]
    fn test_ordering_mismatch_is_an_error() {
        let err = compare(CompareOp::LessThan, &Value::from("a"), &Value::Integer(1)).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { .. }));
        assert_eq!(
            compare(CompareOp::Equal, &Value::from("1"), &Value::Integer(1)),
            Ok(false)
        );
        assert_eq!(
            compare(CompareOp::NotEqual, &Value::from("1"), &Value::Integer(1)),
            Ok(true)
        );
    }
}
