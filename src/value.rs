use std::{cmp::Ordering, collections::HashMap};

use rust_decimal::{Decimal, prelude::FromPrimitive};

/// A runtime value produced by evaluating an expression.
///
/// This type represents every shape a binding or a result can take, with a
/// distinction between integers and floats.
///
/// # Equality
///
/// The derived `PartialEq` is structural: `Integer(1)` and `Float(1.0)` are
/// different values. The expression language's `==` uses [`Value::equals`],
/// which compares numbers by value.
///
/// # Examples
///
/// ```
/// use dram::Value;
/// use std::collections::HashMap;
///
/// // Scalar values
/// let nil = Value::Nil;
/// let boolean = Value::Boolean(true);
/// let integer = Value::Integer(42);
/// let float = Value::Float(3.14);
/// let string = Value::String("hello".to_string());
///
/// // Collections
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut map = HashMap::new();
/// map.insert("key".to_string(), Value::String("value".to_string()));
/// let map = Value::Map(map);
///
/// assert!(Value::Integer(1).equals(&Value::Float(1.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Nil,

    /// Boolean (true/false)
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Ordered list of values
    List(Vec<Value>),

    /// Map with string keys
    Map(HashMap<String, Value>),
}

impl Value {
    /// Human-readable kind name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Language equality.
    ///
    /// Integers and floats compare by numeric value, lists element-wise and
    /// maps key-wise. Values of unrelated kinds are never equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|other| v.equals(other)))
            }
            _ => compare_numbers(self, other) == Some(Ordering::Equal),
        }
    }

    /// Language ordering.
    ///
    /// Returns `None` when the two values have no defined order: mismatched
    /// kinds, non-orderable kinds, or a NaN operand. Callers that need to
    /// tell those apart use [`Value::is_orderable_with`].
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            // str ordering is byte-wise UTF-8, which matches code point order
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => compare_numbers(self, other),
        }
    }

    /// Whether `<`, `>`, `<=` and `>=` are defined between the two kinds.
    pub fn is_orderable_with(&self, other: &Value) -> bool {
        matches!(
            (self, other),
            (Value::String(_), Value::String(_))
                | (
                    Value::Integer(_) | Value::Float(_),
                    Value::Integer(_) | Value::Float(_)
                )
        )
    }
}

/// Numeric comparison across integer and float kinds.
///
/// Mixed pairs go through `Decimal` so large integers are not rounded the
/// way an `as f64` cast would; values `Decimal` cannot hold fall back to f64.
fn compare_numbers(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Integer(a), Value::Float(b)) => {
            if let Some(ad) = Decimal::from_i64(*a)
                && let Some(bd) = Decimal::from_f64(*b)
            {
                return Some(ad.cmp(&bd));
            }
            (*a as f64).partial_cmp(b)
        }
        (Value::Float(a), Value::Integer(b)) => {
            if let Some(ad) = Decimal::from_f64(*a)
                && let Some(bd) = Decimal::from_i64(*b)
            {
                return Some(ad.cmp(&bd));
            }
            a.partial_cmp(&(*b as f64))
        }
        _ => None,
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n)
            .map(Value::Integer)
            .unwrap_or(Value::Float(n as f64))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Nil)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_kinds() {
        assert!(Value::Integer(1).equals(&Value::Float(1.0)));
        assert!(Value::Float(1.0).equals(&Value::Integer(1)));
        assert!(!Value::Integer(1).equals(&Value::Float(1.5)));
    }

    #[test]
    fn test_mismatched_kinds_are_unequal() {
        assert!(!Value::Integer(1).equals(&Value::String("1".into())));
        assert!(!Value::Nil.equals(&Value::Boolean(false)));
    }

    #[test]
    fn test_large_integers_do_not_round() {
        // 2^53 + 1 is not representable as f64
        let big = Value::Integer(9_007_199_254_740_993);
        let float = Value::Float(9_007_199_254_740_992.0);
        assert_eq!(big.compare(&float), Some(Ordering::Greater));
    }

    #[test]
    fn test_integers_above_2_pow_60() {
        let int = Value::Integer(1_152_921_504_606_847_000);
        let float = Value::Float(1_152_921_504_606_847_232.0);
        assert_eq!(int.compare(&float), Some(Ordering::Less));
        assert_eq!(float.compare(&int), Some(Ordering::Greater));
        assert!(!int.equals(&float));

        // f64 spacing is 256 here: 2^60 + 1 would cast to exactly 2^60
        let above = Value::Integer(1_152_921_504_606_846_977);
        let pow = Value::Float(1_152_921_504_606_846_976.0);
        assert_eq!(above.compare(&pow), Some(Ordering::Greater));
        assert!(!above.equals(&pow));
    }

    #[test]
    fn test_nested_list_equality() {
        let a = Value::from(vec![Value::Integer(1), Value::from(vec![2.0])]);
        let b = Value::from(vec![Value::Float(1.0), Value::from(vec![2])]);
        assert!(a.equals(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_orderable_kinds() {
        assert!(Value::Integer(1).is_orderable_with(&Value::Float(2.0)));
        assert!(Value::from("a").is_orderable_with(&Value::from("b")));
        assert!(!Value::from("a").is_orderable_with(&Value::Integer(1)));
        assert!(!Value::Nil.is_orderable_with(&Value::Nil));
    }

    #[test]
    fn test_nan_has_no_order() {
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Integer(1)), None);
        assert!(!Value::Float(f64::NAN).equals(&Value::Float(f64::NAN)));
    }
}
