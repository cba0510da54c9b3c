// tests/property_tests.rs

use dram::{Closure, Config, Context, Value, evaluate};
use proptest::prelude::*;

fn eval_in(ctx: &Context, source: &str) -> Value {
    evaluate(source, ctx).unwrap()
}

proptest! {
    #[test]
    fn integer_equals_same_float(n in -1_000_000i64..1_000_000) {
        let ctx = Context::new([("i", Value::Integer(n)), ("f", Value::Float(n as f64))], Config::new());
        prop_assert_eq!(eval_in(&ctx, "i == f"), Value::Boolean(true));
        prop_assert_eq!(eval_in(&ctx, "f == i"), Value::Boolean(true));
        prop_assert_eq!(eval_in(&ctx, "i != f"), Value::Boolean(false));
    }

    #[test]
    fn integer_ordering_matches_rust(a in any::<i64>(), b in any::<i64>()) {
        let ctx = Context::new([("a", a), ("b", b)], Config::new());
        prop_assert_eq!(eval_in(&ctx, "a < b"), Value::Boolean(a < b));
        prop_assert_eq!(eval_in(&ctx, "a >= b"), Value::Boolean(a >= b));
    }

    #[test]
    fn string_ordering_matches_rust(a in "\\PC{0,8}", b in "\\PC{0,8}") {
        let ctx = Context::new([("a", a.as_str()), ("b", b.as_str())], Config::new());
        prop_assert_eq!(eval_in(&ctx, "a < b"), Value::Boolean(a < b));
        prop_assert_eq!(eval_in(&ctx, "a == b"), Value::Boolean(a == b));
    }

    #[test]
    fn negative_index_counts_from_end(items in prop::collection::vec(any::<i64>(), 1..20), k in 1usize..20) {
        prop_assume!(k <= items.len());
        let ctx = Context::new([("items", items.clone())], Config::new())
            .with("neg", -(k as i64))
            .with("pos", (items.len() - k) as i64);
        prop_assert_eq!(eval_in(&ctx, "items[neg]"), eval_in(&ctx, "items[pos]"));
    }

    #[test]
    fn out_of_range_index_is_nil(items in prop::collection::vec(any::<i64>(), 0..10), extra in 0i64..100) {
        let len = items.len() as i64;
        let ctx = Context::new([("items", items)], Config::new())
            .with("over", len + extra)
            .with("under", -len - 1 - extra);
        prop_assert_eq!(eval_in(&ctx, "items[over]"), Value::Nil);
        prop_assert_eq!(eval_in(&ctx, "items[under]"), Value::Nil);
    }

    #[test]
    fn contains_matches_substring(haystack in "[a-z]{0,12}", needle in "[a-z]{0,3}") {
        let ctx = Context::new([("h", haystack.as_str()), ("n", needle.as_str())], Config::new());
        prop_assert_eq!(
            eval_in(&ctx, "h contains n"),
            Value::Boolean(haystack.contains(needle.as_str()))
        );
    }

    #[test]
    fn bind_never_touches_the_original(original in any::<i64>(), rebound in any::<i64>()) {
        let ctx = Context::new([("x", original)], Config::new());
        let c1 = Closure::parse("x", ctx).unwrap();
        let c2 = c1.bind("x", rebound);
        prop_assert_eq!(c2.evaluate().unwrap(), Value::Integer(rebound));
        prop_assert_eq!(c1.evaluate().unwrap(), Value::Integer(original));
    }
}
