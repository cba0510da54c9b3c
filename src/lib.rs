//! # dram
//!
//! An embeddable expression engine for template and rule DSLs.
//!
//! Source text such as `obj.b.c`, `array[-1]`, `"seafood" contains "foo"` or
//! `x | length` is parsed once into an [`Expr`] and can then be evaluated any
//! number of times against immutable [`Context`]s.
//!
//! ```
//! use dram::{Config, Context, FilterError, Value, evaluate};
//!
//! let mut config = Config::new();
//! config.add_filter("length", |input, _args| match input {
//!     Value::String(s) => Ok(Value::from(s.chars().count())),
//!     other => Err(FilterError::invalid_input("length", other)),
//! });
//!
//! let ctx = Context::new([("name", "dram")], config);
//! assert_eq!(evaluate("name | length", &ctx).unwrap(), Value::Integer(4));
//! assert_eq!(evaluate("name.size == 4", &ctx).unwrap(), Value::Boolean(true));
//! ```
pub mod ast;
pub mod config;
pub mod context;
pub mod convert;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;

use thiserror::Error;

pub use ast::{CompareOp, Expr, LogicalOp, Position, Token};
pub use config::{Config, FilterError, FilterFn, UndefinedVariables};
pub use context::{Closure, Context};
pub use convert::BindingsNotObject;
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, LexErrorKind, Lexer, tokenize};
pub use parser::{ParseError, Parser, ParserOptions, parse, parse_with_options};
pub use value::Value;

/// Any failure from parsing or evaluating source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Parse(ParseError::Lex(e))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parses `source` and evaluates it against `context` in one step.
#[tracing::instrument(level = "trace", skip_all)]
pub fn evaluate(source: &str, context: &Context) -> Result<Value> {
    let expr = parse(source)?;
    Ok(context.evaluate(&expr)?)
}
