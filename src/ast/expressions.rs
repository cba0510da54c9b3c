use crate::ast::{CompareOp, LogicalOp};
use crate::value::Value;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Every node owns its children, so a tree is acyclic and can be shared
/// read-only between any number of evaluations.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    ///
    /// # Examples
    /// ```text
    /// 12
    /// 12.3
    /// 'abc'
    /// true
    /// ```
    Literal(Value),

    /// Variable reference, resolved against the context bindings
    ///
    /// # Example
    /// ```text
    /// n
    /// ```
    Variable(String),

    /// Attribute access
    ///
    /// Looks up a map key, or one of the pseudo-attributes `first`, `last`
    /// and `size` on lists and strings.
    ///
    /// # Examples
    /// ```text
    /// obj.b.c
    /// fruits.first
    /// "abc".size
    /// ```
    Attribute { object: Box<Expr>, name: String },

    /// Index access; negative indices count from the end
    ///
    /// # Examples
    /// ```text
    /// array[1]
    /// array[-1]
    /// obj.c[0]
    /// ```
    Index { object: Box<Expr>, index: Box<Expr> },

    /// Parenthesized expression
    ///
    /// # Example
    /// ```text
    /// (n)
    /// ```
    Group(Box<Expr>),

    /// Comparison (`==`, `!=`, `<`, `>`, `<=`, `>=`)
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logical operation over a chain of operands joined by the same
    /// operator, evaluated left to right
    ///
    /// # Examples
    /// ```text
    /// true and true and true
    /// a or b
    /// ```
    Logical { op: LogicalOp, operands: Vec<Expr> },

    /// Substring or list membership test
    ///
    /// # Examples
    /// ```text
    /// "seafood" contains "foo"
    /// array contains "first"
    /// ```
    Contains { left: Box<Expr>, right: Box<Expr> },

    /// Filter application
    ///
    /// `args` carries extra filter arguments. The source syntax does not
    /// produce any yet; hosts may build nodes with arguments directly.
    ///
    /// # Example
    /// ```text
    /// "seafood" | length
    /// ```
    Filter {
        input: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Nesting depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Literal(_) | Expr::Variable(_) => 1,
            Expr::Attribute { object, .. } => 1 + object.depth(),
            Expr::Group(inner) => 1 + inner.depth(),
            Expr::Index { object, index } => 1 + object.depth().max(index.depth()),
            Expr::Compare { left, right, .. }
            | Expr::Contains { left, right } => 1 + left.depth().max(right.depth()),
            Expr::Logical { operands, .. } => {
                1 + operands.iter().map(Expr::depth).max().unwrap_or(0)
            }
            Expr::Filter { input, args, .. } => {
                let args = args.iter().map(Expr::depth).max().unwrap_or(0);
                1 + input.depth().max(args)
            }
        }
    }
}
