//! # Dram Expressions - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for dram expressions,
//! the small value language embedded in templates and rules.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, access, operations, filters)
//! - **[operators]** - Comparison and logical operators
//!
//! ## Quick Start
//!
//! ```text
//! obj.items[-1].name | upcase
//! ```
//!
//! This expression takes the last item of `obj.items`, reads its `name` and
//! pipes it through the host-registered `upcase` filter.
//!
//! ## Precedence
//!
//! From loosest to tightest:
//!
//! ```text
//! or
//! and
//! contains
//! ==  !=
//! <  >  <=  >=
//! |  (filter, applied to the accessor chain on its left)
//! .name  [index]
//! literal, variable, ( group )
//! ```
//!
//! ## Access Behavior
//!
//! Attribute and index access never fail:
//!
//! - **Missing map keys** → `nil`
//! - **Out-of-range indices** → `nil` (negative indices count from the end)
//! - **`first`, `last`, `size`** on lists and strings are pseudo-attributes
//!
//! Operators, on the other hand, are strict: ordering across incompatible
//! kinds, non-boolean logical operands and bad `contains` operands are errors.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::{CompareOp, LogicalOp};
pub use tokens::{Position, Spanned, Token};
