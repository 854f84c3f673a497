//! Minimal computer-algebra engine: parse, print, simplify, differentiate,
//! integrate and evaluate single-variable expressions.

/// Expression tree and printer.
pub mod ast;
/// Derivatives and antiderivatives.
pub mod calculus;
/// Numeric evaluation.
pub mod eval;
/// Text to tree.
pub mod parser;
/// Algebraic rewriting.
pub mod simplify;

pub use ast::{format_number, Expr, Func};
pub use calculus::{differentiate, integrate};
pub use eval::evaluate;
pub use parser::{parse_expression, ParseLimits};
pub use simplify::simplify;
