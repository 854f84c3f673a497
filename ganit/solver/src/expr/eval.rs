use crate::error::SolverError;

use super::ast::Expr;

/// Evaluates `expr` numerically with the given symbol bindings.
///
/// Unbound symbols and non-finite intermediate results (division by zero,
/// logarithm of a negative number, ...) are errors rather than `NaN`s.
pub fn evaluate(expr: &Expr, bindings: &[(&str, f64)]) -> Result<f64, SolverError> {
    let value = match expr {
        Expr::Const(value) => *value,
        Expr::Symbol(name) => bindings
            .iter()
            .find(|(bound, _)| *bound == name.as_str())
            .map(|(_, value)| *value)
            .ok_or_else(|| SolverError::Evaluation(format!("symbol `{name}` has no value")))?,
        Expr::Add(a, b) => evaluate(a, bindings)? + evaluate(b, bindings)?,
        Expr::Sub(a, b) => evaluate(a, bindings)? - evaluate(b, bindings)?,
        Expr::Mul(a, b) => evaluate(a, bindings)? * evaluate(b, bindings)?,
        Expr::Div(a, b) => evaluate(a, bindings)? / evaluate(b, bindings)?,
        Expr::Pow(a, b) => evaluate(a, bindings)?.powf(evaluate(b, bindings)?),
        Expr::Neg(a) => -evaluate(a, bindings)?,
        Expr::Func(func, a) => func.apply(evaluate(a, bindings)?),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::Evaluation(format!("`{expr}` is not finite here")))
    }
}
