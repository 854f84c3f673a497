use crate::error::SolverError;

use super::{
    ast::{Expr, Func},
    simplify::simplify,
};

/// Symbolic first derivative of `expr` with respect to `var`, simplified.
#[must_use]
pub fn differentiate(expr: &Expr, var: &str) -> Expr {
    simplify(&derive(expr, var))
}

fn derive(expr: &Expr, var: &str) -> Expr {
    if !expr.contains_var(var) {
        return Expr::num(0.0);
    }
    match expr {
        Expr::Const(_) => Expr::num(0.0),
        Expr::Symbol(name) => Expr::num(if name == var { 1.0 } else { 0.0 }),
        Expr::Add(a, b) => derive(a, var) + derive(b, var),
        Expr::Sub(a, b) => derive(a, var) - derive(b, var),
        Expr::Mul(a, b) => {
            // product rule
            derive(a, var) * (**b).clone() + (**a).clone() * derive(b, var)
        }
        Expr::Div(a, b) => {
            if b.contains_var(var) {
                // quotient rule
                let numerator = derive(a, var) * (**b).clone() - (**a).clone() * derive(b, var);
                numerator / (**b).clone().pow(Expr::num(2.0))
            } else {
                derive(a, var) / (**b).clone()
            }
        }
        Expr::Pow(base, exponent) => {
            match (base.contains_var(var), exponent.contains_var(var)) {
                (true, false) => {
                    let n = (**exponent).clone();
                    let lowered = match n.as_const() {
                        Some(k) => Expr::num(k - 1.0),
                        None => n.clone() - Expr::num(1.0),
                    };
                    n * (**base).clone().pow(lowered) * derive(base, var)
                }
                (false, _) => {
                    let outer = if base.as_const() == Some(std::f64::consts::E) {
                        expr.clone()
                    } else {
                        expr.clone() * (**base).clone().apply(Func::Ln)
                    };
                    outer * derive(exponent, var)
                }
                (true, true) => {
                    // d(f^g) = f^g * (g' ln f + g f'/f)
                    let log_part = derive(exponent, var) * (**base).clone().apply(Func::Ln);
                    let ratio = (**exponent).clone() * derive(base, var) / (**base).clone();
                    expr.clone() * (log_part + ratio)
                }
            }
        }
        Expr::Neg(a) => -derive(a, var),
        Expr::Func(func, arg) => {
            let u = (**arg).clone();
            let outer = match func {
                Func::Sin => u.apply(Func::Cos),
                Func::Cos => -u.apply(Func::Sin),
                Func::Tan => Expr::num(1.0) / u.apply(Func::Cos).pow(Expr::num(2.0)),
                Func::Exp => u.apply(Func::Exp),
                Func::Ln => Expr::num(1.0) / u,
                Func::Sqrt => Expr::num(1.0) / (Expr::num(2.0) * u.apply(Func::Sqrt)),
                Func::Abs => u.clone() / u.apply(Func::Abs),
            };
            outer * derive(arg, var)
        }
    }
}

/// Indefinite integral of `expr` with respect to `var`, without the constant.
///
/// Sums of real powers of `var` (polynomials, `1/x**n`, `sqrt(x)`, products
/// of such factors) integrate term by term. Beyond that the rule table covers
/// constant multiples, powers and exponentials of linear arguments, and
/// `sin`/`cos`/`exp`/`sqrt` of linear arguments. Anything else is reported as
/// [`SolverError::UnsupportedIntegrand`].
pub fn integrate(expr: &Expr, var: &str) -> Result<Expr, SolverError> {
    let prepared = simplify(expr);
    antiderivative(&prepared, var).map(|result| simplify(&result))
}

/// Largest integer power expanded by repeated multiplication.
const MAX_EXPANSION: f64 = 16.0;
/// Largest number of distinct powers kept while expanding.
const MAX_TERMS: usize = 64;
const EPSILON: f64 = 1e-12;

/// `(exponent, coefficient)` pairs of a sum of real powers of one variable.
type PowerTerms = Vec<(f64, f64)>;

/// Expands `expr` into a sum of `c * var**e` terms, or `None` when it holds
/// other symbols, functions or powers that do not expand.
fn power_terms(expr: &Expr, var: &str) -> Option<PowerTerms> {
    let terms = match expr {
        Expr::Const(c) => vec![(0.0, *c)],
        Expr::Symbol(name) if name == var => vec![(1.0, 1.0)],
        Expr::Symbol(_) => return None,
        Expr::Add(a, b) => {
            let mut terms = power_terms(a, var)?;
            terms.extend(power_terms(b, var)?);
            terms
        }
        Expr::Sub(a, b) => {
            let mut terms = power_terms(a, var)?;
            terms.extend(power_terms(b, var)?.into_iter().map(|(e, c)| (e, -c)));
            terms
        }
        Expr::Neg(a) => power_terms(a, var)?
            .into_iter()
            .map(|(e, c)| (e, -c))
            .collect(),
        Expr::Mul(a, b) => multiply(&power_terms(a, var)?, &power_terms(b, var)?),
        Expr::Div(a, b) => {
            let (divisor_exp, divisor_coeff) = match power_terms(b, var)?.as_slice() {
                [(e, c)] if *c != 0.0 => (*e, *c),
                _ => return None,
            };
            power_terms(a, var)?
                .into_iter()
                .map(|(e, c)| (e - divisor_exp, c / divisor_coeff))
                .collect()
        }
        Expr::Pow(base, exponent) => raise(&power_terms(base, var)?, exponent.as_const()?)?,
        Expr::Func(Func::Sqrt, arg) => raise(&power_terms(arg, var)?, 0.5)?,
        Expr::Func(..) => return None,
    };
    let merged = collect_terms(terms);
    (merged.len() <= MAX_TERMS).then_some(merged)
}

fn multiply(a: &[(f64, f64)], b: &[(f64, f64)]) -> PowerTerms {
    let product = a
        .iter()
        .flat_map(|(ea, ca)| b.iter().map(move |(eb, cb)| (ea + eb, ca * cb)))
        .collect();
    collect_terms(product)
}

fn raise(terms: &[(f64, f64)], n: f64) -> Option<PowerTerms> {
    match terms {
        [] => (n > 0.0).then(Vec::new),
        [(e, c)] => {
            if *c < 0.0 && n.fract() != 0.0 {
                return None;
            }
            Some(vec![(e * n, c.powf(n))])
        }
        _ if (0.0..=MAX_EXPANSION).contains(&n) && n.fract() == 0.0 => {
            let mut result = vec![(0.0, 1.0)];
            let mut remaining = n;
            while remaining > 0.0 {
                result = multiply(&result, terms);
                if result.len() > MAX_TERMS {
                    return None;
                }
                remaining -= 1.0;
            }
            Some(result)
        }
        _ => None,
    }
}

/// Merges equal exponents, drops zero coefficients, highest power first.
fn collect_terms(mut terms: PowerTerms) -> PowerTerms {
    terms.sort_by(|a, b| b.0.total_cmp(&a.0));
    terms.dedup_by(|next, kept| {
        let same = (next.0 - kept.0).abs() < EPSILON;
        if same {
            kept.1 += next.1;
        }
        same
    });
    terms.retain(|(_, c)| c.abs() > EPSILON);
    terms
}

/// Antiderivative of `coeff * var**exponent`.
fn power_primitive(coeff: f64, exponent: f64, var: &str) -> Expr {
    let x = Expr::symbol(var);
    if (exponent + 1.0).abs() < EPSILON {
        return Expr::num(coeff) * x.apply(Func::Abs).apply(Func::Ln);
    }
    let raised = exponent + 1.0;
    // scale by the smallest q making q*(e+1) whole so fractions stay exact
    let (top, bottom) = (1..=12u8)
        .map(f64::from)
        .find(|q| {
            let scaled = raised * q;
            (scaled.round() - scaled).abs() < 1e-9
        })
        .map_or((coeff, raised), |q| (coeff * q, (raised * q).round()));
    if raised > 0.0 {
        Expr::num(top) * x.pow(Expr::num(raised)) / Expr::num(bottom)
    } else {
        -(Expr::num(top) / (Expr::num(-bottom) * x.pow(Expr::num(-raised))))
    }
}

fn integrate_terms(terms: &[(f64, f64)], var: &str) -> Expr {
    terms
        .iter()
        .map(|&(exponent, coeff)| power_primitive(coeff, exponent, var))
        .reduce(|sum, term| sum + term)
        .unwrap_or_else(|| Expr::num(0.0))
}

fn unsupported(expr: &Expr) -> SolverError {
    SolverError::UnsupportedIntegrand(expr.to_string())
}

/// Slope `k` when `arg` is `k*var + b` with `k != 0`.
fn linear_slope(arg: &Expr, var: &str) -> Option<f64> {
    differentiate(arg, var)
        .as_const()
        .filter(|slope| *slope != 0.0 && slope.is_finite())
}

fn antiderivative(expr: &Expr, var: &str) -> Result<Expr, SolverError> {
    let x = || Expr::symbol(var);
    if !expr.contains_var(var) {
        return Ok(expr.clone() * x());
    }
    if let Some(terms) = power_terms(expr, var) {
        return Ok(integrate_terms(&terms, var));
    }
    match expr {
        Expr::Symbol(_) => Ok(x().pow(Expr::num(2.0)) / Expr::num(2.0)),
        Expr::Add(a, b) => Ok(antiderivative(a, var)? + antiderivative(b, var)?),
        Expr::Sub(a, b) => Ok(antiderivative(a, var)? - antiderivative(b, var)?),
        Expr::Neg(a) => Ok(-antiderivative(a, var)?),
        Expr::Mul(a, b) => match (a.contains_var(var), b.contains_var(var)) {
            (false, true) => Ok((**a).clone() * antiderivative(b, var)?),
            (true, false) => Ok(antiderivative(a, var)? * (**b).clone()),
            _ => Err(unsupported(expr)),
        },
        Expr::Div(a, b) => {
            if !b.contains_var(var) {
                return Ok(antiderivative(a, var)? / (**b).clone());
            }
            if a.contains_var(var) {
                return Err(unsupported(expr));
            }
            if let Expr::Pow(base, exponent) = b.as_ref() {
                // c / u**n -> c * u**(-n)
                let flipped = match exponent.as_const() {
                    Some(n) => Expr::num(-n),
                    None => -(**exponent).clone(),
                };
                return antiderivative(&((**a).clone() * (**base).clone().pow(flipped)), var);
            }
            // c / (k x + b) -> c ln|k x + b| / k
            let slope = linear_slope(b, var).ok_or_else(|| unsupported(expr))?;
            Ok((**a).clone() * (**b).clone().apply(Func::Abs).apply(Func::Ln) / Expr::num(slope))
        }
        Expr::Pow(base, exponent) => {
            if !exponent.contains_var(var) {
                let slope = linear_slope(base, var).ok_or_else(|| unsupported(expr))?;
                return match exponent.as_const() {
                    Some(n) if (n + 1.0).abs() < 1e-12 => {
                        Ok((**base).clone().apply(Func::Abs).apply(Func::Ln) / Expr::num(slope))
                    }
                    Some(n) => Ok((**base).clone().pow(Expr::num(n + 1.0))
                        / Expr::num((n + 1.0) * slope)),
                    None => Err(unsupported(expr)),
                };
            }
            if base.contains_var(var) {
                return Err(unsupported(expr));
            }
            // a^(k x + b) -> a^(k x + b) / (k ln a)
            let slope = linear_slope(exponent, var).ok_or_else(|| unsupported(expr))?;
            match base.as_const() {
                Some(a) if a > 0.0 && a != 1.0 => {
                    let scale = slope * a.ln();
                    if (scale - 1.0).abs() < 1e-12 {
                        Ok(expr.clone())
                    } else {
                        Ok(expr.clone() / Expr::num(scale))
                    }
                }
                _ => Err(unsupported(expr)),
            }
        }
        Expr::Func(Func::Sqrt, arg) => {
            antiderivative(&(**arg).clone().pow(Expr::num(0.5)), var)
        }
        Expr::Func(func, arg) => {
            let slope = linear_slope(arg, var).ok_or_else(|| unsupported(expr))?;
            let u = (**arg).clone();
            let primitive = match func {
                Func::Sin => -u.apply(Func::Cos),
                Func::Cos => u.apply(Func::Sin),
                Func::Exp => u.apply(Func::Exp),
                _ => return Err(unsupported(expr)),
            };
            Ok(primitive / Expr::num(slope))
        }
        Expr::Const(_) => Ok(expr.clone() * x()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::{parse_expression, ParseLimits};

    fn parse(input: &str) -> Expr {
        parse_expression(input, ParseLimits::default()).unwrap()
    }

    fn derivative(input: &str) -> String {
        differentiate(&parse(input), "x").to_string()
    }

    fn integral(input: &str) -> String {
        integrate(&parse(input), "x").unwrap().to_string()
    }

    #[test]
    fn power_rule() {
        assert_eq!(derivative("x**2"), "2*x");
        assert_eq!(derivative("x**3 + 2*x"), "3*x**2 + 2");
        assert_eq!(derivative("5"), "0");
        assert_eq!(derivative("y*x"), "y");
    }

    #[test]
    fn chain_rule_through_functions() {
        assert_eq!(derivative("sin(x)"), "cos(x)");
        assert_eq!(derivative("cos(2*x)"), "-2*sin(2*x)");
        assert_eq!(derivative("exp(x)"), "exp(x)");
        assert_eq!(derivative("log(x)"), "1/x");
    }

    #[test]
    fn integrates_polynomials() {
        assert_eq!(integral("x**2"), "x**3/3");
        assert_eq!(integral("2*x"), "x**2");
        assert_eq!(integral("3*x**2 + 1"), "x**3 + x");
        assert_eq!(integral("4"), "4*x");
    }

    #[test]
    fn integrates_elementary_functions() {
        assert_eq!(integral("cos(x)"), "sin(x)");
        assert_eq!(integral("sin(x)"), "-cos(x)");
        assert_eq!(integral("exp(3*x)"), "exp(3*x)/3");
        assert_eq!(integral("1/x"), "log(abs(x))");
    }

    #[test]
    fn collects_products_before_integrating() {
        assert_eq!(integral("2*x*x"), "2*x**3/3");
        assert_eq!(integral("3*x*x + 2"), "x**3 + 2*x");
        assert_eq!(integral("x*(x+1)"), "x**3/3 + x**2/2");
        assert_eq!(integral("(x+1)*(x-1)"), "x**3/3 - x");
        assert_eq!(integral("x**2 - 2"), "x**3/3 - 2*x");
    }

    #[test]
    fn integrates_negative_and_fractional_powers() {
        assert_eq!(integral("1/x**2"), "-1/x");
        assert_eq!(integral("3/x**3"), "-3/(2*x**2)");
        assert_eq!(integral("sqrt(x)"), "2*x**1.5/3");
        assert_eq!(integral("x**(-1)"), "log(abs(x))");
        assert_eq!(integral("(x**2 + 1)/x"), "x**2/2 + log(abs(x))");
    }

    #[test]
    fn rewrites_roots_and_reciprocal_powers_of_linear_arguments() {
        assert_eq!(integral("sqrt(2*x + 1)"), "(2*x + 1)**1.5/3");
        assert_eq!(integral("3/(x + 1)**2"), "-3*(x + 1)**(-1)");
    }

    #[test]
    fn expansion_is_bounded() {
        assert!(power_terms(&parse("(x + 1)**40"), "x").is_none());
        assert!(power_terms(&parse("x*y"), "x").is_none());
        assert_eq!(power_terms(&parse("(x + 1)**2"), "x").unwrap().len(), 3);
    }

    #[test]
    fn reports_unsupported_integrands() {
        let err = integrate(&parse("x*sin(x)"), "x").unwrap_err();
        assert!(matches!(err, SolverError::UnsupportedIntegrand(_)));
        assert!(integrate(&parse("tan(x)"), "x").is_err());
    }

    #[test]
    fn derivative_of_integral_recovers_integrand() {
        let integrand = parse("3*x**2 + 2*x");
        let primitive = integrate(&integrand, "x").unwrap();
        assert_eq!(differentiate(&primitive, "x").to_string(), "3*x**2 + 2*x");
    }
}
