use super::ast::{Expr, Func};

/// Passes over the tree before giving up on reaching a fixed point.
const MAX_PASSES: usize = 8;

/// Rewrites `expr` into a smaller equivalent form.
///
/// Applies constant folding, additive and multiplicative identities, like-term
/// collection, power merging and exact fraction reduction until nothing changes.
#[must_use]
pub fn simplify(expr: &Expr) -> Expr {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn pass(expr: &Expr) -> Expr {
    match expr {
        Expr::Const(_) | Expr::Symbol(_) => expr.clone(),
        Expr::Add(a, b) => add(pass(a), pass(b)),
        Expr::Sub(a, b) => sub(pass(a), pass(b)),
        Expr::Mul(a, b) => mul(pass(a), pass(b)),
        Expr::Div(a, b) => div(pass(a), pass(b)),
        Expr::Pow(a, b) => pow(pass(a), pass(b)),
        Expr::Neg(a) => neg(pass(a)),
        Expr::Func(func, a) => func_of(*func, pass(a)),
    }
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Splits `c*e` into `(c, e)`; a bare term has coefficient 1.
fn coefficient(expr: &Expr) -> (f64, Expr) {
    match expr {
        Expr::Mul(a, b) => match a.as_const() {
            Some(c) => (c, (**b).clone()),
            None => (1.0, expr.clone()),
        },
        Expr::Neg(inner) => {
            let (c, rest) = coefficient(inner);
            (-c, rest)
        }
        _ => (1.0, expr.clone()),
    }
}

fn scaled(c: f64, term: Expr) -> Expr {
    mul(Expr::Const(c), term)
}

fn add(a: Expr, b: Expr) -> Expr {
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }
    if let (Some(x), Some(y)) = (a.as_const(), b.as_const()) {
        return Expr::Const(x + y);
    }
    match b {
        Expr::Neg(inner) => return sub(a, *inner),
        Expr::Const(c) if c < 0.0 => return sub(a, Expr::Const(-c)),
        Expr::Mul(head, rest) if head.as_const().is_some_and(|c| c < 0.0) => {
            let c = head.as_const().unwrap_or(-1.0);
            return sub(a, scaled(-c, *rest));
        }
        _ => {}
    }
    if let Expr::Neg(inner) = a {
        return sub(b, *inner);
    }
    if a.as_const().is_some() {
        // constants trail: 2 + x -> x + 2
        return Expr::Add(Box::new(b), Box::new(a));
    }
    let (ca, ta) = coefficient(&a);
    let (cb, tb) = coefficient(&b);
    if ta == tb {
        return scaled(ca + cb, ta);
    }
    a + b
}

fn sub(a: Expr, b: Expr) -> Expr {
    if b.is_zero() {
        return a;
    }
    if a.is_zero() {
        return neg(b);
    }
    if a == b {
        return Expr::Const(0.0);
    }
    if let (Some(x), Some(y)) = (a.as_const(), b.as_const()) {
        return Expr::Const(x - y);
    }
    match b {
        Expr::Neg(inner) => return add(a, *inner),
        Expr::Const(c) if c < 0.0 => return add(a, Expr::Const(-c)),
        Expr::Mul(head, rest) if head.as_const().is_some_and(|c| c < 0.0) => {
            let c = head.as_const().unwrap_or(-1.0);
            return add(a, scaled(-c, *rest));
        }
        _ => {}
    }
    let (ca, ta) = coefficient(&a);
    let (cb, tb) = coefficient(&b);
    if ta == tb {
        return scaled(ca - cb, ta);
    }
    a - b
}

/// `c * (a / d)` with exact integer reduction where possible.
fn scale_fraction(c: f64, numerator: Expr, d: f64) -> Expr {
    if is_integer(c) && is_integer(d) && d != 0.0 && c.abs() < 1e15 && d.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let g = gcd(c.abs() as u64, d.abs() as u64);
        #[allow(clippy::cast_precision_loss)]
        let g = g.max(1) as f64;
        let (c, d) = (c / g, d / g);
        let (c, d) = if d < 0.0 { (-c, -d) } else { (c, d) };
        if d == 1.0 {
            return mul(Expr::Const(c), numerator);
        }
        if c < 0.0 {
            return neg(scale_fraction(-c, numerator, d));
        }
        let top = mul(Expr::Const(c), numerator);
        return Expr::Div(Box::new(top), Box::new(Expr::Const(d)));
    }
    mul(Expr::Const(c / d), numerator)
}

fn mul(a: Expr, b: Expr) -> Expr {
    if a.is_zero() || b.is_zero() {
        return Expr::Const(0.0);
    }
    if a.is_one() {
        return b;
    }
    if b.is_one() {
        return a;
    }
    if let (Some(x), Some(y)) = (a.as_const(), b.as_const()) {
        return Expr::Const(x * y);
    }
    if b.as_const().is_some() && a.as_const().is_none() {
        return mul(b, a);
    }
    if a == Expr::Const(-1.0) {
        return neg(b);
    }
    if let Expr::Neg(inner) = a {
        return neg(mul(*inner, b));
    }
    if let Expr::Neg(inner) = b {
        return neg(mul(a, *inner));
    }
    if let Some(c) = a.as_const() {
        match b {
            Expr::Mul(inner_a, inner_b) if inner_a.as_const().is_some() => {
                let d = inner_a.as_const().unwrap_or(1.0);
                return mul(Expr::Const(c * d), *inner_b);
            }
            Expr::Div(top, bottom) if bottom.as_const().is_some() => {
                let d = bottom.as_const().unwrap_or(1.0);
                return scale_fraction(c, *top, d);
            }
            other => return Expr::Mul(Box::new(Expr::Const(c)), Box::new(other)),
        }
    }
    // pull coefficients out front so `2*x*x` can merge into `2*x**2`
    if let Expr::Mul(head, rest) = &a {
        if let Some(c) = head.as_const() {
            return mul(Expr::Const(c), mul((**rest).clone(), b));
        }
    }
    if let Expr::Mul(head, rest) = &b {
        if let Some(c) = head.as_const() {
            return mul(Expr::Const(c), mul(a, (**rest).clone()));
        }
    }
    if let Some(merged) = merge_powers(&a, &b) {
        return merged;
    }
    a * b
}

/// `x^m * x^n -> x^(m+n)` for constant exponents.
fn merge_powers(a: &Expr, b: &Expr) -> Option<Expr> {
    let (base_a, exp_a) = power_parts(a);
    let (base_b, exp_b) = power_parts(b);
    if base_a != base_b {
        return None;
    }
    Some(pow(base_a, Expr::Const(exp_a? + exp_b?)))
}

fn power_parts(expr: &Expr) -> (Expr, Option<f64>) {
    match expr {
        Expr::Pow(base, exponent) => ((**base).clone(), exponent.as_const()),
        other => (other.clone(), Some(1.0)),
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    if a.is_zero() && !b.is_zero() {
        return Expr::Const(0.0);
    }
    if b.is_one() {
        return a;
    }
    if a == b && !a.is_zero() {
        return Expr::Const(1.0);
    }
    if let Expr::Neg(inner) = a {
        return neg(div(*inner, b));
    }
    if let Some(d) = b.as_const() {
        if d == 0.0 {
            return a / b;
        }
        if d < 0.0 {
            return neg(div(a, Expr::Const(-d)));
        }
        return match a {
            Expr::Const(c) if is_integer(c) && is_integer(d) => scale_fraction(c, Expr::Const(1.0), d),
            Expr::Const(c) => Expr::Const(c / d),
            Expr::Mul(top, rest) if top.as_const().is_some() => {
                scale_fraction(top.as_const().unwrap_or(1.0), *rest, d)
            }
            other => other / Expr::Const(d),
        };
    }
    a / b
}

fn pow(base: Expr, exponent: Expr) -> Expr {
    if exponent.is_zero() {
        return Expr::Const(1.0);
    }
    if exponent.is_one() {
        return base;
    }
    if base.is_one() {
        return Expr::Const(1.0);
    }
    if let (Some(b), Some(e)) = (base.as_const(), exponent.as_const()) {
        let value = b.powf(e);
        if value.is_finite() && (is_integer(value) || !is_integer(e)) && (b >= 0.0 || is_integer(e)) {
            return Expr::Const(value);
        }
    }
    if let Expr::Pow(inner_base, inner_exp) = &base {
        if let (Some(m), Some(n)) = (inner_exp.as_const(), exponent.as_const()) {
            if is_integer(n) {
                return pow((**inner_base).clone(), Expr::Const(m * n));
            }
        }
    }
    base.pow(exponent)
}

fn neg(inner: Expr) -> Expr {
    match inner {
        Expr::Neg(a) => *a,
        Expr::Const(c) => Expr::Const(-c),
        Expr::Mul(a, b) if a.as_const().is_some() => {
            mul(Expr::Const(-a.as_const().unwrap_or(1.0)), *b)
        }
        other => -other,
    }
}

fn func_of(func: Func, arg: Expr) -> Expr {
    if let Some(x) = arg.as_const() {
        let value = func.apply(x);
        if is_integer(value) {
            return Expr::Const(value);
        }
    }
    arg.apply(func)
}
