use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

/// Elementary functions understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Natural exponential.
    Exp,
    /// Natural logarithm, printed as `log`.
    Ln,
    /// Square root.
    Sqrt,
    /// Absolute value.
    Abs,
}

impl Func {
    /// Looks up a function by the name used in input text.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "exp" => Some(Self::Exp),
            "ln" | "log" => Some(Self::Ln),
            "sqrt" => Some(Self::Sqrt),
            "abs" | "Abs" => Some(Self::Abs),
            _ => None,
        }
    }

    /// Printed name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Ln => "log",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Applies the function to a number.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Exp => x.exp(),
            Self::Ln => x.ln(),
            Self::Sqrt => x.sqrt(),
            Self::Abs => x.abs(),
        }
    }
}

/// Symbolic scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant.
    Const(f64),
    /// Free variable.
    Symbol(String),
    /// `a + b`.
    Add(Box<Expr>, Box<Expr>),
    /// `a - b`.
    Sub(Box<Expr>, Box<Expr>),
    /// `a * b`.
    Mul(Box<Expr>, Box<Expr>),
    /// `a / b`.
    Div(Box<Expr>, Box<Expr>),
    /// `a ** b`.
    Pow(Box<Expr>, Box<Expr>),
    /// `-a`.
    Neg(Box<Expr>),
    /// `f(a)`.
    Func(Func, Box<Expr>),
}

impl Expr {
    /// Constant shorthand.
    #[must_use]
    pub const fn num(value: f64) -> Self {
        Self::Const(value)
    }

    /// Symbol shorthand.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::Symbol(name.to_string())
    }

    /// `self ** exponent`.
    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        Self::Pow(Box::new(self), Box::new(exponent))
    }

    /// `func(self)`.
    #[must_use]
    pub fn apply(self, func: Func) -> Self {
        Self::Func(func, Box::new(self))
    }

    /// The constant value, if this is a constant.
    #[must_use]
    pub const fn as_const(&self) -> Option<f64> {
        match self {
            Self::Const(value) => Some(*value),
            _ => None,
        }
    }

    /// True for the constant zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Const(value) if *value == 0.0)
    }

    /// True for the constant one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Const(value) if *value == 1.0)
    }

    /// True when `var` occurs anywhere in the tree.
    #[must_use]
    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Self::Const(_) => false,
            Self::Symbol(name) => name == var,
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
                a.contains_var(var) || b.contains_var(var)
            }
            Self::Neg(a) | Self::Func(_, a) => a.contains_var(var),
        }
    }

    /// Binding strength used by the printer.
    fn precedence(&self) -> u8 {
        match self {
            Self::Add(..) | Self::Sub(..) => 1,
            Self::Mul(..) | Self::Div(..) => 2,
            Self::Neg(_) => 3,
            Self::Const(value) if *value < 0.0 => 3,
            Self::Pow(..) => 4,
            Self::Const(_) | Self::Symbol(_) | Self::Func(..) => 5,
        }
    }

    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "(")?;
            self.fmt_bare(f)?;
            write!(f, ")")
        } else {
            self.fmt_bare(f)
        }
    }

    fn fmt_bare(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => f.write_str(&format_number(*value)),
            Self::Symbol(name) => f.write_str(name),
            Self::Add(a, b) => {
                a.fmt_at(f, 1)?;
                match b.as_ref() {
                    Self::Neg(inner) => {
                        write!(f, " - ")?;
                        inner.fmt_at(f, 2)
                    }
                    Self::Const(value) if *value < 0.0 => {
                        write!(f, " - {}", format_number(-value))
                    }
                    other => {
                        write!(f, " + ")?;
                        other.fmt_at(f, 1)
                    }
                }
            }
            Self::Sub(a, b) => {
                a.fmt_at(f, 1)?;
                write!(f, " - ")?;
                b.fmt_at(f, 2)
            }
            Self::Mul(a, b) => {
                a.fmt_at(f, 2)?;
                write!(f, "*")?;
                b.fmt_at(f, 2)
            }
            Self::Div(a, b) => {
                a.fmt_at(f, 2)?;
                write!(f, "/")?;
                b.fmt_at(f, 3)
            }
            Self::Pow(base, exponent) => {
                base.fmt_at(f, 5)?;
                write!(f, "**")?;
                exponent.fmt_at(f, 4)
            }
            Self::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_at(f, 2)
            }
            Self::Func(func, arg) => {
                write!(f, "{}(", func.name())?;
                arg.fmt_bare(f)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_bare(f)
    }
}

/// Formats a number without a trailing `.0` for integral values.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        // exact: |value| < 1e15 fits in i64 without rounding
        #[allow(clippy::cast_possible_truncation)]
        let whole = value as i64;
        whole.to_string()
    } else {
        value.to_string()
    }
}

impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::Div(Box::new(self), Box::new(rhs))
    }
}

impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self {
        Self::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn prints_double_star_powers() {
        assert_eq!((Expr::num(2.0) * x()).to_string(), "2*x");
        assert_eq!((x().pow(Expr::num(3.0)) / Expr::num(3.0)).to_string(), "x**3/3");
        assert_eq!(
            (Expr::num(3.0) * x().pow(Expr::num(2.0)) + Expr::num(2.0)).to_string(),
            "3*x**2 + 2"
        );
    }

    #[test]
    fn parenthesizes_by_precedence() {
        let sum = x() + Expr::num(1.0);
        assert_eq!((sum.clone() * Expr::num(2.0)).to_string(), "(x + 1)*2");
        assert_eq!(sum.clone().pow(Expr::num(2.0)).to_string(), "(x + 1)**2");
        assert_eq!((Expr::num(1.0) / (Expr::num(2.0) * x())).to_string(), "1/(2*x)");
        assert_eq!(x().pow(Expr::num(-1.0)).to_string(), "x**(-1)");
        assert_eq!((x() - sum).to_string(), "x - (x + 1)");
        assert_eq!((x() + -x().apply(Func::Sin)).to_string(), "x - sin(x)");
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(format_number(32.0), "32");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(2.5), "2.5");
    }
}
