//! Expression trees.
//!
//! [`Expr`] is a plain tree over numbers and [`Symbol`]s. Arithmetic
//! operators are overloaded so process definitions read like the equations
//! they describe:
//!
//! ```
//! use procmod_expr::{Expr, Symbol};
//!
//! let z = Symbol::variable("z");
//! let x = Symbol::variable("x");
//! let relax = Expr::from(&x).pow(2.0) - &z;
//! assert_eq!(relax.to_string(), "x^2 - z");
//! ```

use std::fmt;
use std::ops;

use crate::symbol::Symbol;

/// Symbolic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Reference to a variable, parameter or the independent variable
    Symbol(Symbol),
    /// First derivative with respect to the independent variable
    Derivative(Box<Expr>),
    /// Negation
    Neg(Box<Expr>),
    /// N-ary sum
    Add(Vec<Expr>),
    /// N-ary product
    Mul(Vec<Expr>),
    /// Difference
    Sub(Box<Expr>, Box<Expr>),
    /// Quotient
    Div(Box<Expr>, Box<Expr>),
    /// Power
    Pow(Box<Expr>, Box<Expr>),
    /// Named function application, e.g. `exp(x)`
    Call { name: String, args: Vec<Expr> },
}

// Binding strength used when printing.
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {
    /// `D(x)`: first time derivative of `x`.
    pub fn d(x: impl Into<Expr>) -> Self {
        Expr::Derivative(Box::new(x.into()))
    }

    /// Function application.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        Expr::Pow(Box::new(self), Box::new(exponent.into()))
    }

    /// Sum of `terms`. An empty sum is the number zero.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for term in terms {
            match term {
                Expr::Add(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::Number(0.0),
            1 => flat.remove(0),
            _ => Expr::Add(flat),
        }
    }

    /// Product of `factors`. An empty product is the number one.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for factor in factors {
            match factor {
                Expr::Mul(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::Number(1.0),
            1 => flat.remove(0),
            _ => Expr::Mul(flat),
        }
    }

    /// The symbol, if this expression is a bare symbol reference.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The differentiated expression, if this is `D(..)`.
    pub fn as_derivative(&self) -> Option<&Expr> {
        match self {
            Expr::Derivative(inner) => Some(inner),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(v) if *v < 0.0 => PREC_UNARY,
            Expr::Number(_) | Expr::Symbol(_) | Expr::Derivative(_) | Expr::Call { .. } => {
                PREC_ATOM
            }
            Expr::Neg(_) => PREC_UNARY,
            Expr::Add(_) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(_) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Pow(..) => PREC_POWER,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            f.write_str("(")?;
            self.fmt_prec(f, 0)?;
            return f.write_str(")");
        }
        match self {
            Expr::Number(v) => write!(f, "{v}"),
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::Derivative(inner) => {
                f.write_str("D(")?;
                inner.fmt_prec(f, 0)?;
                f.write_str(")")
            }
            Expr::Neg(inner) => {
                f.write_str("-")?;
                inner.fmt_prec(f, PREC_UNARY)
            }
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    term.fmt_prec(f, PREC_SUM)?;
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("*")?;
                    }
                    factor.fmt_prec(f, PREC_PRODUCT)?;
                }
                Ok(())
            }
            Expr::Sub(a, b) => {
                a.fmt_prec(f, PREC_SUM)?;
                f.write_str(" - ")?;
                b.fmt_prec(f, PREC_PRODUCT)
            }
            Expr::Div(a, b) => {
                a.fmt_prec(f, PREC_PRODUCT)?;
                f.write_str(" / ")?;
                b.fmt_prec(f, PREC_UNARY)
            }
            Expr::Pow(base, exp) => {
                base.fmt_prec(f, PREC_ATOM)?;
                f.write_str("^")?;
                exp.fmt_prec(f, PREC_ATOM)
            }
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    arg.fmt_prec(f, 0)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Number(v)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Symbol(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::Symbol(s.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

impl<T: Into<Expr>> ops::Add<T> for Expr {
    type Output = Expr;

    fn add(self, rhs: T) -> Expr {
        Expr::sum([self, rhs.into()])
    }
}

impl<T: Into<Expr>> ops::Sub<T> for Expr {
    type Output = Expr;

    fn sub(self, rhs: T) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> ops::Mul<T> for Expr {
    type Output = Expr;

    fn mul(self, rhs: T) -> Expr {
        Expr::product([self, rhs.into()])
    }
}

impl<T: Into<Expr>> ops::Div<T> for Expr {
    type Output = Expr;

    fn div(self, rhs: T) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs.into()))
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

macro_rules! impl_symbol_ops {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl<T: Into<Expr>> ops::$trait<T> for &Symbol {
                type Output = Expr;

                fn $method(self, rhs: T) -> Expr {
                    ops::$trait::$method(Expr::from(self), rhs)
                }
            }

            impl ops::$trait<Expr> for f64 {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    ops::$trait::$method(Expr::Number(self), rhs)
                }
            }

            impl ops::$trait<&Symbol> for f64 {
                type Output = Expr;

                fn $method(self, rhs: &Symbol) -> Expr {
                    ops::$trait::$method(Expr::Number(self), rhs)
                }
            }
        )*
    };
}

impl_symbol_ops!(Add::add, Sub::sub, Mul::mul, Div::div);
