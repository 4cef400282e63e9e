//! Timescales and the left-hand sides they produce.
//!
//! The timescale of a process decides whether its equation defines the bare
//! variable or a scaled first time derivative of it:
//!
//! | timescale     | left-hand side | parameter created |
//! |---------------|----------------|-------------------|
//! | `None`        | `x`            | no                |
//! | `Unit`        | `D(x)`         | no                |
//! | `Value(τ)`    | `τ_x*D(x)`     | `τ_x = τ`         |
//! | `Value(0)`    | `x`            | no                |
//! | `Param(p)`    | `p*D(x)`       | no                |
//! | `Literal(c)`  | `c*D(x)`       | no                |

use procmod_expr::{Expr, Symbol};

use crate::synth::{new_derived_named_parameter, Naming, ParamValue, TIMESCALE_PREFIX};

/// Timescale of a process.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Timescale {
    /// No time derivative; the process defines the variable directly.
    #[default]
    None,
    /// Time derivative with coefficient one.
    Unit,
    /// Numeric timescale, turned into a named parameter `τ_<var>`.
    Value(f64),
    /// Timescale given as an existing expression, used verbatim.
    Param(Expr),
    /// Numeric timescale inserted as a literal coefficient.
    Literal(f64),
}

impl Timescale {
    /// Whether the process defines a time derivative.
    pub fn is_time_derivative(&self) -> bool {
        match self {
            Timescale::None => false,
            Timescale::Value(v) => *v != 0.0,
            Timescale::Unit | Timescale::Param(_) | Timescale::Literal(_) => true,
        }
    }

    /// Coefficient multiplying `D(variable)`, or `None` when there is no
    /// derivative or the coefficient is one.
    pub fn coefficient(&self, variable: &Symbol) -> Option<Expr> {
        match self {
            Timescale::None | Timescale::Unit => None,
            Timescale::Value(v) if *v == 0.0 => None,
            Timescale::Value(v) => Some(new_derived_named_parameter(
                variable.name(),
                ParamValue::Number(*v),
                TIMESCALE_PREFIX,
                &Naming::default(),
            )),
            Timescale::Param(p) => Some(p.clone()),
            Timescale::Literal(c) => Some(Expr::Number(*c)),
        }
    }

    /// Left-hand side of the equation for a process defining `variable`.
    pub fn lhs(&self, variable: &Symbol) -> Expr {
        if !self.is_time_derivative() {
            return Expr::from(variable);
        }
        match self.coefficient(variable) {
            Some(c) => c * Expr::d(variable),
            None => Expr::d(variable),
        }
    }
}

impl From<f64> for Timescale {
    fn from(v: f64) -> Self {
        Timescale::Value(v)
    }
}

impl From<Expr> for Timescale {
    fn from(e: Expr) -> Self {
        Timescale::Param(e)
    }
}

impl From<&Symbol> for Timescale {
    fn from(s: &Symbol) -> Self {
        Timescale::Param(Expr::from(s))
    }
}

impl From<ParamValue> for Timescale {
    fn from(v: ParamValue) -> Self {
        match v {
            ParamValue::Number(v) => Timescale::Value(v),
            ParamValue::Expr(e) => Timescale::Param(e),
            ParamValue::Literal(v) => Timescale::Literal(v),
        }
    }
}

impl From<Option<f64>> for Timescale {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Timescale::Unit, Timescale::Value)
    }
}
