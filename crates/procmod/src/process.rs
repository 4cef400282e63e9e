//! Processes: rules that define exactly one variable.
//!
//! A [`Process`] couples a variable with the expression that governs it and
//! a [`Timescale`] deciding how the left-hand side is formed. The
//! constructors here cover the common shapes (plain definitions, parameter
//! pins, time derivatives, exponential relaxation, additive composition) so
//! libraries can ship processes without hand-writing equations.
//!
//! A process whose right-hand side mentions its own variable is accepted
//! as-is; nothing here checks for cycles.

use std::fmt;

use procmod_expr::{free_variables, walk_expr, Equation, Expr, Symbol};

use crate::error::{Error, Result};
use crate::synth::{new_derived_named_parameter, synthesize, Naming, ParamValue, PARAMETER_SUFFIX};
use crate::timescale::Timescale;

/// Which constructor produced a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    /// Plain `lhs ~ rhs`, including promoted equations
    Equation,
    /// Variable pinned to a constant parameter
    Parameter,
    /// `τ*D(x) ~ expr`
    TimeDerivative,
    /// `τ*D(x) ~ expr - x`
    ExpRelaxation,
    /// Sum of several right-hand sides for one variable
    Addition,
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessKind::Equation => "equation",
            ProcessKind::Parameter => "parameter process",
            ProcessKind::TimeDerivative => "time derivative",
            ProcessKind::ExpRelaxation => "exponential relaxation",
            ProcessKind::Addition => "addition process",
        };
        f.write_str(name)
    }
}

/// A rule defining one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    kind: ProcessKind,
    variable: Symbol,
    rhs: Expr,
    timescale: Timescale,
}

/// Something added onto a process by [`Process::addition`].
#[derive(Debug, Clone)]
pub enum Addend {
    /// Bare expression added to the right-hand side
    Expr(Expr),
    /// Another process for the same variable; its right-hand side is added
    Process(Process),
}

impl From<Expr> for Addend {
    fn from(e: Expr) -> Self {
        Addend::Expr(e)
    }
}

impl From<Process> for Addend {
    fn from(p: Process) -> Self {
        Addend::Process(p)
    }
}

impl Process {
    /// `variable ~ rhs`.
    pub fn new(variable: Symbol, rhs: impl Into<Expr>) -> Self {
        Self::with_timescale(variable, rhs, Timescale::None)
    }

    /// A plain process with an explicit timescale.
    pub fn with_timescale(variable: Symbol, rhs: impl Into<Expr>, timescale: Timescale) -> Self {
        Self {
            kind: ProcessKind::Equation,
            variable,
            rhs: rhs.into(),
            timescale,
        }
    }

    /// Pins `variable` to a parameter holding its default value (`x ~ x_0`).
    pub fn parameter(variable: &Symbol) -> Result<Self> {
        Ok(synthesize(variable, None, PARAMETER_SUFFIX)?.process)
    }

    /// Pins `variable` to `value`. Numbers become a parameter `x_0`,
    /// expressions are used directly.
    pub fn parameter_with(variable: &Symbol, value: impl Into<ParamValue>) -> Self {
        let value = value.into();
        let rhs = new_derived_named_parameter(variable.name(), value, PARAMETER_SUFFIX, &Naming::suffix());
        Self::pinned(variable.clone(), rhs)
    }

    /// `variable ~ value` tagged as a parameter process.
    pub(crate) fn pinned(variable: Symbol, value: Expr) -> Self {
        Self::new(variable, value).tagged(ProcessKind::Parameter)
    }

    /// `τ*D(variable) ~ expr`.
    ///
    /// Pass [`Timescale::Unit`] for no coefficient. A zero numeric timescale
    /// produces `variable ~ expr`.
    pub fn time_derivative(
        variable: Symbol,
        expr: impl Into<Expr>,
        tau: impl Into<Timescale>,
    ) -> Self {
        Self::with_timescale(variable, expr, tau.into()).tagged(ProcessKind::TimeDerivative)
    }

    /// Exponential relaxation of `variable` towards `expr`:
    /// `τ*D(variable) ~ expr - variable`.
    ///
    /// A zero numeric timescale produces `variable ~ expr` instead.
    pub fn exp_relaxation(
        variable: Symbol,
        expr: impl Into<Expr>,
        tau: impl Into<Timescale>,
    ) -> Self {
        let tau = tau.into();
        let expr = expr.into();
        let process = if tau.is_time_derivative() {
            let rhs = expr - &variable;
            Self::with_timescale(variable, rhs, tau)
        } else {
            Self::new(variable, expr)
        };
        process.tagged(ProcessKind::ExpRelaxation)
    }

    /// Turns an existing process into an exponential relaxation towards its
    /// right-hand side.
    pub fn relax(process: Process, tau: impl Into<Timescale>) -> Self {
        Self::exp_relaxation(process.variable, process.rhs, tau)
    }

    /// Adds `addends` to the right-hand side of `process`.
    ///
    /// Addend processes must define the same variable as `process`.
    pub fn addition(
        process: Process,
        addends: impl IntoIterator<Item = Addend>,
    ) -> Result<Self> {
        let mut terms = vec![process.rhs];
        for addend in addends {
            match addend {
                Addend::Expr(e) => terms.push(e),
                Addend::Process(p) => {
                    if p.variable != process.variable {
                        return Err(Error::AdditionMismatch {
                            expected: process.variable,
                            found: p.variable,
                        });
                    }
                    terms.push(p.rhs);
                }
            }
        }
        Ok(Self {
            kind: ProcessKind::Addition,
            variable: process.variable,
            rhs: Expr::sum(terms),
            timescale: process.timescale,
        })
    }

    /// Promotes an equation to a process.
    ///
    /// The left-hand side must be `x`, `D(x)`, or a product with exactly one
    /// `D(x)` factor, where `x` is a variable. The remaining factors of a
    /// product become the timescale; a single number becomes a literal one.
    pub fn from_equation(equation: Equation) -> Result<Self> {
        let invalid = || Error::InvalidEquationLhs {
            equation: equation.to_string(),
        };

        let (variable, timescale) = match &equation.lhs {
            Expr::Symbol(s) if s.is_variable() => (s.clone(), Timescale::None),
            Expr::Derivative(inner) => (derivative_target(inner).ok_or_else(invalid)?, Timescale::Unit),
            Expr::Mul(factors) => {
                let mut target = None;
                let mut coefficient = Vec::new();
                for factor in factors {
                    match factor {
                        Expr::Derivative(inner) if target.is_none() => {
                            target = Some(derivative_target(inner).ok_or_else(invalid)?);
                        }
                        other if has_derivative(other) => return Err(invalid()),
                        other => coefficient.push(other.clone()),
                    }
                }
                let variable = target.ok_or_else(invalid)?;
                let timescale = match coefficient.as_slice() {
                    [Expr::Number(v)] => Timescale::Literal(*v),
                    _ => Timescale::Param(Expr::product(coefficient)),
                };
                (variable, timescale)
            }
            _ => return Err(invalid()),
        };

        Ok(Self::with_timescale(variable, equation.rhs, timescale))
    }

    fn tagged(mut self, kind: ProcessKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> ProcessKind {
        self.kind
    }

    /// The variable this process defines.
    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    pub fn timescale(&self) -> &Timescale {
        &self.timescale
    }

    /// Left-hand side derived from the timescale.
    pub fn lhs(&self) -> Expr {
        self.timescale.lhs(&self.variable)
    }

    pub fn equation(&self) -> Equation {
        Equation::new(self.lhs(), self.rhs.clone())
    }

    /// Variables this process refers to: those in the right-hand side and in
    /// a parameter-expression timescale, in first-occurrence order.
    pub fn references(&self) -> Vec<Symbol> {
        let mut vars = free_variables(&self.rhs);
        if let Timescale::Param(coeff) = &self.timescale {
            for v in free_variables(coeff) {
                if !vars.contains(&v) {
                    vars.push(v);
                }
            }
        }
        vars
    }
}

fn has_derivative(expr: &Expr) -> bool {
    let mut found = false;
    walk_expr(expr, &mut |e| {
        if matches!(e, Expr::Derivative(_)) {
            found = true;
        }
    });
    found
}

fn derivative_target(inner: &Expr) -> Option<Symbol> {
    inner.as_symbol().filter(|s| s.is_variable()).cloned()
}

impl From<Process> for Equation {
    fn from(p: Process) -> Self {
        p.equation()
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.equation())
    }
}
