//! Model assembly.
//!
//! A [`Model`] is the container resolved processes end up in: an ordered
//! list of equations plus the unknowns and parameters they involve. It does
//! not simplify or reorder anything; consumers that need an evaluation order
//! derive it themselves.

use std::fmt;

use indexmap::IndexSet;
use procmod_expr::{contains_name, parameters_in, Equation, Symbol};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::Process;

/// Kind of system a model describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelKind {
    /// Ordinary differential(-algebraic) equations in the independent variable
    #[default]
    Ode,
    /// Purely algebraic system; time derivatives are rejected
    Nonlinear,
}

impl ModelKind {
    /// Name used for a model when none is given.
    pub fn default_name(self) -> &'static str {
        match self {
            ModelKind::Ode => "OdeSystem",
            ModelKind::Nonlinear => "NonlinearSystem",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Ode => write!(f, "ODE"),
            ModelKind::Nonlinear => write!(f, "nonlinear"),
        }
    }
}

/// An assembled system of equations.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    kind: ModelKind,
    name: String,
    independent: Symbol,
    equations: Vec<Equation>,
    unknowns: Vec<Symbol>,
    parameters: Vec<Symbol>,
}

impl Model {
    /// Assembles a model from resolved processes.
    ///
    /// Parameters are gathered from every equation in first-occurrence order;
    /// `extra_parameters` are appended if not already present.
    pub fn assemble(
        kind: ModelKind,
        name: impl Into<String>,
        independent: Symbol,
        processes: &[Process],
        extra_parameters: &[Symbol],
    ) -> Result<Self> {
        let name = name.into();
        let equations: Vec<Equation> = processes.iter().map(Process::equation).collect();

        if kind == ModelKind::Nonlinear {
            if let Some(eq) = equations.iter().find(|eq| eq.is_differential()) {
                return Err(Error::InvalidModel {
                    kind,
                    name,
                    reason: format!("equation `{eq}` contains a time derivative"),
                });
            }
        }

        let mut parameters = IndexSet::new();
        for eq in &equations {
            parameters.extend(parameters_in(&eq.lhs));
            parameters.extend(parameters_in(&eq.rhs));
        }
        parameters.extend(extra_parameters.iter().cloned());

        let unknowns = processes.iter().map(|p| p.variable().clone()).collect();

        debug!(
            %name,
            equations = equations.len(),
            parameters = parameters.len(),
            "model assembled"
        );

        Ok(Self {
            kind,
            name,
            independent,
            equations,
            unknowns,
            parameters: parameters.into_iter().collect(),
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn independent(&self) -> &Symbol {
        &self.independent
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Variables defined by the model, one per equation.
    pub fn unknowns(&self) -> &[Symbol] {
        &self.unknowns
    }

    pub fn parameters(&self) -> &[Symbol] {
        &self.parameters
    }

    pub fn into_equations(self) -> Vec<Equation> {
        self.equations
    }

    /// Whether any equation references a variable or parameter named `name`.
    pub fn has_symbolic_var(&self, name: &str) -> bool {
        self.equations
            .iter()
            .any(|eq| contains_name(&eq.lhs, name) || contains_name(&eq.rhs, name))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Model {} ({}, independent variable {}) with {} equations:",
            self.name,
            self.kind,
            self.independent,
            self.equations.len()
        )?;
        for eq in &self.equations {
            writeln!(f, "  {eq}")?;
        }
        Ok(())
    }
}
