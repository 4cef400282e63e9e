//! Process sets and their normalization.
//!
//! Callers hand over a mix of equations, processes, nested groups and
//! previously assembled models. [`flatten`] turns all of that into a plain
//! ordered list of [`Process`] before resolution starts, so the resolver only
//! ever sees one shape.

use procmod_expr::Equation;

use crate::error::Result;
use crate::model::Model;
use crate::process::Process;

/// One entry of a process set.
#[derive(Debug, Clone)]
pub enum ProcessInput {
    /// Bare equation; its left-hand side decides the defined variable
    Equation(Equation),
    /// Process
    Process(Process),
    /// Nested collection, expanded in place
    Group(Vec<ProcessInput>),
    /// Pre-built model whose equations are expanded in place
    Model(Model),
}

impl From<Equation> for ProcessInput {
    fn from(eq: Equation) -> Self {
        ProcessInput::Equation(eq)
    }
}

impl From<Process> for ProcessInput {
    fn from(p: Process) -> Self {
        ProcessInput::Process(p)
    }
}

impl From<Model> for ProcessInput {
    fn from(m: Model) -> Self {
        ProcessInput::Model(m)
    }
}

impl<T: Into<ProcessInput>> From<Vec<T>> for ProcessInput {
    fn from(items: Vec<T>) -> Self {
        ProcessInput::Group(items.into_iter().map(Into::into).collect())
    }
}

/// Builds a `Vec<ProcessInput>` from anything convertible into one.
///
/// ```
/// use procmod::{processes, Process};
/// use procmod_expr::{Equation, Expr, Symbol};
///
/// let x = Symbol::variable("x");
/// let y = Symbol::variable("y");
/// let set = processes![
///     Process::new(x.clone(), Expr::from(&y)),
///     Equation::new(&y, Expr::Number(1.0)),
/// ];
/// assert_eq!(set.len(), 2);
/// ```
#[macro_export]
macro_rules! processes {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::ProcessInput::from($item)),*]
    };
}

/// Flattens a process set into processes, preserving order.
pub fn flatten(inputs: impl IntoIterator<Item = ProcessInput>) -> Result<Vec<Process>> {
    let mut out = Vec::new();
    for input in inputs {
        flatten_into(input, &mut out)?;
    }
    Ok(out)
}

fn flatten_into(input: ProcessInput, out: &mut Vec<Process>) -> Result<()> {
    match input {
        ProcessInput::Process(p) => out.push(p),
        ProcessInput::Equation(eq) => out.push(Process::from_equation(eq)?),
        ProcessInput::Group(items) => {
            for item in items {
                flatten_into(item, out)?;
            }
        }
        ProcessInput::Model(model) => {
            for eq in model.into_equations() {
                out.push(Process::from_equation(eq)?);
            }
        }
    }
    Ok(())
}
