//! Fatal errors.
//!
//! Everything in here aborts a model build. Advisory findings that let the
//! build continue live in [`crate::diagnostic`].

use thiserror::Error;

use procmod_expr::Symbol;

use crate::model::ModelKind;
use crate::process::Process;

/// Result type for process resolution and model building
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a model build
#[derive(Debug, Error)]
pub enum Error {
    /// Two processes define the same variable.
    #[error(
        "variable {variable} has more than one process assigned to it:\n  {existing}\n  {conflicting}"
    )]
    DuplicateAssignment {
        variable: Symbol,
        existing: Box<Process>,
        conflicting: Box<Process>,
    },

    /// A referenced variable has no process, no default process and no
    /// default value.
    #[error(
        "variable {variable} was introduced in {}.\n\
         However, a process for {variable} was not provided,\n\
         there is no default process for {variable}, and {variable} doesn't have a default value.\n\
         Please provide a process for variable {variable}.",
        describe_provenance(.provenance)
    )]
    MissingProcess {
        variable: Symbol,
        provenance: Vec<Symbol>,
    },

    /// An equation whose left-hand side does not identify a single variable.
    #[error(
        "cannot infer the defined variable of equation `{equation}`; the left-hand side must be \
         one of `x`, `D(x)`, `D(x)*p` or `p*D(x)` for a variable x"
    )]
    InvalidEquationLhs { equation: String },

    /// An addend process defines a different variable than the base process.
    #[error("cannot add a process for {found} to a process for {expected}")]
    AdditionMismatch { expected: Symbol, found: Symbol },

    /// A parameter process was requested for a variable without a value.
    #[error("variable {variable} has no default value to build a parameter from")]
    NoDefaultValue { variable: Symbol },

    /// The resolved equations cannot populate the requested container.
    #[error("cannot assemble {kind} model '{name}': {reason}")]
    InvalidModel {
        kind: ModelKind,
        name: String,
        reason: String,
    },

    /// Failed to read a configuration file.
    #[error("failed to read build options: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse build options.
    #[error("failed to parse build options: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    /// The variable an assignment error is about, if any.
    pub fn variable(&self) -> Option<&Symbol> {
        match self {
            Error::DuplicateAssignment { variable, .. }
            | Error::MissingProcess { variable, .. }
            | Error::NoDefaultValue { variable } => Some(variable),
            _ => None,
        }
    }

    /// Variables whose processes referenced the missing variable.
    pub fn provenance(&self) -> &[Symbol] {
        match self {
            Error::MissingProcess { provenance, .. } => provenance,
            _ => &[],
        }
    }
}

/// Renders a provenance chain as "process of variable z" /
/// "processes of variables z, w".
pub(crate) fn describe_provenance(provenance: &[Symbol]) -> String {
    let names: Vec<String> = provenance.iter().map(|s| s.to_string()).collect();
    match names.len() {
        0 => "no recorded process".to_string(),
        1 => format!("process of variable {}", names[0]),
        _ => format!("processes of variables {}", names.join(", ")),
    }
}
