//! Advisory diagnostics.
//!
//! Diagnostics report expected, recoverable situations: a variable that was
//! turned into a parameter, or a default process that replaced an earlier
//! one. They travel alongside a successful result and never abort a build.
//! Every diagnostic is also logged through `tracing` when it is raised.

use std::fmt;

use procmod_expr::Symbol;

/// Category of an advisory diagnostic.
///
/// # Invariant
///
/// The discriminant values must match the `KIND_NAMES` array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DiagnosticKind {
    /// Variable without process or default process became a parameter
    ParameterFallback = 0,
    /// Default process replaced an existing default for the same variable
    RegistryOverwrite = 1,
}

const KIND_NAMES: &[&str] = &[
    "parameter fallback", // 0: ParameterFallback
    "registry overwrite", // 1: RegistryOverwrite
];

impl DiagnosticKind {
    pub fn name(self) -> &'static str {
        KIND_NAMES[self as usize]
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note
    Note,
    /// Warning (model is valid but likely not what was intended)
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single advisory diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Variable the diagnostic is about
    pub variable: Symbol,
    /// Primary human-readable message
    pub message: String,
    /// Additional context lines
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a warning.
    pub fn warning(kind: DiagnosticKind, variable: Symbol, message: String) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            variable,
            message,
            notes: Vec::new(),
        }
    }

    /// Adds a note (chaining).
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.kind.name(), self.message)?;
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}
