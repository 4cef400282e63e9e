//! Default process registry.
//!
//! Libraries of processes can offer a *default* process for each of their
//! variables. When a model references a variable that nobody gave a process,
//! the resolver falls back to the default registered for it in the chosen
//! namespace.
//!
//! # Lifecycle
//!
//! Registration happens once, before any model is built. After that the
//! registry is only read. Two ways to get there:
//!
//! 1. **Explicit** - construct a [`DefaultRegistry`], call
//!    [`DefaultRegistry::register`] during setup, then share `&DefaultRegistry`.
//! 2. **Link-time** - libraries add a [`DefaultLibrary`] to the
//!    [`DEFAULT_LIBRARIES`] distributed slice. [`DefaultRegistry::global`]
//!    runs every library on first access and hands out shared references
//!    only, so nothing can register after initialization.
//!
//! ```ignore
//! use procmod::registry::{DefaultLibrary, DEFAULT_LIBRARIES};
//!
//! #[procmod::linkme::distributed_slice(DEFAULT_LIBRARIES)]
//! #[linkme(crate = procmod::linkme)]
//! static CLIMATE: DefaultLibrary = DefaultLibrary {
//!     namespace: "climate",
//!     processes: climate_defaults,
//! };
//! ```

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use linkme::distributed_slice;
use procmod_expr::{Equation, Symbol};
use tracing::{debug, warn};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::process::Process;

/// Handle naming a pool of default processes, usually a library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Descriptor for a library of default processes registered at link time.
pub struct DefaultLibrary {
    /// Namespace the processes are registered under
    pub namespace: &'static str,
    /// Builds the library's default processes
    pub processes: fn() -> Vec<Process>,
}

/// Distributed slice collecting all default process libraries.
#[distributed_slice]
pub static DEFAULT_LIBRARIES: [DefaultLibrary];

/// Namespace-keyed store of default processes.
///
/// Each namespace maps a variable to at most one process. Iteration follows
/// registration order; overwriting an entry keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct DefaultRegistry {
    namespaces: IndexMap<Namespace, IndexMap<Symbol, Process>>,
}

impl DefaultRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every library in [`DEFAULT_LIBRARIES`].
    ///
    /// Libraries run sorted by namespace so the result does not depend on
    /// link order.
    pub fn from_libraries() -> Self {
        let mut libraries: Vec<&DefaultLibrary> = DEFAULT_LIBRARIES.iter().collect();
        libraries.sort_by_key(|lib| lib.namespace);

        let mut registry = Self::new();
        for library in libraries {
            for process in (library.processes)() {
                registry.register(library.namespace, process, true);
            }
        }
        registry
    }

    /// Process-wide registry populated from [`DEFAULT_LIBRARIES`] on first
    /// access.
    pub fn global() -> &'static DefaultRegistry {
        static GLOBAL: OnceLock<DefaultRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_libraries)
    }

    /// Registers `process` as the default for its variable in `namespace`.
    ///
    /// An existing default for the same variable is replaced. If
    /// `warn_on_overwrite` is set the replacement is logged and returned as a
    /// diagnostic.
    pub fn register(
        &mut self,
        namespace: impl Into<Namespace>,
        process: Process,
        warn_on_overwrite: bool,
    ) -> Option<Diagnostic> {
        let namespace = namespace.into();
        let variable = process.variable().clone();
        let previous = self
            .namespaces
            .entry(namespace.clone())
            .or_default()
            .insert(variable.clone(), process);

        let previous = previous?;
        if !warn_on_overwrite {
            debug!(%namespace, %variable, "default process replaced");
            return None;
        }

        warn!(%namespace, %variable, "overwriting existing default process");
        Some(
            Diagnostic::warning(
                DiagnosticKind::RegistryOverwrite,
                variable.clone(),
                format!(
                    "default process for {variable} in namespace '{namespace}' already exists and will be overwritten"
                ),
            )
            .with_note(format!("previous default: {previous}")),
        )
    }

    /// Default process for `variable` in `namespace`.
    pub fn lookup(&self, namespace: &Namespace, variable: &Symbol) -> Option<&Process> {
        self.namespaces.get(namespace)?.get(variable)
    }

    /// All defaults of `namespace` in registration order.
    pub fn all(&self, namespace: &Namespace) -> Vec<&Process> {
        self.namespaces
            .get(namespace)
            .map(|defaults| defaults.values().collect())
            .unwrap_or_default()
    }

    /// Same as [`all`](Self::all), rendered as equations.
    pub fn equations(&self, namespace: &Namespace) -> Vec<Equation> {
        self.all(namespace).into_iter().map(Process::equation).collect()
    }

    /// Registered namespaces in first-registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.keys()
    }

    /// Number of defaults in `namespace`.
    pub fn len(&self, namespace: &Namespace) -> usize {
        self.namespaces.get(namespace).map_or(0, IndexMap::len)
    }
}
