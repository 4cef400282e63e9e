//! Process resolution.
//!
//! Turns a flat list of processes into a closed system: every variable that
//! any process refers to ends up with exactly one defining process.
//!
//! # Algorithm
//!
//! 1. Assign every input process to its variable. A second process for the
//!    same variable is a [`Error::DuplicateAssignment`].
//! 2. Queue every referenced variable that has no process yet, remembering
//!    which processes referred to it (its provenance).
//! 3. Drain the queue. For each variable, in order of preference:
//!    - take its default process (which may queue further variables),
//!    - or, if it has a default value, pin it to a parameter and warn,
//!    - or fail with [`Error::MissingProcess`].
//!
//! This is a closure over the reference graph, not a topological sort: the
//! output lists the input processes in input order followed by the processes
//! pulled in during closure, in the order they were dequeued.
//!
//! # Termination
//!
//! A variable is only queued while it has no process and is assigned exactly
//! once when dequeued, so it can never be queued again. Self-references and
//! cycles that pass only through default processes therefore terminate after
//! at most one step per distinct variable.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use procmod_expr::Symbol;
use tracing::{debug, instrument, trace, warn};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::error::{describe_provenance, Error, Result};
use crate::input::{flatten, ProcessInput};
use crate::process::Process;
use crate::registry::{DefaultRegistry, Namespace};
use crate::synth::{synthesize, PARAMETER_SUFFIX};

/// Where default processes come from.
#[derive(Debug, Clone, Default)]
pub enum Defaults<'a> {
    /// No default processes
    #[default]
    None,
    /// Explicit list; later entries for the same variable win
    Processes(Vec<ProcessInput>),
    /// A namespace of a registry
    Namespace {
        registry: &'a DefaultRegistry,
        namespace: Namespace,
    },
}

impl<'a> Defaults<'a> {
    /// Defaults from `namespace` of `registry`.
    pub fn namespace(registry: &'a DefaultRegistry, namespace: impl Into<Namespace>) -> Self {
        Defaults::Namespace {
            registry,
            namespace: namespace.into(),
        }
    }
}

impl From<Vec<ProcessInput>> for Defaults<'_> {
    fn from(processes: Vec<ProcessInput>) -> Self {
        Defaults::Processes(processes)
    }
}

/// Defaults prepared for lookup.
enum DefaultTable<'a> {
    Empty,
    Owned(IndexMap<Symbol, Process>),
    Registry(&'a DefaultRegistry, Namespace),
}

impl<'a> DefaultTable<'a> {
    fn prepare(defaults: Defaults<'a>, diagnostics: &mut Vec<Diagnostic>) -> Result<Self> {
        Ok(match defaults {
            Defaults::None => DefaultTable::Empty,
            Defaults::Namespace {
                registry,
                namespace,
            } => DefaultTable::Registry(registry, namespace),
            Defaults::Processes(inputs) => {
                let mut table = IndexMap::new();
                for process in flatten(inputs)? {
                    let variable = process.variable().clone();
                    if let Some(previous) = table.insert(variable.clone(), process) {
                        debug!(%variable, "default process given twice, keeping the later one");
                        let mut note = Diagnostic::warning(
                            DiagnosticKind::RegistryOverwrite,
                            variable.clone(),
                            format!("default processes contain more than one process for {variable}; the last one is used"),
                        )
                        .with_note(format!("ignored: {previous}"));
                        note.severity = Severity::Note;
                        diagnostics.push(note);
                    }
                }
                DefaultTable::Owned(table)
            }
        })
    }

    fn lookup(&self, variable: &Symbol) -> Option<&Process> {
        match self {
            DefaultTable::Empty => None,
            DefaultTable::Owned(table) => table.get(variable),
            DefaultTable::Registry(registry, namespace) => registry.lookup(namespace, variable),
        }
    }
}

/// How a process entered the resolved system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Supplied by the caller
    Input,
    /// Taken from the default processes
    Default,
    /// Synthesized from the variable's default value
    ParameterFallback,
}

/// A process in the resolved system.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub process: Process,
    pub origin: Origin,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Resolved processes: inputs first, then closure additions
    pub assignments: Vec<Resolved>,
    /// Parameters synthesized for parameter fallbacks
    pub parameters: Vec<Symbol>,
    /// Advisory diagnostics raised along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.assignments.iter().map(|r| &r.process)
    }

    /// Variables defined by the resolved system, in output order.
    pub fn variables(&self) -> Vec<&Symbol> {
        self.processes().map(Process::variable).collect()
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.assignments.into_iter().map(|r| r.process).collect()
    }
}

/// Transient bookkeeping for one resolution.
#[derive(Default)]
struct ResolutionState {
    assigned: IndexMap<Symbol, Resolved>,
    frontier: VecDeque<Symbol>,
    queued: HashSet<Symbol>,
    provenance: HashMap<Symbol, Vec<Symbol>>,
}

impl ResolutionState {
    fn assign(&mut self, process: Process, origin: Origin) -> Result<()> {
        let variable = process.variable().clone();
        if let Some(existing) = self.assigned.get(&variable) {
            return Err(Error::DuplicateAssignment {
                variable,
                existing: Box::new(existing.process.clone()),
                conflicting: Box::new(process),
            });
        }
        trace!(%variable, ?origin, "assigned");
        self.assigned.insert(variable, Resolved { process, origin });
        Ok(())
    }

    /// Queues the unassigned variables `process` refers to.
    fn introduce(&mut self, process: &Process) {
        let introducer = process.variable();
        for variable in process.references() {
            if self.assigned.contains_key(&variable) {
                continue;
            }
            let chain = self.provenance.entry(variable.clone()).or_default();
            if !chain.contains(introducer) {
                chain.push(introducer.clone());
            }
            if self.queued.insert(variable.clone()) {
                trace!(%variable, %introducer, "introduced");
                self.frontier.push_back(variable);
            }
        }
    }

    fn provenance_of(&self, variable: &Symbol) -> Vec<Symbol> {
        self.provenance.get(variable).cloned().unwrap_or_default()
    }
}

/// Resolves `processes` into a closed system of processes.
///
/// Variables referenced but not defined are taken from `defaults`, or pinned
/// to a parameter if they carry a default value. With
/// `warn_on_parameter_fallback` the latter is logged and reported as a
/// diagnostic; the resolved processes are the same either way.
#[instrument(skip_all, fields(inputs = processes.len()))]
pub fn resolve(
    processes: Vec<Process>,
    defaults: Defaults<'_>,
    warn_on_parameter_fallback: bool,
) -> Result<Resolution> {
    let mut diagnostics = Vec::new();
    let table = DefaultTable::prepare(defaults, &mut diagnostics)?;
    let mut state = ResolutionState::default();

    for process in processes {
        state.assign(process, Origin::Input)?;
    }

    let inputs: Vec<Process> = state.assigned.values().map(|r| r.process.clone()).collect();
    for process in &inputs {
        state.introduce(process);
    }

    let mut parameters = Vec::new();

    while let Some(variable) = state.frontier.pop_front() {
        if let Some(default) = table.lookup(&variable) {
            debug!(%variable, "using default process");
            let process = default.clone();
            state.assign(process.clone(), Origin::Default)?;
            state.introduce(&process);
        } else if variable.default().is_some() {
            let synthesized = synthesize(&variable, None, PARAMETER_SUFFIX)?;
            let provenance = state.provenance_of(&variable);
            debug!(%variable, parameter = %synthesized.parameter, "falling back to parameter");

            if warn_on_parameter_fallback {
                let diagnostic = fallback_warning(
                    &variable,
                    &provenance,
                    &synthesized.process,
                    synthesized.created.is_some(),
                );
                warn!("{}", diagnostic.message);
                diagnostics.push(diagnostic);
            }

            parameters.extend(synthesized.created);

            let process = synthesized.process;
            state.assign(process.clone(), Origin::ParameterFallback)?;
            // A bare parameter introduces nothing; an expression default may.
            state.introduce(&process);
        } else {
            return Err(Error::MissingProcess {
                provenance: state.provenance_of(&variable),
                variable,
            });
        }
    }

    debug!(
        processes = state.assigned.len(),
        parameters = parameters.len(),
        "resolution complete"
    );

    Ok(Resolution {
        assignments: state.assigned.into_values().collect(),
        parameters,
        diagnostics,
    })
}

/// Convenience wrapper flattening a process set before [`resolve`].
pub fn resolve_inputs(
    inputs: impl IntoIterator<Item = ProcessInput>,
    defaults: Defaults<'_>,
    warn_on_parameter_fallback: bool,
) -> Result<Resolution> {
    resolve(flatten(inputs)?, defaults, warn_on_parameter_fallback)
}

fn fallback_warning(
    variable: &Symbol,
    provenance: &[Symbol],
    process: &Process,
    created: bool,
) -> Diagnostic {
    let action = if created {
        "we make it a parameter"
    } else {
        "we equate it to that value"
    };
    Diagnostic::warning(
        DiagnosticKind::ParameterFallback,
        variable.clone(),
        format!(
            "variable {variable} was introduced in {}.\n\
             However, a process for {variable} was not provided,\n\
             and there is no default process for it either.\n\
             Since it has a default value, {action} by adding a process: `{process}`.",
            describe_provenance(provenance)
        ),
    )
    .with_note(format!("value: {}", process.rhs()))
}
