//! Model building entry points.

use procmod_expr::{Equation, Symbol};
use tracing::{debug, info, instrument};

use crate::config::BuildOptions;
use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::input::{flatten, ProcessInput};
use crate::model::Model;
use crate::process::Process;
use crate::registry::{DefaultRegistry, Namespace};
use crate::resolve::{resolve, Defaults};

/// A successfully built model with its advisory diagnostics.
#[derive(Debug, Clone)]
pub struct ModelBuild {
    pub model: Model,
    /// Warnings raised while resolving (empty when warnings are disabled)
    pub diagnostics: Vec<Diagnostic>,
    /// Parameters created for variables that fell back to their default value
    pub synthesized: Vec<Symbol>,
}

impl ModelBuild {
    pub fn into_model(self) -> Model {
        self.model
    }
}

/// Builds a model from `processes`.
///
/// Variables introduced by a process but lacking one of their own take a
/// default process from `defaults`; failing that, a variable with a default
/// value is pinned to a parameter (with a warning unless
/// `options.warn_on_parameter_fallback` is off). Anything else is an error,
/// as is a variable with two processes. The model is never partially built.
#[instrument(skip_all, fields(name = %options.model_name()))]
pub fn build_model(
    processes: impl IntoIterator<Item = ProcessInput>,
    defaults: Defaults<'_>,
    options: &BuildOptions,
) -> Result<ModelBuild> {
    let processes = flatten(processes)?;
    debug!(count = processes.len(), "processes flattened");

    let resolution = resolve(processes, defaults, options.warn_on_parameter_fallback)?;
    let synthesized = resolution.parameters.clone();
    let diagnostics = resolution.diagnostics.clone();
    let processes = resolution.into_processes();

    let model = Model::assemble(
        options.model_kind,
        options.model_name(),
        options.independent_symbol(),
        &processes,
        &synthesized,
    )?;

    info!(
        equations = model.equations().len(),
        warnings = diagnostics.len(),
        "model built"
    );

    Ok(ModelBuild {
        model,
        diagnostics,
        synthesized,
    })
}

/// Registers `process` (or every process of a group) as a default in
/// `namespace`.
///
/// Returns the overwrite warnings raised, if any.
pub fn register_default(
    registry: &mut DefaultRegistry,
    process: impl Into<ProcessInput>,
    namespace: impl Into<Namespace>,
    warn_on_overwrite: bool,
) -> Result<Vec<Diagnostic>> {
    let namespace = namespace.into();
    let mut warnings = Vec::new();
    for process in flatten([process.into()])? {
        warnings.extend(registry.register(namespace.clone(), process, warn_on_overwrite));
    }
    Ok(warnings)
}

/// Default processes of `namespace`, in registration order.
pub fn list_defaults(registry: &DefaultRegistry, namespace: impl Into<Namespace>) -> Vec<Process> {
    registry.all(&namespace.into()).into_iter().cloned().collect()
}

/// Default processes of `namespace` as equations.
pub fn list_default_equations(
    registry: &DefaultRegistry,
    namespace: impl Into<Namespace>,
) -> Vec<Equation> {
    registry.equations(&namespace.into())
}
