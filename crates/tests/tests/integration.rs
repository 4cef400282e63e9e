//! Integration tests for model building.
//!
//! These cover the full path: process set → flatten → resolve → assemble.

use procmod::{
    build_model, list_default_equations, list_defaults, processes, register_default,
    BuildOptions, DefaultRegistry, Defaults, DiagnosticKind, Error, ModelKind, Process,
    ProcessInput, Timescale,
};
use procmod_expr::{Equation, Expr, Symbol};
use procmod_tests::{
    ensure_registered, equation_strings, init_logging, unknown_names, IllustrativeSystem,
    ILLUSTRATIVE_NAMESPACE,
};

fn options() -> BuildOptions {
    BuildOptions::new().with_name("example")
}

/// All three processes given: three equations, nothing synthesized.
#[test]
fn test_full_system_builds() {
    init_logging();
    let s = IllustrativeSystem::new();

    let build = build_model(processes![s.all()], Defaults::None, &options()).unwrap();

    assert_eq!(unknown_names(&build.model), vec!["z", "x", "y"]);
    assert_eq!(
        equation_strings(&build.model),
        vec!["D(z) ~ x^2 - z", "D(x) ~ 0.1*y", "y ~ z - x"]
    );
    assert!(build.synthesized.is_empty());
    assert!(build.diagnostics.is_empty());
    assert!(build.model.parameters().is_empty());
}

/// The same system given as bare equations.
#[test]
fn test_equations_are_promoted() {
    let s = IllustrativeSystem::new();
    let set = processes![
        s.z_process(),
        Equation::new(Expr::d(&s.x), 0.1 * &s.y),
        Equation::new(&s.y, &s.z - &s.x),
    ];

    let build = build_model(set, Defaults::None, &options()).unwrap();
    assert_eq!(unknown_names(&build.model), vec!["z", "x", "y"]);
}

/// Forgetting `y` (which has a default value) pins it to a parameter.
#[test]
fn test_missing_y_falls_back_to_parameter() {
    init_logging();
    let s = IllustrativeSystem::new();

    let build = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::None,
        &options(),
    )
    .unwrap();

    assert_eq!(unknown_names(&build.model), vec!["z", "x", "y"]);
    assert_eq!(equation_strings(&build.model)[2], "y ~ y_0");
    assert_eq!(build.synthesized.len(), 1);
    assert_eq!(build.synthesized[0].name(), "y_0");
    assert_eq!(build.model.parameters(), build.synthesized.as_slice());

    assert_eq!(build.diagnostics.len(), 1);
    let warning = &build.diagnostics[0];
    assert_eq!(warning.kind, DiagnosticKind::ParameterFallback);
    assert_eq!(warning.variable, s.y);
    assert!(warning
        .message
        .starts_with("variable y was introduced in process of variable x."));
    assert!(warning.message.contains("`y ~ y_0`"));
}

/// Warnings only change diagnostics, never the model.
#[test]
fn test_fallback_warning_can_be_disabled() {
    let s = IllustrativeSystem::new();
    let loud = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::None,
        &options(),
    )
    .unwrap();
    let quiet = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::None,
        &options().with_warn_on_parameter_fallback(false),
    )
    .unwrap();

    assert!(quiet.diagnostics.is_empty());
    assert_eq!(loud.model, quiet.model);
    assert_eq!(loud.synthesized, quiet.synthesized);
}

/// Forgetting `x` (no default value) is fatal and points at every process
/// that referenced it.
#[test]
fn test_missing_x_is_an_error() {
    let s = IllustrativeSystem::new();

    let err = build_model(
        processes![s.z_process(), s.y_process()],
        Defaults::None,
        &options(),
    )
    .unwrap_err();

    match &err {
        Error::MissingProcess {
            variable,
            provenance,
        } => {
            assert_eq!(variable, &s.x);
            assert!(provenance.contains(&s.z));
            assert!(provenance.contains(&s.y));
        }
        other => panic!("expected MissingProcess, got {other}"),
    }
    assert!(err
        .to_string()
        .contains("there is no default process for x, and x doesn't have a default value"));
}

/// Without a default value for `y`, forgetting its process is fatal with the
/// `x` process as sole provenance.
#[test]
fn test_missing_y_without_default_value() {
    let s = IllustrativeSystem::new();
    let y = Symbol::variable("y");
    let x_process = Process::time_derivative(s.x.clone(), 0.1 * &y, Timescale::Unit);

    let err = build_model(
        processes![s.z_process(), x_process],
        Defaults::None,
        &options(),
    )
    .unwrap_err();

    assert_eq!(err.variable(), Some(&y));
    assert_eq!(err.provenance(), &[s.x.clone()]);
}

/// A default process set fills the gap silently.
#[test]
fn test_default_process_set() {
    let s = IllustrativeSystem::new();

    let with_defaults = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::Processes(processes![s.y_process()]),
        &options(),
    )
    .unwrap();
    let full = build_model(processes![s.all()], Defaults::None, &options()).unwrap();

    assert_eq!(with_defaults.model, full.model);
    assert!(with_defaults.diagnostics.is_empty());
    assert!(with_defaults.synthesized.is_empty());
}

/// Duplicate processes are fatal in either order, even when resolvable.
#[test]
fn test_duplicate_process_any_order() {
    let s = IllustrativeSystem::new();
    let alternative = Process::parameter(&s.y).unwrap();

    for set in [
        processes![s.all(), alternative.clone()],
        processes![alternative.clone(), s.all()],
    ] {
        let err = build_model(set, Defaults::None, &options()).unwrap_err();
        match err {
            Error::DuplicateAssignment {
                variable,
                existing,
                conflicting,
            } => {
                assert_eq!(variable, s.y);
                assert_ne!(existing, conflicting);
            }
            other => panic!("expected DuplicateAssignment, got {other}"),
        }
    }
}

/// A duplicate hidden inside a nested group is still detected.
#[test]
fn test_duplicate_in_nested_group() {
    let s = IllustrativeSystem::new();
    let set = processes![
        s.z_process(),
        vec![
            ProcessInput::from(s.x_process()),
            ProcessInput::from(vec![Equation::new(Expr::d(&s.x), Expr::Number(0.0))]),
        ],
    ];
    let err = build_model(set, Defaults::None, &options()).unwrap_err();
    assert!(matches!(err, Error::DuplicateAssignment { .. }));
}

/// Registry defaults: the most recent registration wins.
#[test]
fn test_registry_overwrite_uses_latest() {
    let s = IllustrativeSystem::new();
    let mut registry = DefaultRegistry::new();

    let first = register_default(&mut registry, s.y_process(), "lib", false).unwrap();
    let second = register_default(
        &mut registry,
        Process::new(s.y.clone(), Expr::Number(42.0)),
        "lib",
        false,
    )
    .unwrap();
    assert!(first.is_empty());
    assert!(second.is_empty());

    let build = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::namespace(&registry, "lib"),
        &options(),
    )
    .unwrap();
    assert_eq!(equation_strings(&build.model)[2], "y ~ 42");
    assert!(build.diagnostics.is_empty());
}

/// Registering twice with warnings enabled reports the overwrite.
#[test]
fn test_registry_overwrite_warns() {
    let s = IllustrativeSystem::new();
    let mut registry = DefaultRegistry::new();
    register_default(&mut registry, s.y_process(), "lib", true).unwrap();
    let warnings = register_default(&mut registry, s.y_process(), "lib", true).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, DiagnosticKind::RegistryOverwrite);
    assert_eq!(list_defaults(&registry, "lib").len(), 1);
    assert_eq!(
        list_default_equations(&registry, "lib")[0].to_string(),
        "y ~ z - x"
    );
}

/// The link-time library is visible through the global registry.
#[test]
fn test_global_registry_library() {
    ensure_registered();
    let s = IllustrativeSystem::new();

    let build = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::namespace(DefaultRegistry::global(), ILLUSTRATIVE_NAMESPACE),
        &options(),
    )
    .unwrap();
    assert_eq!(equation_strings(&build.model)[2], "y ~ z - x");
    assert!(build.diagnostics.is_empty());
}

/// Defaults from the wrong namespace are not used.
#[test]
fn test_namespace_isolation() {
    let s = IllustrativeSystem::new();
    let mut registry = DefaultRegistry::new();
    register_default(&mut registry, s.y_process(), "ocean", true).unwrap();

    let build = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::namespace(&registry, "atmosphere"),
        &options(),
    )
    .unwrap();
    assert_eq!(build.synthesized.len(), 1);
}

/// Output holds exactly the closure reachable from the inputs, inputs first.
#[test]
fn test_closure_through_defaults() {
    let a = Symbol::variable("a");
    let b = Symbol::variable("b");
    let c = Symbol::variable("c").with_default(1.0);
    let unrelated = Symbol::variable("unrelated");
    let root = Symbol::variable("root");

    let mut registry = DefaultRegistry::new();
    register_default(&mut registry, Process::new(a.clone(), &b * &c), "lib", true).unwrap();
    register_default(&mut registry, Process::new(b.clone(), Expr::Number(2.0)), "lib", true)
        .unwrap();
    register_default(
        &mut registry,
        Process::new(unrelated, Expr::Number(0.0)),
        "lib",
        true,
    )
    .unwrap();

    let build = build_model(
        processes![Process::new(root, Expr::from(&a) + 1.0)],
        Defaults::namespace(&registry, "lib"),
        &options().with_warn_on_parameter_fallback(false),
    )
    .unwrap();

    assert_eq!(unknown_names(&build.model), vec!["root", "a", "b", "c"]);
    assert_eq!(build.synthesized.len(), 1);
}

/// Timescales become named parameters in the model.
#[test]
fn test_timescale_parameters() {
    let s = IllustrativeSystem::new();
    let set = processes![
        Process::exp_relaxation(s.z.clone(), Expr::from(&s.x).pow(2.0), 2.0),
        Process::time_derivative(s.x.clone(), 0.1 * &s.y, 0.5),
        s.y_process(),
    ];

    let build = build_model(set, Defaults::None, &options()).unwrap();
    let names: Vec<_> = build.model.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["τ_z", "τ_x"]);
    assert!(build.synthesized.is_empty());
    assert_eq!(equation_strings(&build.model)[0], "τ_z*D(z) ~ x^2 - z");
}

/// A built model can be fed back in as part of a larger process set.
#[test]
fn test_model_as_input() {
    let s = IllustrativeSystem::new();
    let partial = build_model(
        processes![s.z_process(), s.x_process()],
        Defaults::None,
        &options().with_warn_on_parameter_fallback(false),
    )
    .unwrap()
    .into_model();

    let w = Symbol::variable("w");
    let build = build_model(
        processes![partial, Process::new(w, &s.y * 3.0)],
        Defaults::None,
        &options(),
    )
    .unwrap();
    assert_eq!(unknown_names(&build.model), vec!["z", "x", "y", "w"]);
    assert!(build.diagnostics.is_empty());
}

/// A model whose timescale is a compound expression re-enters unchanged.
#[test]
fn test_model_with_compound_timescale_as_input() {
    let x = Symbol::variable("x");
    let k = Symbol::parameter("k");
    let first = build_model(
        processes![Process::time_derivative(x.clone(), 1.0, Timescale::from(&k * 2.0))],
        Defaults::None,
        &options(),
    )
    .unwrap()
    .into_model();
    assert_eq!(equation_strings(&first), vec!["k*2*D(x) ~ 1"]);

    let again = build_model(processes![first.clone()], Defaults::None, &options()).unwrap();
    assert_eq!(again.model.equations(), first.equations());
    assert_eq!(again.model.parameters(), first.parameters());
}

/// Expression default values reuse existing parameters instead of creating new ones.
#[test]
fn test_shared_expression_default_synthesizes_nothing() {
    let q = Symbol::parameter("q").with_default(1.0);
    let u = Symbol::variable("u").with_default(Expr::from(&q));
    let v = Symbol::variable("v").with_default(Expr::from(&q));
    let root = Symbol::variable("root");

    let build = build_model(
        processes![Process::new(root, &u + &v)],
        Defaults::None,
        &options().with_warn_on_parameter_fallback(false),
    )
    .unwrap();
    assert!(build.synthesized.is_empty());
    assert_eq!(build.model.parameters(), &[q]);
    assert_eq!(equation_strings(&build.model), vec!["root ~ u + v", "u ~ q", "v ~ q"]);
}

/// A nonlinear model refuses time derivatives.
#[test]
fn test_nonlinear_kind() {
    let s = IllustrativeSystem::new();
    let err = build_model(
        processes![s.all()],
        Defaults::None,
        &options().with_kind(ModelKind::Nonlinear),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidModel { .. }));

    let algebraic = build_model(
        processes![Process::new(s.y.clone(), Expr::Number(1.0))],
        Defaults::None,
        &BuildOptions::new().with_kind(ModelKind::Nonlinear),
    )
    .unwrap();
    assert_eq!(algebraic.model.name(), "NonlinearSystem");
}

/// Options loaded from a file drive the build.
#[test]
fn test_options_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name: from_file\nwarnOnParameterFallback: false").unwrap();
    let opts = BuildOptions::load(file.path()).unwrap();

    let s = IllustrativeSystem::new();
    let build = build_model(processes![s.z_process(), s.x_process()], Defaults::None, &opts)
        .unwrap();
    assert_eq!(build.model.name(), "from_file");
    assert!(build.diagnostics.is_empty());
}
