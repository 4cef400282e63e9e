// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Process-based model building
//!
//! Models are described as a list of *processes*, each defining exactly one
//! variable. [`build_model`] resolves that list into a complete system of
//! equations:
//!
//! - variables introduced by a process without a process of their own take a
//!   default process, if one is available,
//! - otherwise a variable with a default value is pinned to a named
//!   parameter, with a warning,
//! - otherwise the build fails, naming the variable and every process that
//!   referenced it.
//!
//! Two processes for the same variable are always an error.
//!
//! # Example
//!
//! ```
//! use procmod::{build_model, processes, BuildOptions, Defaults, Process, Timescale};
//! use procmod_expr::{Equation, Expr, Symbol};
//!
//! let z = Symbol::variable("z").with_default(0.0);
//! let x = Symbol::variable("x");
//! let y = Symbol::variable("y").with_default(0.0);
//!
//! let set = processes![
//!     Process::exp_relaxation(z.clone(), Expr::from(&x).pow(2.0), Timescale::Unit),
//!     Equation::new(Expr::d(&x), 0.1 * &y),
//!     Equation::new(&y, &z - &x),
//! ];
//!
//! let build = build_model(set, Defaults::None, &BuildOptions::default()).unwrap();
//! assert_eq!(build.model.equations().len(), 3);
//! assert!(build.diagnostics.is_empty());
//! ```

pub mod build;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod input;
pub mod model;
pub mod process;
pub mod registry;
pub mod resolve;
pub mod synth;
pub mod timescale;

pub use build::{build_model, list_default_equations, list_defaults, register_default, ModelBuild};
pub use config::BuildOptions;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::{Error, Result};
pub use input::{flatten, ProcessInput};
pub use model::{Model, ModelKind};
pub use process::{Addend, Process, ProcessKind};
pub use registry::{DefaultLibrary, DefaultRegistry, Namespace, DEFAULT_LIBRARIES};
pub use resolve::{resolve, resolve_inputs, Defaults, Origin, Resolution, Resolved};
pub use synth::{
    convert_to_parameters, new_derived_named_parameter, synthesize, Naming, ParamValue,
    Synthesized,
};
pub use timescale::Timescale;

// Libraries registering through this path need
// `#[linkme(crate = procmod::linkme)]` on the element.
pub use linkme;
