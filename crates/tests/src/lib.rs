//! Integration test harness for procmod.
//!
//! Provides the illustrative three-variable system used across the
//! integration tests, a small default-process library registered at link
//! time, and logging setup.

use procmod::registry::{DefaultLibrary, DEFAULT_LIBRARIES};
use procmod::{Model, Process, Timescale};
use procmod_expr::{Expr, Symbol};
use tracing_subscriber::{fmt, EnvFilter};

/// Namespace of the link-time library defined here.
pub const ILLUSTRATIVE_NAMESPACE: &str = "illustrative";

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,procmod=debug"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// The system
///
/// ```text
/// D(z) ~ x^2 - z
/// D(x) ~ 0.1*y
/// y    ~ z - x
/// ```
///
/// with `z = 0.0`, `y = 0.0` as default values and no default for `x`.
pub struct IllustrativeSystem {
    pub z: Symbol,
    pub x: Symbol,
    pub y: Symbol,
}

impl Default for IllustrativeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl IllustrativeSystem {
    pub fn new() -> Self {
        Self {
            z: Symbol::variable("z").with_default(0.0),
            x: Symbol::variable("x"),
            y: Symbol::variable("y").with_default(0.0),
        }
    }

    /// Relaxation of `z` towards `x^2`; introduces `x`.
    pub fn z_process(&self) -> Process {
        Process::exp_relaxation(
            self.z.clone(),
            Expr::from(&self.x).pow(2.0),
            Timescale::Unit,
        )
    }

    /// `D(x) ~ 0.1*y`; introduces `y`.
    pub fn x_process(&self) -> Process {
        Process::time_derivative(self.x.clone(), 0.1 * &self.y, Timescale::Unit)
    }

    /// `y ~ z - x`.
    pub fn y_process(&self) -> Process {
        Process::new(self.y.clone(), &self.z - &self.x)
    }

    pub fn all(&self) -> Vec<Process> {
        vec![self.z_process(), self.x_process(), self.y_process()]
    }
}

fn illustrative_defaults() -> Vec<Process> {
    vec![IllustrativeSystem::new().y_process()]
}

#[procmod::linkme::distributed_slice(DEFAULT_LIBRARIES)]
#[linkme(crate = procmod::linkme)]
static ILLUSTRATIVE_LIBRARY: DefaultLibrary = DefaultLibrary {
    namespace: ILLUSTRATIVE_NAMESPACE,
    processes: illustrative_defaults,
};

/// Keeps the link-time library above in the final binary.
///
/// Call this before relying on [`DefaultRegistry::global`](procmod::DefaultRegistry::global)
/// containing the illustrative namespace.
pub fn ensure_registered() {
    std::hint::black_box(&ILLUSTRATIVE_LIBRARY);
}

/// Names of the variables a model defines, in equation order.
pub fn unknown_names(model: &Model) -> Vec<String> {
    model.unknowns().iter().map(|s| s.name().to_string()).collect()
}

/// Equations of a model rendered as strings.
pub fn equation_strings(model: &Model) -> Vec<String> {
    model.equations().iter().map(|eq| eq.to_string()).collect()
}
