//! Named parameter synthesis.
//!
//! Processes frequently need constants: timescales, the value a variable is
//! pinned to when it has no process, coefficients supplied by library
//! callers. These helpers turn plain numbers into named parameters whose
//! names derive from the variable they belong to, while letting callers opt
//! out by passing an existing expression or a literal.

use procmod_expr::{DefaultValue, Expr, Symbol};

use crate::error::{Error, Result};
use crate::process::Process;

/// Prefix used for derived timescale parameters (`τ_x`).
pub const TIMESCALE_PREFIX: &str = "τ";

/// Suffix used for parameters that pin a variable to its default (`x_0`).
pub const PARAMETER_SUFFIX: &str = "0";

/// A value that may become a named parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Number to wrap in a new named parameter
    Number(f64),
    /// Existing expression, used as-is
    Expr(Expr),
    /// Number inserted verbatim, no parameter created
    Literal(f64),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<Expr> for ParamValue {
    fn from(e: Expr) -> Self {
        ParamValue::Expr(e)
    }
}

impl From<&Symbol> for ParamValue {
    fn from(s: &Symbol) -> Self {
        ParamValue::Expr(Expr::from(s))
    }
}

impl From<&DefaultValue> for ParamValue {
    fn from(d: &DefaultValue) -> Self {
        match d {
            DefaultValue::Number(v) => ParamValue::Number(*v),
            DefaultValue::Expr(e) => ParamValue::Expr(e.clone()),
        }
    }
}

/// How a derived parameter name is put together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Put `extra` before the variable name instead of after it
    pub prefix: bool,
    /// String joining `extra` and the variable name
    pub connector: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            prefix: true,
            connector: "_".to_string(),
        }
    }
}

impl Naming {
    pub fn suffix() -> Self {
        Self {
            prefix: false,
            ..Self::default()
        }
    }

    /// Joins `variable_name` and `extra` according to this convention.
    pub fn derive(&self, variable_name: &str, extra: &str) -> String {
        if self.prefix {
            format!("{extra}{}{variable_name}", self.connector)
        } else {
            format!("{variable_name}{}{extra}", self.connector)
        }
    }
}

/// Turns `value` into an expression, creating a named parameter for plain
/// numbers.
///
/// Expressions are returned unchanged and literals become number literals.
/// A number yields a new parameter named after `variable_name` and `extra`
/// (e.g. `τ_x`) whose default value is the number.
pub fn new_derived_named_parameter(
    variable_name: &str,
    value: ParamValue,
    extra: &str,
    naming: &Naming,
) -> Expr {
    match value {
        ParamValue::Expr(e) => e,
        ParamValue::Literal(v) => Expr::Number(v),
        ParamValue::Number(v) => {
            let name = naming.derive(variable_name, extra);
            Expr::Symbol(Symbol::parameter(name).with_default(v))
        }
    }
}

/// Converts named values into parameters in one go.
///
/// Each number becomes a parameter with the given name; expressions are kept
/// as they are and literals stay numeric.
pub fn convert_to_parameters(values: &[(&str, ParamValue)]) -> Vec<Expr> {
    values
        .iter()
        .map(|(name, value)| match value {
            ParamValue::Number(v) => Expr::Symbol(Symbol::parameter(*name).with_default(*v)),
            ParamValue::Expr(e) => e.clone(),
            ParamValue::Literal(v) => Expr::Number(*v),
        })
        .collect()
}

/// Output of [`synthesize`].
#[derive(Debug, Clone)]
pub struct Synthesized {
    /// Right-hand side the variable is equated to
    pub parameter: Expr,
    /// The equating process `variable ~ parameter`
    pub process: Process,
    /// The parameter created on this call, if one was
    pub created: Option<Symbol>,
}

/// Equates `variable` to a constant.
///
/// With `value = None` the variable's own default value is used. A number
/// becomes a new parameter named `<variable>_<suffix>`; an expression (for
/// instance an existing parameter) is used unchanged and nothing new is
/// created.
pub fn synthesize(variable: &Symbol, value: Option<ParamValue>, suffix: &str) -> Result<Synthesized> {
    let value = match value {
        Some(v) => v,
        None => variable
            .default()
            .map(ParamValue::from)
            .ok_or_else(|| Error::NoDefaultValue {
                variable: variable.clone(),
            })?,
    };

    let creates = matches!(value, ParamValue::Number(_));
    let parameter = new_derived_named_parameter(variable.name(), value, suffix, &Naming::suffix());
    let created = if creates {
        parameter.as_symbol().cloned()
    } else {
        None
    };

    Ok(Synthesized {
        process: Process::pinned(variable.clone(), parameter.clone()),
        parameter,
        created,
    })
}
