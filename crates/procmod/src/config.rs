//! Build options.
//!
//! Options can be set in code through the builder methods or loaded from a
//! YAML document:
//!
//! ```yaml
//! modelKind: ode
//! name: climate
//! independent: t
//! warnOnParameterFallback: false
//! ```

use std::path::Path;

use procmod_expr::Symbol;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ModelKind;

fn default_independent() -> String {
    "t".to_string()
}

fn default_warn() -> bool {
    true
}

/// Options for [`build_model`](crate::build_model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// Container type to populate.
    #[serde(default)]
    pub model_kind: ModelKind,

    /// Model name. Defaults to the model kind's name.
    #[serde(default)]
    pub name: Option<String>,

    /// Name of the independent variable (unitless time).
    #[serde(default = "default_independent")]
    pub independent: String,

    /// Warn when a variable without process is turned into a parameter.
    #[serde(default = "default_warn")]
    pub warn_on_parameter_fallback: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            model_kind: ModelKind::default(),
            name: None,
            independent: default_independent(),
            warn_on_parameter_fallback: default_warn(),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_kind(mut self, kind: ModelKind) -> Self {
        self.model_kind = kind;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_independent(mut self, name: impl Into<String>) -> Self {
        self.independent = name.into();
        self
    }

    pub fn with_warn_on_parameter_fallback(mut self, warn: bool) -> Self {
        self.warn_on_parameter_fallback = warn;
        self
    }

    /// Effective model name.
    pub fn model_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.model_kind.default_name().to_string())
    }

    pub fn independent_symbol(&self) -> Symbol {
        Symbol::independent(self.independent.as_str())
    }
}
