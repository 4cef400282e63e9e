//! Named symbols: variables, parameters and the independent variable.
//!
//! Symbols are identified by their kind and name only. The default value
//! attached to a symbol is metadata; two handles with the same name and kind
//! refer to the same symbol even if one of them carries a different default.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::expr::Expr;

/// What role a symbol plays in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    /// Time-dependent unknown that must be defined by exactly one process.
    Variable,
    /// Constant with a (usually numeric) default value.
    Parameter,
    /// The independent variable (time).
    Independent,
}

/// Default value attached to a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Plain numeric default
    Number(f64),
    /// Default given as an expression, typically another parameter
    Expr(Expr),
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        DefaultValue::Number(v)
    }
}

impl From<Expr> for DefaultValue {
    fn from(e: Expr) -> Self {
        DefaultValue::Expr(e)
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Number(v) => write!(f, "{v}"),
            DefaultValue::Expr(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug)]
struct SymbolData {
    name: String,
    kind: SymbolKind,
    default: Option<DefaultValue>,
}

/// Handle to a named symbol.
///
/// Cloning is cheap (reference counted). Equality, ordering and hashing use
/// `(kind, name)`.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

impl Symbol {
    fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self(Arc::new(SymbolData {
            name: name.into(),
            kind,
            default: None,
        }))
    }

    /// Creates a variable without a default value.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Variable)
    }

    /// Creates a parameter without a default value.
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Parameter)
    }

    /// Creates the independent variable of a model.
    pub fn independent(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Independent)
    }

    /// Returns a handle to the same symbol carrying `value` as its default.
    pub fn with_default(self, value: impl Into<DefaultValue>) -> Self {
        Self(Arc::new(SymbolData {
            name: self.0.name.clone(),
            kind: self.0.kind,
            default: Some(value.into()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.0.kind
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.0.default.as_ref()
    }

    pub fn is_variable(&self) -> bool {
        self.0.kind == SymbolKind::Variable
    }

    pub fn is_parameter(&self) -> bool {
        self.0.kind == SymbolKind::Parameter
    }
}

/// Default value of `symbol`, or `None` if it has none.
pub fn default_value(symbol: &Symbol) -> Option<&DefaultValue> {
    symbol.default()
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.kind == other.0.kind && self.0.name == other.0.name)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.kind.hash(state);
        self.0.name.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.0.kind, &self.0.name).cmp(&(other.0.kind, &other.0.name))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.default {
            Some(d) => write!(f, "{:?}({} = {})", self.0.kind, self.0.name, d),
            None => write!(f, "{:?}({})", self.0.kind, self.0.name),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_default() {
        let a = Symbol::variable("x");
        let b = Symbol::variable("x").with_default(1.0);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_kind_distinguishes() {
        assert_ne!(Symbol::variable("x"), Symbol::parameter("x"));
    }

    #[test]
    fn test_default_value() {
        let y = Symbol::variable("y").with_default(0.5);
        assert_eq!(default_value(&y), Some(&DefaultValue::Number(0.5)));
        assert_eq!(default_value(&Symbol::variable("z")), None);
    }
}
