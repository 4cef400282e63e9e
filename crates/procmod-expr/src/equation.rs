//! Equations of the form `lhs ~ rhs`.

use std::fmt;

use crate::expr::Expr;

/// A symbolic equation `lhs ~ rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// Whether either side contains a time derivative.
    pub fn is_differential(&self) -> bool {
        let mut found = false;
        for side in [&self.lhs, &self.rhs] {
            crate::walk::walk_expr(side, &mut |e| {
                if matches!(e, Expr::Derivative(_)) {
                    found = true;
                }
            });
        }
        found
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.lhs, self.rhs)
    }
}
