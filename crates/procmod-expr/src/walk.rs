//! Expression tree walking utilities.
//!
//! A single pre-order [`walk_expr`] drives every query in this module, so
//! each helper only decides what to collect.
//!
//! All collectors return symbols in first-occurrence order with duplicates
//! removed. Downstream diagnostics and model output rely on that order being
//! reproducible.

use indexmap::IndexSet;

use crate::expr::Expr;
use crate::symbol::{Symbol, SymbolKind};

/// Recursively walk an expression tree in pre-order, calling `visitor` for
/// each node.
pub fn walk_expr<V>(expr: &Expr, visitor: &mut V)
where
    V: FnMut(&Expr),
{
    visitor(expr);

    match expr {
        Expr::Number(_) | Expr::Symbol(_) => {}

        Expr::Derivative(inner) | Expr::Neg(inner) => walk_expr(inner, visitor),

        Expr::Add(children) | Expr::Mul(children) | Expr::Call { args: children, .. } => {
            for child in children {
                walk_expr(child, visitor);
            }
        }

        Expr::Sub(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
            walk_expr(a, visitor);
            walk_expr(b, visitor);
        }
    }
}

fn collect<F>(expr: &Expr, mut keep: F) -> Vec<Symbol>
where
    F: FnMut(&Symbol) -> bool,
{
    let mut found = IndexSet::new();
    walk_expr(expr, &mut |node| {
        if let Expr::Symbol(s) = node {
            if keep(s) {
                found.insert(s.clone());
            }
        }
    });
    found.into_iter().collect()
}

/// Every symbol referenced by `expr`, of any kind.
pub fn free_symbols(expr: &Expr) -> Vec<Symbol> {
    collect(expr, |_| true)
}

/// Variables referenced by `expr`.
///
/// Parameters and the independent variable are excluded: they never need a
/// defining process.
pub fn free_variables(expr: &Expr) -> Vec<Symbol> {
    collect(expr, |s| s.kind() == SymbolKind::Variable)
}

/// Parameters referenced by `expr`.
pub fn parameters_in(expr: &Expr) -> Vec<Symbol> {
    collect(expr, |s| s.kind() == SymbolKind::Parameter)
}

/// Whether `expr` references `symbol`.
pub fn contains_symbol(expr: &Expr, symbol: &Symbol) -> bool {
    let mut found = false;
    walk_expr(expr, &mut |node| {
        if let Expr::Symbol(s) = node {
            found |= s == symbol;
        }
    });
    found
}

/// Whether `expr` references any symbol (variable or parameter) called `name`.
pub fn contains_name(expr: &Expr, name: &str) -> bool {
    let mut found = false;
    walk_expr(expr, &mut |node| {
        if let Expr::Symbol(s) = node {
            found |= s.name() == name;
        }
    });
    found
}
