// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Symbolic expressions for process-based models
//!
//! This crate contains the small symbolic layer the process resolver works
//! against: named variables and parameters with optional default values,
//! expression trees over them, equations, and traversal helpers that extract
//! the free variables of an expression.
//!
//! It deliberately does no algebra. Expressions are built, walked and
//! printed; simplification and solving belong to whatever consumes the
//! assembled model.
//!
//! # Example
//!
//! ```
//! use procmod_expr::{Expr, Symbol, free_variables};
//!
//! let x = Symbol::variable("x");
//! let y = Symbol::variable("y").with_default(0.0);
//! let rhs = Expr::from(&x).pow(2.0) - Expr::from(&y);
//!
//! let vars = free_variables(&rhs);
//! assert_eq!(vars, vec![x, y]);
//! ```

pub mod equation;
pub mod expr;
pub mod symbol;
pub mod walk;

pub use equation::Equation;
pub use expr::Expr;
pub use symbol::{default_value, DefaultValue, Symbol, SymbolKind};
pub use walk::{
    contains_name, contains_symbol, free_symbols, free_variables, parameters_in, walk_expr,
};
