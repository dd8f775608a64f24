//! Symbolic expressions and their numeric evaluation for slidefig.
//!
//! This crate covers the two collaborator services the plotting engine
//! consumes:
//!
//! - **Numeric compilation**: [`NumericCompiler`] turns an [`Expr`] plus an
//!   ordered list of free symbols into a [`NumericFunction`] that evaluates
//!   the first symbol over a sample vector and the rest as scalar
//!   parameters. [`TreeCompiler`] evaluates evalexpr operator trees;
//!   [`CachedCompiler`] memoizes any compiler by expression and symbol order.
//! - **Value coercion**: [`ValueCoercion`] turns raw author/user input
//!   (numbers, text such as `"pi/2"`, constant expressions) into a number of
//!   the requested [`NumericKind`].
//!
//! # Example
//!
//! ```
//! use sf_expr::{NumericCompiler, Symbol, TreeCompiler, parse};
//!
//! let x = Symbol::new("x");
//! let a = Symbol::new("a");
//! let expr = parse("a * x^2").unwrap();
//! let f = TreeCompiler.compile(&expr, &[x, a]).unwrap();
//!
//! let ys = f.evaluate(&[0.0, 1.0, 2.0], &[0.5]).unwrap();
//! assert_eq!(ys, vec![0.0, 0.5, 2.0]);
//! ```

pub mod coerce;
pub mod compile;
pub mod error;
pub mod expr;
pub mod parser;

pub use coerce::{ExprCoercion, Numeric, NumericKind, RawValue, ValueCoercion};
pub use compile::{
    CachedCompiler, CompiledExpr, DEFAULT_CACHE_CAPACITY, NumericCompiler, NumericFunction,
    TreeCompiler,
};
pub use error::{CoerceError, CompileError, EvalError, ParseError};
pub use expr::{Expr, Symbol, is_constant, is_function};
pub use parser::{parse, parse_prefix};
