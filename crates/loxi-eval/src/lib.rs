//! loxi-eval - Tree-walking evaluator for Lox programs.
//!
//! This crate implements the runtime: dynamically typed [`Value`]s, the
//! lexical scope chain in [`Environment`], and the [`Interpreter`] that
//! walks the statement/expression tree produced by `loxi-par`. Runtime
//! errors are ordinary `Result` values carrying the offending token's
//! line; they unwind to the driver, which formats them and picks the exit
//! code.

mod env;
mod error;
mod interp;
mod value;

pub use env::Environment;
pub use error::{EvalError, RuntimeError};
pub use interp::Interpreter;
pub use value::Value;
