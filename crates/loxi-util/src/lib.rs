//! loxi-util - Foundation types for the loxi interpreter pipeline.
//!
//! This crate holds the pieces every phase needs: source spans for
//! locating tokens and errors, the diagnostic model with its collecting
//! `Handler`, and the hash map types used across the workspace.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, ErrorAt, Handler, Level};
pub use span::Span;

// Re-export commonly used types
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
