//! Semantic analysis for oc
//!
//! A single walk over the tree that resolves every name against the scope
//! stack, records declarations as symbols and propagates type attributes
//! onto the nodes. Problems are collected rather than fatal; callers decide
//! whether the result is good enough for code generation.

mod analysis;
mod checker;
pub mod compat;
mod decl;
mod expr;

pub use analysis::{Analysis, DumpEntry};
pub use checker::TypeChecker;
