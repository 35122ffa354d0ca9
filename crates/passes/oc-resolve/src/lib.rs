//! Scope management for the oc semantic pass
//!
//! [`ScopeStack`] tracks open blocks and the symbol tables that belong to
//! them. Errors found while resolving are collected in [`Diagnostics`]
//! rather than aborting the walk.

pub mod error;
pub mod scope;

pub use error::{Diagnostic, Diagnostics, SemanticError, Severity};
pub use oc_syntax::{FieldTable, Symbol, SymbolId};
pub use scope::{DeclTarget, ScopeStack, SymbolTable};
