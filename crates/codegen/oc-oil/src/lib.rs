//! Oil generation
//!
//! Oil is a flat C-like intermediate language: struct layouts, file-scope
//! string bindings and globals, one function per definition and a
//! `__ocmain` holding the top-level statements. Control flow is lowered to
//! labels and gotos, and every compound expression goes through a numbered
//! temporary.

pub mod mangle;
mod lower;
pub mod temps;
pub mod types;
mod writer;

pub use mangle::{MangleKind, label, mangle};
pub use writer::OilWriter;
