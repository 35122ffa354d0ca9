//! Syntax trees for oc programs
//!
//! The parser is not part of this workspace; trees arrive either through
//! [`TreeBuilder`] or as JSON via [`load_json`]. The semantic pass annotates
//! [`Node`]s in place and records declarations as [`Symbol`]s.

mod attrs;
mod builder;
mod dump;
mod kind;
mod load;
mod node;
mod symbol;

pub use attrs::AttrSet;
pub use builder::{Pos, TreeBuilder, type_kind};
pub use dump::{dump_tree, node_line};
pub use kind::NodeKind;
pub use load::{LoadError, check_shape, load_json};
pub use node::{BlockNr, Node};
pub use symbol::{FieldTable, Symbol, SymbolId};

pub use la_arena::Arena;
