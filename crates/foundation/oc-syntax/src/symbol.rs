//! Declaration records referenced from the tree

use crate::{AttrSet, BlockNr};
use indexmap::IndexMap;
use la_arena::Idx;
use oc_intern::Name;
use oc_span::Location;

/// Handle to a [`Symbol`] in the session's symbol arena
pub type SymbolId = Idx<Symbol>;

/// Field name to field symbol, in declaration order
pub type FieldTable = IndexMap<Name, SymbolId>;

/// What is known about one declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Base type and role
    pub attrs: AttrSet,
    /// Field table, for struct symbols
    pub fields: Option<FieldTable>,
    /// Where the name was declared
    pub loc: Location,
    /// Block the declaration belongs to; 0 for file scope, structs and fields
    pub block: BlockNr,
    /// Referenced struct, when the base type is a struct
    pub struct_name: Option<Name>,
    /// Parameters in order, for function symbols
    pub params: Option<Vec<SymbolId>>,
    /// Declared by a prototype rather than a definition
    pub prototype: bool,
    /// Variable this one replaced in the same table
    pub replaces: Option<SymbolId>,
}

impl Symbol {
    /// A symbol with no fields or parameters
    pub fn new(attrs: AttrSet, loc: Location, block: BlockNr, struct_name: Option<Name>) -> Self {
        Self {
            attrs,
            fields: None,
            loc,
            block,
            struct_name,
            params: None,
            prototype: false,
            replaces: None,
        }
    }

    /// A struct symbol owning `fields`
    pub fn structure(name: Name, loc: Location, fields: FieldTable) -> Self {
        Self {
            fields: Some(fields),
            ..Self::new(
                AttrSet::STRUCT | AttrSet::TYPEID,
                loc,
                BlockNr::GLOBAL,
                Some(name),
            )
        }
    }

    /// A function symbol with an empty parameter list
    pub fn function(attrs: AttrSet, loc: Location, struct_name: Option<Name>) -> Self {
        Self {
            params: Some(Vec::new()),
            ..Self::new(attrs | AttrSet::FUNCTION, loc, BlockNr::GLOBAL, struct_name)
        }
    }

    /// Whether the symbol names a function
    pub fn is_function(&self) -> bool {
        self.attrs.contains(AttrSet::FUNCTION)
    }

    /// Parameters of a function symbol, empty for anything else
    pub fn param_ids(&self) -> &[SymbolId] {
        self.params.as_deref().unwrap_or_default()
    }
}
