//! Result of the semantic pass and the symbol-table dump

use la_arena::Arena;
use oc_intern::{Interner, Name};
use oc_resolve::{Diagnostics, SymbolTable};
use oc_syntax::{AttrSet, Symbol, SymbolId};

/// One line group of the symbol-table dump, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpEntry {
    /// A variable, parameter or function, indented by scope depth
    Symbol {
        /// Declared name
        name: Name,
        /// Its symbol
        id: SymbolId,
        /// Open scopes at the declaration
        depth: usize,
    },
    /// A struct followed by its fields
    Struct {
        /// Struct name
        name: Name,
        /// Its symbol
        id: SymbolId,
    },
    /// Blank separator line
    Break,
}

/// Everything the semantic pass learned about one tree
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Every symbol declared during the pass
    pub symbols: Arena<Symbol>,
    /// File-scope names
    pub globals: SymbolTable,
    /// Struct names
    pub structs: SymbolTable,
    /// Declarations in walk order, for the dump
    pub log: Vec<DumpEntry>,
    /// Problems found
    pub diagnostics: Diagnostics,
}

impl Analysis {
    /// Symbol behind `id`
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Symbol of the struct called `name`
    pub fn struct_symbol(&self, name: Name) -> Option<&Symbol> {
        self.structs.get(&name).map(|&id| &self.symbols[id])
    }

    /// Render the symbol tables in declaration order
    pub fn dump_symbols(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for entry in &self.log {
            match *entry {
                DumpEntry::Symbol { name, id, depth } => {
                    out.push_str(&"  ".repeat(depth));
                    out.push_str(&self.symbol_line(name, id, interner));
                    out.push('\n');
                }
                DumpEntry::Struct { name, id } => {
                    out.push_str(&self.symbol_line(name, id, interner));
                    out.push('\n');
                    self.write_fields(&mut out, name, id, interner);
                }
                DumpEntry::Break => out.push('\n'),
            }
        }
        out
    }

    fn symbol_line(&self, name: Name, id: SymbolId, interner: &Interner) -> String {
        let symbol = &self.symbols[id];
        let struct_name = symbol.struct_name.map(|s| interner.resolve(&s));
        let line = format!(
            "{} ({}) {{{}}} {}",
            interner.resolve(&name),
            symbol.loc,
            symbol.block,
            symbol.attrs.render(struct_name)
        );
        line.trim_end().to_string()
    }

    // Fields are listed last-declared first.
    fn write_fields(&self, out: &mut String, owner: Name, id: SymbolId, interner: &Interner) {
        let Some(fields) = &self.symbols[id].fields else {
            return;
        };
        for (&field, &field_id) in fields.iter().rev() {
            let symbol = &self.symbols[field_id];
            let struct_name = symbol.struct_name.map(|s| interner.resolve(&s));
            let rest = symbol.attrs.difference(AttrSet::FIELD).render(struct_name);
            let line = format!(
                "  {} ({}) field {{{}}} {}",
                interner.resolve(&field),
                symbol.loc,
                interner.resolve(&owner),
                rest
            );
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
}
