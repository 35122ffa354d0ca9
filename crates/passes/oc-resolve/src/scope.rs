//! Block-structured scopes over symbol tables

use crate::error::SemanticError;
use oc_intern::{Interner, Name};
use oc_span::Location;
use oc_syntax::{BlockNr, SymbolId};
use rustc_hash::FxHashMap;

/// Names declared in one scope
pub type SymbolTable = FxHashMap<Name, SymbolId>;

/// Which table a declaration goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclTarget {
    /// File scope, for functions and top-level variables
    Global,
    /// The innermost open scope, for locals and parameters
    Innermost,
}

/// Stack of open scopes, global table at the bottom
///
/// Block numbers come from a counter that only grows, so every block opened
/// during one run gets a distinct number.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    tables: Vec<SymbolTable>,
    restore: Vec<BlockNr>,
    current: BlockNr,
    counter: u32,
}

impl ScopeStack {
    /// Only the global scope is open
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::default()],
            restore: Vec::new(),
            current: BlockNr::GLOBAL,
            counter: 0,
        }
    }

    /// Open a scope with a fresh block number and return that number
    pub fn enter_block(&mut self) -> BlockNr {
        self.counter += 1;
        self.restore.push(self.current);
        self.current = BlockNr(self.counter);
        self.tables.push(SymbolTable::default());
        tracing::trace!(block = %self.current, depth = self.depth(), "enter block");
        self.current
    }

    /// Close the innermost scope and restore the enclosing block number
    ///
    /// # Panics
    ///
    /// When no scope besides the global one is open.
    pub fn exit_block(&mut self) {
        let Some(previous) = self.restore.pop() else {
            panic!("exit_block called with only the global scope open");
        };
        tracing::trace!(block = %self.current, restored = %previous, "exit block");
        self.tables.pop();
        self.current = previous;
    }

    /// Block number declarations currently receive
    pub fn current_block(&self) -> BlockNr {
        self.current
    }

    /// Number of scopes open above the global one
    pub fn depth(&self) -> usize {
        self.restore.len()
    }

    /// Bind `name`, returning the entry it replaced in the same table
    pub fn declare(&mut self, name: Name, symbol: SymbolId, target: DeclTarget) -> Option<SymbolId> {
        let table = match target {
            DeclTarget::Global => self.tables.first_mut(),
            DeclTarget::Innermost => self.tables.last_mut(),
        };
        table.and_then(|table| table.insert(name, symbol))
    }

    /// Resolve `name` from the innermost scope outwards
    pub fn lookup(
        &self,
        name: Name,
        use_site: Location,
        interner: &Interner,
    ) -> Result<SymbolId, SemanticError> {
        self.find(name)
            .ok_or_else(|| self.unresolved(name, use_site, interner, self.visible_names()))
    }

    /// Resolve `name` in the global scope only
    pub fn lookup_global(
        &self,
        name: Name,
        use_site: Location,
        interner: &Interner,
    ) -> Result<SymbolId, SemanticError> {
        self.globals()
            .get(&name)
            .copied()
            .ok_or_else(|| self.unresolved(name, use_site, interner, self.globals().keys().copied().collect()))
    }

    /// Innermost binding of `name`, if any
    pub fn find(&self, name: Name) -> Option<SymbolId> {
        self.tables
            .iter()
            .rev()
            .find_map(|table| table.get(&name).copied())
    }

    /// The global table
    pub fn globals(&self) -> &SymbolTable {
        &self.tables[0]
    }

    fn visible_names(&self) -> Vec<Name> {
        self.tables.iter().flat_map(|table| table.keys().copied()).collect()
    }

    fn unresolved(
        &self,
        name: Name,
        use_site: Location,
        interner: &Interner,
        candidates: Vec<Name>,
    ) -> SemanticError {
        let text = interner.resolve(&name);
        SemanticError::UnresolvedIdentifier {
            name: text.to_string(),
            use_site,
            suggestions: SemanticError::compute_suggestions(text, candidates, interner),
        }
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_syntax::{Arena, AttrSet, Symbol};
    use proptest::prelude::*;

    fn alloc(arena: &mut Arena<Symbol>, block: BlockNr) -> SymbolId {
        arena.alloc(Symbol::new(AttrSet::INT, Location::default(), block, None))
    }

    #[test]
    fn test_inner_declaration_shadows_outer() {
        let interner = Interner::new();
        let mut arena = Arena::new();
        let mut scopes = ScopeStack::new();
        let x = interner.intern("x");

        let outer = alloc(&mut arena, scopes.current_block());
        scopes.declare(x, outer, DeclTarget::Global);
        let block = scopes.enter_block();
        assert_eq!(block, BlockNr(1));
        let inner = alloc(&mut arena, block);
        scopes.declare(x, inner, DeclTarget::Innermost);

        assert_eq!(scopes.lookup(x, Location::default(), &interner), Ok(inner));
        scopes.exit_block();
        assert_eq!(scopes.lookup(x, Location::default(), &interner), Ok(outer));
    }

    #[test]
    fn test_redeclaration_returns_previous_entry() {
        let interner = Interner::new();
        let mut arena = Arena::new();
        let mut scopes = ScopeStack::new();
        let x = interner.intern("x");
        let first = alloc(&mut arena, BlockNr::GLOBAL);
        let second = alloc(&mut arena, BlockNr::GLOBAL);
        assert_eq!(scopes.declare(x, first, DeclTarget::Global), None);
        assert_eq!(scopes.declare(x, second, DeclTarget::Global), Some(first));
        assert_eq!(scopes.find(x), Some(second));
    }

    #[test]
    fn test_global_declaration_from_nested_scope() {
        let interner = Interner::new();
        let mut arena = Arena::new();
        let mut scopes = ScopeStack::new();
        let f = interner.intern("f");
        scopes.enter_block();
        let id = alloc(&mut arena, BlockNr::GLOBAL);
        scopes.declare(f, id, DeclTarget::Global);
        scopes.exit_block();
        assert_eq!(scopes.lookup_global(f, Location::default(), &interner), Ok(id));
    }

    #[test]
    fn test_unresolved_name_reports_use_site() {
        let interner = Interner::new();
        let mut arena = Arena::new();
        let mut scopes = ScopeStack::new();
        scopes.declare(interner.intern("total"), alloc(&mut arena, BlockNr::GLOBAL), DeclTarget::Global);
        let site = Location::new(oc_span::FileId(0), 4, 8);
        let err = scopes
            .lookup(interner.intern("totl"), site, &interner)
            .unwrap_err();
        assert_eq!(err.location(), site);
        assert!(matches!(
            err,
            SemanticError::UnresolvedIdentifier { ref name, ref suggestions, .. }
                if name == "totl" && suggestions == &vec!["total".to_string()]
        ));
    }

    #[test]
    fn test_local_is_invisible_to_global_lookup() {
        let interner = Interner::new();
        let mut arena = Arena::new();
        let mut scopes = ScopeStack::new();
        let y = interner.intern("y");
        let block = scopes.enter_block();
        scopes.declare(y, alloc(&mut arena, block), DeclTarget::Innermost);
        assert!(scopes.lookup_global(y, Location::default(), &interner).is_err());
        assert!(scopes.lookup(y, Location::default(), &interner).is_ok());
    }

    #[test]
    #[should_panic(expected = "only the global scope open")]
    fn test_exit_without_enter_panics() {
        ScopeStack::new().exit_block();
    }

    proptest! {
        /// `true` opens a block, `false` closes the innermost one if any.
        #[test]
        fn prop_exit_restores_enclosing_block(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut scopes = ScopeStack::new();
            let mut expected = vec![BlockNr::GLOBAL];
            let mut seen = std::collections::HashSet::new();
            for open in ops {
                if open {
                    let block = scopes.enter_block();
                    prop_assert!(seen.insert(block), "block number reused");
                    expected.push(block);
                } else if scopes.depth() > 0 {
                    scopes.exit_block();
                    expected.pop();
                }
                prop_assert_eq!(Some(&scopes.current_block()), expected.last());
                prop_assert_eq!(scopes.depth() + 1, expected.len());
            }
        }
    }
}
