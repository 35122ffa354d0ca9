//! The attribute propagation walk

use crate::analysis::{Analysis, DumpEntry};
use crate::compat::{compatible, describe};
use la_arena::Arena;
use oc_intern::{Interner, Name};
use oc_resolve::{DeclTarget, Diagnostics, ScopeStack, SemanticError, SymbolTable};
use oc_span::Location;
use oc_syntax::{AttrSet, Node, NodeKind, Symbol, SymbolId};

/// Resolves names and annotates a tree with types, one run per tree
pub struct TypeChecker<'a> {
    pub(crate) interner: &'a Interner,
    pub(crate) symbols: Arena<Symbol>,
    pub(crate) scopes: ScopeStack,
    pub(crate) structs: SymbolTable,
    pub(crate) log: Vec<DumpEntry>,
    pub(crate) diagnostics: Diagnostics,
    /// Function whose body is being checked
    pub(crate) current_function: Option<SymbolId>,
}

impl<'a> TypeChecker<'a> {
    /// Fresh state: empty tables, block counter at zero
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            symbols: Arena::new(),
            scopes: ScopeStack::new(),
            structs: SymbolTable::default(),
            log: Vec::new(),
            diagnostics: Diagnostics::new(),
            current_function: None,
        }
    }

    /// Check `root` with a fresh checker
    pub fn run(root: &mut Node, interner: &'a Interner) -> Analysis {
        Self::new(interner).check(root)
    }

    /// Annotate `root` in place and hand back what was learned
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check(mut self, root: &mut Node) -> Analysis {
        self.check_node(root);
        tracing::debug!(
            symbols = self.symbols.len(),
            diagnostics = self.diagnostics.len(),
            "semantic pass finished"
        );
        Analysis {
            globals: self.scopes.globals().clone(),
            symbols: self.symbols,
            structs: self.structs,
            log: self.log,
            diagnostics: self.diagnostics,
        }
    }

    pub(crate) fn check_node(&mut self, node: &mut Node) {
        match node.kind {
            NodeKind::Root => self.check_children(node),
            NodeKind::Struct => self.check_struct(node),
            NodeKind::Function | NodeKind::Prototype => self.check_function(node),
            NodeKind::VarDecl => self.check_vardecl(node),
            NodeKind::Block => self.check_block(node),
            NodeKind::While | NodeKind::If | NodeKind::IfElse => self.check_control(node),
            NodeKind::Return | NodeKind::ReturnVoid => self.check_return(node),
            NodeKind::Assign
            | NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::Rem
            | NodeKind::Eq
            | NodeKind::Ne
            | NodeKind::Lt
            | NodeKind::Le
            | NodeKind::Gt
            | NodeKind::Ge
            | NodeKind::Pos
            | NodeKind::Neg
            | NodeKind::Not
            | NodeKind::Ord
            | NodeKind::Chr
            | NodeKind::Call
            | NodeKind::New
            | NodeKind::NewArray
            | NodeKind::NewString
            | NodeKind::Index
            | NodeKind::Select
            | NodeKind::Ident
            | NodeKind::IntCon
            | NodeKind::CharCon
            | NodeKind::StringCon
            | NodeKind::Null => self.check_expr(node),
            // Only meaningful inside the construct that owns them
            NodeKind::Field
            | NodeKind::TypeId
            | NodeKind::Void
            | NodeKind::Int
            | NodeKind::Char
            | NodeKind::Bool
            | NodeKind::String
            | NodeKind::Array
            | NodeKind::DeclId
            | NodeKind::ParamList => {}
        }
    }

    pub(crate) fn check_children(&mut self, node: &mut Node) {
        for child in &mut node.children {
            self.check_node(child);
        }
    }

    pub(crate) fn check_block(&mut self, node: &mut Node) {
        let block = self.scopes.enter_block();
        node.stamp_block(block);
        self.check_children(node);
        self.scopes.exit_block();
    }

    pub(crate) fn check_control(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        let Some((cond, bodies)) = node.children.split_first_mut() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(cond);
        self.require_int("condition", cond);
        for body in bodies {
            self.check_node(body);
        }
    }

    pub(crate) fn check_return(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        let expected = self.current_function.map(|id| {
            let function = &self.symbols[id];
            (function.attrs.type_flags(), function.struct_name)
        });
        if kind == NodeKind::ReturnVoid {
            if expected.is_some_and(|(ty, _)| !ty.contains(AttrSet::VOID)) {
                self.diagnostics.push(SemanticError::InvalidReturn {
                    reason: "missing return value in a non-void function",
                    at,
                });
            }
            return;
        }
        let Some(value) = node.children.first_mut() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(value);
        match expected {
            None => self.diagnostics.push(SemanticError::InvalidReturn {
                reason: "return with a value outside of a function",
                at,
            }),
            Some((ty, _)) if ty.contains(AttrSet::VOID) => {
                self.diagnostics.push(SemanticError::InvalidReturn {
                    reason: "return with a value in a void function",
                    at,
                });
            }
            Some(expected) => self.check_compat("return", expected, value),
        }
        node.attrs |= value.attrs.type_flags();
        node.struct_name = value.struct_name;
    }

    /// Type described by a declarator's type node, `[]` marker included
    ///
    /// `enclosing` names a struct still being declared, so its fields may refer to it.
    pub(crate) fn declared_type(&mut self, ty: &Node, enclosing: Option<Name>) -> (AttrSet, Option<Name>) {
        let (base, struct_name) = match ty.kind {
            NodeKind::Void => (AttrSet::VOID, None),
            NodeKind::Int | NodeKind::Char | NodeKind::Bool => (AttrSet::INT, None),
            NodeKind::String => (AttrSet::STRING, None),
            NodeKind::TypeId => {
                if enclosing != Some(ty.text) && !self.structs.contains_key(&ty.text) {
                    self.diagnostics.push(SemanticError::UnknownStruct {
                        name: self.interner.resolve(&ty.text).to_string(),
                        at: ty.loc,
                    });
                }
                (AttrSet::STRUCT, Some(ty.text))
            }
            _ => {
                self.malformed(ty.kind, ty.loc);
                (AttrSet::empty(), None)
            }
        };
        if ty.has_array_marker() {
            (base | AttrSet::ARRAY, struct_name)
        } else {
            (base, struct_name)
        }
    }

    /// Bind `name`, warning when it replaces an entry of the same table
    pub(crate) fn declare(&mut self, name: Name, id: SymbolId, target: DeclTarget) {
        let Some(previous) = self.scopes.declare(name, id, target) else {
            return;
        };
        let (earlier, current) = (&self.symbols[previous], &self.symbols[id]);
        // A definition following its prototype is expected
        if earlier.prototype && current.is_function() && !current.prototype {
            return;
        }
        let variables = earlier.attrs.contains(AttrSet::VARIABLE) && current.attrs.contains(AttrSet::VARIABLE);
        self.diagnostics.push(SemanticError::Redeclared {
            name: self.interner.resolve(&name).to_string(),
            previous: earlier.loc,
            at: current.loc,
        });
        if variables {
            self.symbols[id].replaces = Some(previous);
        }
    }

    /// Copy a declaration's type onto a node that refers to it
    pub(crate) fn bind_reference(&self, node: &mut Node, id: SymbolId) {
        let symbol = &self.symbols[id];
        node.attrs |= symbol.attrs.type_flags();
        node.struct_name = symbol.struct_name;
        node.decl_loc = Some(symbol.loc);
        node.symbol = Some(id);
    }

    pub(crate) fn log_symbol(&mut self, name: Name, id: SymbolId) {
        tracing::trace!(name = self.interner.resolve(&name), block = %self.symbols[id].block, "declare");
        self.log.push(DumpEntry::Symbol {
            name,
            id,
            depth: self.scopes.depth(),
        });
    }

    /// Report `found` unless it fits `expected`; untyped operands were already reported
    pub(crate) fn check_compat(&mut self, context: &'static str, expected: (AttrSet, Option<Name>), found: &Node) {
        let (ty, struct_name) = expected;
        if !ty.is_typed() || !found.attrs.is_typed() {
            return;
        }
        if !compatible(ty, struct_name, found.attrs, found.struct_name) {
            self.diagnostics.push(SemanticError::TypeMismatch {
                context,
                expected: describe(ty, struct_name, self.interner),
                found: describe(found.attrs, found.struct_name, self.interner),
                at: found.loc,
            });
        }
    }

    /// Report `node` unless it is a scalar int
    pub(crate) fn require_int(&mut self, context: &'static str, node: &Node) {
        let attrs = node.attrs;
        if !attrs.is_typed() || (attrs.contains(AttrSet::INT) && !attrs.contains(AttrSet::ARRAY)) {
            return;
        }
        self.diagnostics.push(SemanticError::TypeMismatch {
            context,
            expected: "int".to_string(),
            found: describe(attrs, node.struct_name, self.interner),
            at: node.loc,
        });
    }

    pub(crate) fn malformed(&mut self, kind: NodeKind, at: Location) {
        self.diagnostics.push(SemanticError::MalformedTree {
            kind: kind.tag(),
            at,
        });
    }
}
