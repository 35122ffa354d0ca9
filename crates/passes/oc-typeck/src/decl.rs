//! Struct, function and variable declarations

use crate::TypeChecker;
use crate::analysis::DumpEntry;
use oc_resolve::{DeclTarget, FieldTable, SemanticError};
use oc_syntax::{AttrSet, BlockNr, Node, NodeKind, Symbol};

impl TypeChecker<'_> {
    pub(crate) fn check_struct(&mut self, node: &mut Node) {
        let at = node.loc;
        let Some((name_node, fields)) = node
            .children
            .split_first_mut()
            .filter(|(first, _)| first.kind == NodeKind::TypeId)
        else {
            self.diagnostics.push(SemanticError::MalformedStruct { at });
            return;
        };
        let struct_name = name_node.text;

        let mut table = FieldTable::default();
        for field_decl in fields.iter_mut() {
            let (ty, field_struct) = self.declared_type(field_decl, Some(struct_name));
            let attrs = ty | AttrSet::FIELD;
            let (kind, decl_at) = (field_decl.kind, field_decl.loc);
            let Some(field_name) = field_decl.declared_name_mut() else {
                self.malformed(kind, decl_at);
                continue;
            };
            let id = self
                .symbols
                .alloc(Symbol::new(attrs, field_name.loc, BlockNr::GLOBAL, field_struct));
            field_name.attrs |= attrs;
            field_name.struct_name = field_struct;
            field_name.symbol = Some(id);
            let name = field_name.text;
            field_decl.attrs |= ty;
            field_decl.struct_name = field_struct;

            if let Some(previous) = table.insert(name, id) {
                self.diagnostics.push(SemanticError::Redeclared {
                    name: self.interner.resolve(&name).to_string(),
                    previous: self.symbols[previous].loc,
                    at: self.symbols[id].loc,
                });
            }
        }

        let id = self
            .symbols
            .alloc(Symbol::structure(struct_name, name_node.loc, table));
        name_node.attrs |= AttrSet::STRUCT | AttrSet::TYPEID;
        name_node.struct_name = Some(struct_name);
        name_node.symbol = Some(id);
        node.attrs |= AttrSet::STRUCT;
        node.struct_name = Some(struct_name);

        if let Some(previous) = self.structs.insert(struct_name, id) {
            self.diagnostics.push(SemanticError::Redeclared {
                name: self.interner.resolve(&struct_name).to_string(),
                previous: self.symbols[previous].loc,
                at: self.symbols[id].loc,
            });
        }
        tracing::trace!(name = self.interner.resolve(&struct_name), "declare struct");
        self.log.push(DumpEntry::Struct {
            name: struct_name,
            id,
        });
        self.log.push(DumpEntry::Break);
    }

    pub(crate) fn check_function(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        let [decl, params, rest @ ..] = node.children.as_mut_slice() else {
            self.malformed(kind, at);
            return;
        };
        let (ty, struct_name) = self.declared_type(decl, None);
        let decl_at = decl.loc;
        let Some(name_node) = decl.declared_name_mut() else {
            self.malformed(kind, decl_at);
            return;
        };
        let name = name_node.text;
        let id = self.symbols.alloc(Symbol {
            prototype: kind == NodeKind::Prototype,
            ..Symbol::function(ty, name_node.loc, struct_name)
        });
        let attrs = self.symbols[id].attrs;
        name_node.attrs |= attrs;
        name_node.struct_name = struct_name;
        name_node.symbol = Some(id);
        decl.attrs |= ty;
        decl.struct_name = struct_name;
        node.attrs |= attrs;
        node.struct_name = struct_name;

        self.log_symbol(name, id);
        // Registered before the body so recursive calls resolve
        self.declare(name, id, DeclTarget::Global);

        let block = self.scopes.enter_block();
        params.stamp_block(block);
        for param in &mut params.children {
            let (ty, param_struct) = self.declared_type(param, None);
            let attrs = ty | AttrSet::PARAM | AttrSet::VARIABLE | AttrSet::LVAL;
            let (param_kind, param_at) = (param.kind, param.loc);
            let Some(param_name) = param.declared_name_mut() else {
                self.malformed(param_kind, param_at);
                continue;
            };
            let param_id = self
                .symbols
                .alloc(Symbol::new(attrs, param_name.loc, block, param_struct));
            param_name.attrs |= attrs;
            param_name.struct_name = param_struct;
            param_name.symbol = Some(param_id);
            let param_text = param_name.text;
            param.attrs |= ty;
            param.struct_name = param_struct;

            if let Some(list) = self.symbols[id].params.as_mut() {
                list.push(param_id);
            }
            self.declare(param_text, param_id, DeclTarget::Innermost);
            self.log_symbol(param_text, param_id);
        }
        self.log.push(DumpEntry::Break);

        if kind == NodeKind::Function {
            match rest.first_mut() {
                // The body shares the parameter scope
                Some(body) => {
                    body.stamp_block(block);
                    let enclosing = self.current_function.replace(id);
                    self.check_children(body);
                    self.current_function = enclosing;
                }
                None => self.malformed(kind, at),
            }
        }
        self.scopes.exit_block();
        if kind == NodeKind::Function {
            self.log.push(DumpEntry::Break);
        }
    }

    pub(crate) fn check_vardecl(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        let Some((decl, init)) = node.children.split_first_mut() else {
            self.malformed(kind, at);
            return;
        };
        let (ty, struct_name) = self.declared_type(decl, None);
        let attrs = ty | AttrSet::VARIABLE | AttrSet::LVAL;
        let block = self.scopes.current_block();
        let Some(name_node) = decl.declared_name_mut() else {
            self.malformed(kind, at);
            return;
        };
        let name = name_node.text;
        let id = self
            .symbols
            .alloc(Symbol::new(attrs, name_node.loc, block, struct_name));
        name_node.attrs |= attrs;
        name_node.struct_name = struct_name;
        name_node.symbol = Some(id);
        decl.attrs |= attrs;
        decl.struct_name = struct_name;
        node.attrs |= ty;
        node.struct_name = struct_name;

        if let Some(value) = init.first_mut() {
            self.check_expr(value);
            self.check_compat("initialization", (ty, struct_name), value);
            decl.attrs |= value.attrs;
        }
        // Declared after the initializer, which cannot see the new name
        self.declare(name, id, DeclTarget::Innermost);
        self.log_symbol(name, id);
    }
}
