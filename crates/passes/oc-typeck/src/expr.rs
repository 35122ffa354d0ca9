//! Expressions

use crate::TypeChecker;
use crate::compat::{compatible, describe};
use oc_resolve::SemanticError;
use oc_syntax::{AttrSet, Node, NodeKind};

impl TypeChecker<'_> {
    pub(crate) fn check_expr(&mut self, node: &mut Node) {
        match node.kind {
            NodeKind::Ident => self.check_ident(node),
            NodeKind::IntCon | NodeKind::CharCon => node.attrs |= AttrSet::INT | AttrSet::CONST,
            NodeKind::StringCon => node.attrs |= AttrSet::STRING | AttrSet::CONST,
            NodeKind::Null => node.attrs |= AttrSet::NULL | AttrSet::CONST,
            NodeKind::Call => self.check_call(node),
            NodeKind::Select => self.check_select(node),
            NodeKind::Index => self.check_index(node),
            NodeKind::New | NodeKind::NewArray | NodeKind::NewString => self.check_alloc(node),
            NodeKind::Assign => self.check_assign(node),
            NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::Rem
            | NodeKind::Eq
            | NodeKind::Ne
            | NodeKind::Lt
            | NodeKind::Le
            | NodeKind::Gt
            | NodeKind::Ge => self.check_binary(node),
            NodeKind::Pos | NodeKind::Neg | NodeKind::Not | NodeKind::Ord | NodeKind::Chr => {
                self.check_unary(node);
            }
            // Not values
            NodeKind::Root
            | NodeKind::Struct
            | NodeKind::Field
            | NodeKind::TypeId
            | NodeKind::Void
            | NodeKind::Int
            | NodeKind::Char
            | NodeKind::Bool
            | NodeKind::String
            | NodeKind::Array
            | NodeKind::DeclId
            | NodeKind::Function
            | NodeKind::Prototype
            | NodeKind::ParamList
            | NodeKind::VarDecl
            | NodeKind::Block
            | NodeKind::While
            | NodeKind::If
            | NodeKind::IfElse
            | NodeKind::Return
            | NodeKind::ReturnVoid => self.malformed(node.kind, node.loc),
        }
    }

    fn check_ident(&mut self, node: &mut Node) {
        match self.scopes.lookup(node.text, node.loc, self.interner) {
            Ok(id) => {
                self.bind_reference(node, id);
                let lval = self.symbols[id].attrs & AttrSet::LVAL;
                node.attrs |= AttrSet::VARIABLE | lval;
            }
            Err(err) => self.diagnostics.push(err),
        }
    }

    fn check_call(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        let Some((callee, args)) = node.children.split_first_mut() else {
            self.malformed(kind, at);
            return;
        };
        let resolved = self
            .scopes
            .lookup_global(callee.text, callee.loc, self.interner);
        for arg in args.iter_mut() {
            self.check_expr(arg);
        }
        let id = match resolved {
            Ok(id) => id,
            Err(err) => {
                self.diagnostics.push(err);
                return;
            }
        };
        let name = self.interner.resolve(&callee.text).to_string();
        let function = self.symbols[id].clone();
        if !function.is_function() {
            self.diagnostics.push(SemanticError::NotAFunction {
                name,
                at: callee.loc,
            });
            return;
        }
        callee.attrs |= function.attrs;
        callee.struct_name = function.struct_name;
        callee.decl_loc = Some(function.loc);
        callee.symbol = Some(id);
        node.attrs |= function.attrs.type_flags() | AttrSet::VREG;
        node.struct_name = function.struct_name;

        let params = function.param_ids();
        if params.len() != args.len() {
            self.diagnostics.push(SemanticError::ArityMismatch {
                name,
                expected: params.len(),
                found: args.len(),
                at,
            });
            return;
        }
        for (arg, &param) in args.iter().zip(params) {
            let expected = {
                let param = &self.symbols[param];
                (param.attrs.type_flags(), param.struct_name)
            };
            self.check_compat("argument", expected, arg);
        }
    }

    fn check_select(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        node.attrs |= AttrSet::LVAL | AttrSet::VADDR;
        let [object, field] = node.children.as_mut_slice() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(object);
        if !object.attrs.is_typed() {
            return;
        }
        let struct_name = match object.struct_name {
            Some(name) if object.attrs.is_plain_struct() => name,
            _ => {
                self.diagnostics.push(SemanticError::NotAStruct {
                    found: describe(object.attrs, object.struct_name, self.interner),
                    at,
                });
                return;
            }
        };
        let Some(&struct_id) = self.structs.get(&struct_name) else {
            self.diagnostics.push(SemanticError::UnknownStruct {
                name: self.interner.resolve(&struct_name).to_string(),
                at: object.loc,
            });
            return;
        };
        let field_id = self.symbols[struct_id]
            .fields
            .as_ref()
            .and_then(|fields| fields.get(&field.text))
            .copied();
        let Some(field_id) = field_id else {
            self.diagnostics.push(SemanticError::UnknownField {
                struct_name: self.interner.resolve(&struct_name).to_string(),
                field: self.interner.resolve(&field.text).to_string(),
                at: field.loc,
            });
            return;
        };
        let symbol = &self.symbols[field_id];
        field.attrs |= symbol.attrs;
        field.struct_name = symbol.struct_name;
        field.decl_loc = Some(symbol.loc);
        field.symbol = Some(field_id);
        node.attrs |= symbol.attrs.type_flags();
        node.struct_name = symbol.struct_name;
    }

    fn check_index(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        node.attrs |= AttrSet::LVAL | AttrSet::VADDR;
        let [array, index] = node.children.as_mut_slice() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(array);
        self.check_expr(index);
        self.require_int("array index", index);
        let attrs = array.attrs;
        if !attrs.is_typed() {
            return;
        }
        if attrs.contains(AttrSet::ARRAY) && !attrs.contains(AttrSet::NULL) {
            node.attrs |= attrs.type_flags().difference(AttrSet::ARRAY);
            node.struct_name = array.struct_name;
        } else if attrs.contains(AttrSet::STRING) {
            node.attrs |= AttrSet::INT;
        } else {
            self.diagnostics.push(SemanticError::TypeMismatch {
                context: "indexing",
                expected: "array or string".to_string(),
                found: describe(attrs, array.struct_name, self.interner),
                at: array.loc,
            });
        }
    }

    fn check_alloc(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        match (kind, node.children.as_mut_slice()) {
            (NodeKind::New, [ty]) => {
                let (attrs, struct_name) = self.declared_type(ty, None);
                ty.attrs |= attrs | AttrSet::TYPEID;
                ty.struct_name = struct_name;
                node.attrs |= attrs | AttrSet::VREG;
                node.struct_name = struct_name;
            }
            (NodeKind::NewArray, [ty, size]) => {
                let (attrs, struct_name) = self.declared_type(ty, None);
                ty.attrs |= attrs;
                ty.struct_name = struct_name;
                self.check_expr(size);
                self.require_int("array size", size);
                node.attrs |= attrs | AttrSet::ARRAY | AttrSet::VREG;
                node.struct_name = struct_name;
            }
            (NodeKind::NewString, [size]) => {
                self.check_expr(size);
                self.require_int("string size", size);
                node.attrs |= AttrSet::STRING | AttrSet::VREG;
            }
            _ => self.malformed(kind, at),
        }
    }

    fn check_assign(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        let [target, value] = node.children.as_mut_slice() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(target);
        self.check_expr(value);
        node.attrs |= target.attrs;
        node.struct_name = target.struct_name;
        if target.attrs.is_typed() && !target.attrs.contains(AttrSet::LVAL) {
            self.diagnostics.push(SemanticError::NotAssignable { at });
        }
        let expected = (target.attrs.type_flags(), target.struct_name);
        self.check_compat("assignment", expected, value);
    }

    fn check_binary(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        node.attrs |= AttrSet::INT | AttrSet::VREG;
        let [left, right] = node.children.as_mut_slice() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(left);
        self.check_expr(right);
        if matches!(kind, NodeKind::Eq | NodeKind::Ne) {
            let both_typed = left.attrs.is_typed() && right.attrs.is_typed();
            if both_typed && !compatible(left.attrs, left.struct_name, right.attrs, right.struct_name) {
                self.diagnostics.push(SemanticError::TypeMismatch {
                    context: "comparison",
                    expected: describe(left.attrs, left.struct_name, self.interner),
                    found: describe(right.attrs, right.struct_name, self.interner),
                    at: right.loc,
                });
            }
        } else {
            let context = if kind.is_arithmetic() {
                "arithmetic operand"
            } else {
                "comparison operand"
            };
            self.require_int(context, left);
            self.require_int(context, right);
        }
    }

    fn check_unary(&mut self, node: &mut Node) {
        let (kind, at) = (node.kind, node.loc);
        node.attrs |= AttrSet::INT | AttrSet::VREG;
        let Some(operand) = node.children.first_mut() else {
            self.malformed(kind, at);
            return;
        };
        self.check_expr(operand);
        self.require_int("unary operand", operand);
    }
}
