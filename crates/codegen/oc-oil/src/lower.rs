//! Statements and expressions, linearized into three-address lines

use crate::OilWriter;
use crate::mangle::{MangleKind, label, mangle};
use crate::temps::TempKind;
use crate::types::{declarator_type, keyword_type, struct_tag, value_type};
use crate::writer::{Placement, string_binding};
use oc_syntax::{AttrSet, BlockNr, Node, NodeKind};

impl OilWriter<'_> {
    pub(crate) fn lower_stmt(&mut self, node: &Node, placement: Placement) {
        match node.kind {
            NodeKind::Block => {
                for child in &node.children {
                    self.lower_stmt(child, Placement::Local);
                }
            }
            NodeKind::VarDecl => self.lower_vardecl(node, placement),
            NodeKind::Assign => {
                self.lower_assign(node);
            }
            NodeKind::While => self.lower_while(node),
            NodeKind::If | NodeKind::IfElse => self.lower_if(node),
            NodeKind::Return => {
                let value = node
                    .children
                    .first()
                    .map(|value| self.lower_value(value))
                    .unwrap_or_default();
                self.line(&format!("return {value};"));
            }
            NodeKind::ReturnVoid => self.line("return;"),
            NodeKind::Call => {
                let call = self.call_text(node);
                self.line(&format!("{call};"));
            }
            // Evaluated for the temporaries they need; the value is dropped
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
            | NodeKind::Ge
            | NodeKind::Pos
            | NodeKind::Neg
            | NodeKind::Not
            | NodeKind::Ord
            | NodeKind::Chr
            | NodeKind::New
            | NodeKind::NewArray
            | NodeKind::NewString
            | NodeKind::Index
            | NodeKind::Select
            | NodeKind::Ident
            | NodeKind::IntCon
            | NodeKind::CharCon
            | NodeKind::StringCon
            | NodeKind::Null => {
                self.lower_expr(node);
            }
            NodeKind::Root
            | NodeKind::Struct
            | NodeKind::Function
            | NodeKind::Prototype
            | NodeKind::ParamList
            | NodeKind::Field
            | NodeKind::TypeId
            | NodeKind::Void
            | NodeKind::Int
            | NodeKind::Char
            | NodeKind::Bool
            | NodeKind::String
            | NodeKind::Array
            | NodeKind::DeclId => {}
        }
    }

    fn lower_vardecl(&mut self, node: &Node, placement: Placement) {
        let Some((decl, init)) = node.children.split_first() else {
            return;
        };
        let Some(name) = decl.declared_name() else {
            return;
        };
        let target = self.variable_name(name);
        let ty = declarator_type(decl, self.interner);
        // The name already exists in this block, so only the store remains
        let declared = placement == Placement::TopLevel || self.replaces_variable(name);
        match (init.first(), declared) {
            // Bound at file scope
            (Some(value), false) if value.kind == NodeKind::StringCon => {}
            (Some(value), true) if value.kind == NodeKind::StringCon => {
                if self.replaces_variable(name) {
                    self.line(&format!("{target} = {};", string_binding(node)));
                }
            }
            (None, true) => {}
            (None, false) => self.line(&format!("{ty} {target};")),
            (Some(value), true) => {
                let value = self.lower_value(value);
                self.line(&format!("{target} = {value};"));
            }
            (Some(value), false) => {
                let value = self.lower_value(value);
                self.line(&format!("{ty} {target} = {value};"));
            }
        }
    }

    /// Emit the assignment and return the destination operand
    fn lower_assign(&mut self, node: &Node) -> String {
        let [target, value] = node.children.as_slice() else {
            return String::new();
        };
        let dest = self.lower_expr(target);
        let source = if value.kind == NodeKind::StringCon {
            string_binding(node)
        } else {
            self.lower_value(value)
        };
        self.line(&format!("{dest} = {source};"));
        dest
    }

    fn lower_while(&mut self, node: &Node) {
        let [cond, body] = node.children.as_slice() else {
            return;
        };
        let exit = label("break", node.loc);
        self.anchor("while", node);
        let flag = self.lower_condition(cond);
        self.line(&format!("if (!{flag}) goto {exit};"));
        self.lower_stmt(body, Placement::Local);
        self.line(&format!("goto {};", label("while", node.loc)));
        self.anchor("break", node);
    }

    fn lower_if(&mut self, node: &Node) {
        let Some((cond, branches)) = node.children.split_first() else {
            return;
        };
        let flag = self.lower_condition(cond);
        match branches {
            [then] => {
                self.line(&format!("if (!{flag}) goto {};", label("fi", node.loc)));
                self.lower_stmt(then, Placement::Local);
            }
            [then, otherwise] => {
                self.line(&format!("if (!{flag}) goto {};", label("else", node.loc)));
                self.lower_stmt(then, Placement::Local);
                self.line(&format!("goto {};", label("fi", node.loc)));
                self.anchor("else", node);
                self.lower_stmt(otherwise, Placement::Local);
            }
            _ => return,
        }
        self.anchor("fi", node);
    }

    /// Condition value as a `b` temporary
    fn lower_condition(&mut self, cond: &Node) -> String {
        if cond.kind.is_comparison() || cond.kind == NodeKind::Not {
            return self.lower_expr(cond);
        }
        let value = self.lower_expr(cond);
        let flag = self.temps.fresh(TempKind::Bool);
        self.line(&format!("char {flag} = {value};"));
        flag
    }

    /// Right-hand side operand: simple values inline, everything else via a temporary
    pub(crate) fn lower_value(&mut self, value: &Node) -> String {
        let operand = self.lower_expr(value);
        if is_simple(value.kind) || computes_temp(value.kind) {
            return operand;
        }
        let (kind, ty) = self.temp_type(value);
        let temp = self.temps.fresh(kind);
        self.line(&format!("{ty} {temp} = {operand};"));
        temp
    }

    /// Operand text for an expression, emitting whatever lines it needs first
    pub(crate) fn lower_expr(&mut self, node: &Node) -> String {
        match (node.kind, node.children.as_slice()) {
            (NodeKind::IntCon, _) => mangle(MangleKind::IntLiteral, node.block, self.text(node), node.loc),
            (NodeKind::CharCon | NodeKind::StringCon, _) => self.text(node).to_string(),
            (NodeKind::Null, _) => "0".to_string(),
            (NodeKind::Ident, _) => self.variable_name(node),
            (NodeKind::Ord, [operand]) => format!("(int) {}", self.lower_expr(operand)),
            (NodeKind::Chr, [operand]) => format!("(char) {}", self.lower_expr(operand)),
            (NodeKind::Call, _) => self.call_text(node),
            (NodeKind::Select, [object, field]) => {
                let base = self.lower_expr(object);
                let interner = self.interner;
                let owner = object.struct_name.map_or("", |name| interner.resolve(&name));
                let field = mangle(
                    MangleKind::Field { owner },
                    BlockNr::GLOBAL,
                    self.text(field),
                    field.loc,
                );
                format!("{base}->{field}")
            }
            (NodeKind::Index, [array, index]) => {
                let base = self.lower_expr(array);
                let index = self.lower_expr(index);
                format!("{base}[{index}]")
            }
            (NodeKind::Assign, _) => self.lower_assign(node),
            (kind, [left, right]) if kind.is_binary() => {
                let left = self.lower_expr(left);
                let right = self.lower_expr(right);
                let op = kind.operator().unwrap_or_default();
                let (temp_kind, ty) = if kind.is_comparison() {
                    (TempKind::Bool, "char")
                } else {
                    (TempKind::Int, "int")
                };
                let temp = self.temps.fresh(temp_kind);
                self.line(&format!("{ty} {temp} = {left} {op} {right};"));
                temp
            }
            (NodeKind::Not, [operand]) => {
                let operand = self.lower_expr(operand);
                let temp = self.temps.fresh(TempKind::Bool);
                self.line(&format!("char {temp} = !{operand};"));
                temp
            }
            (NodeKind::Neg | NodeKind::Pos, [operand]) => {
                let operand = self.lower_expr(operand);
                let op = node.kind.operator().unwrap_or_default();
                let temp = self.temps.fresh(TempKind::Int);
                self.line(&format!("int {temp} = {op}{operand};"));
                temp
            }
            (NodeKind::New, [ty]) => {
                let tag = struct_tag(self.text(ty));
                let temp = self.temps.fresh(TempKind::Pointer);
                self.line(&format!("struct {tag}* {temp} = xcalloc (1, sizeof (struct {tag}));"));
                temp
            }
            (NodeKind::NewArray, [ty, size]) => {
                let element = keyword_type(ty, self.interner);
                let size = self.lower_expr(size);
                let temp = self.temps.fresh(TempKind::Pointer);
                self.line(&format!("{element}* {temp} = xcalloc ({size}, sizeof ({element}));"));
                temp
            }
            (NodeKind::NewString, [size]) => {
                let size = self.lower_expr(size);
                let temp = self.temps.fresh(TempKind::Pointer);
                self.line(&format!("char* {temp} = xcalloc ({size}, sizeof (char));"));
                temp
            }
            _ => String::new(),
        }
    }

    /// `__name (args)`
    fn call_text(&mut self, node: &Node) -> String {
        let Some((callee, args)) = node.children.split_first() else {
            return String::new();
        };
        let args: Vec<String> = args.iter().map(|arg| self.lower_expr(arg)).collect();
        let function = mangle(MangleKind::Function, callee.block, self.text(callee), callee.loc);
        format!("{function} ({})", args.join(", "))
    }

    fn temp_type(&self, value: &Node) -> (TempKind, String) {
        let string_element = value.kind == NodeKind::Index
            && value.children.first().is_some_and(|array| {
                array.attrs.contains(AttrSet::STRING) && !array.attrs.contains(AttrSet::ARRAY)
            });
        if string_element {
            return (TempKind::Char, "char".to_string());
        }
        let struct_name = value.struct_name.map(|name| self.interner.resolve(&name));
        (TempKind::for_attrs(value.attrs), value_type(value.attrs, struct_name))
    }
}

/// Operands copied straight into their destination
fn is_simple(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::IntCon
            | NodeKind::CharCon
            | NodeKind::StringCon
            | NodeKind::Null
            | NodeKind::Ident
            | NodeKind::Ord
            | NodeKind::Chr
            | NodeKind::Call
    )
}

/// Expressions whose operand already is a fresh temporary
fn computes_temp(kind: NodeKind) -> bool {
    (kind.is_binary() || kind.is_unary() || matches!(kind, NodeKind::New | NodeKind::NewArray | NodeKind::NewString))
        && !matches!(kind, NodeKind::Ord | NodeKind::Chr)
}
