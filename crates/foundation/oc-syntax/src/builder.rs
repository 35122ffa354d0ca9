//! Programmatic tree construction following the parser's tree shapes
//!
//! Positions are `(line, column)` pairs inside the builder's file.

use crate::{Node, NodeKind};
use oc_intern::Interner;
use oc_span::{FileId, Location};

/// Source position inside the builder's file
pub type Pos = (u32, u32);

/// Builds well-formed trees for one file
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    interner: &'a Interner,
    file: FileId,
}

/// Node kind for a type keyword; anything that is not a keyword names a struct
pub fn type_kind(keyword: &str) -> NodeKind {
    match keyword {
        "void" => NodeKind::Void,
        "int" => NodeKind::Int,
        "char" => NodeKind::Char,
        "bool" => NodeKind::Bool,
        "string" => NodeKind::String,
        _ => NodeKind::TypeId,
    }
}

impl<'a> TreeBuilder<'a> {
    /// Builder for `file`, interning through `interner`
    pub fn new(interner: &'a Interner, file: FileId) -> Self {
        Self { interner, file }
    }

    /// Location of `pos` in this builder's file
    pub fn loc(&self, (line, column): Pos) -> Location {
        Location::new(self.file, line, column)
    }

    /// Any node
    pub fn node(&self, kind: NodeKind, at: Pos, text: &str, children: Vec<Node>) -> Node {
        Node::new(kind, self.loc(at), self.interner.intern(text), children)
    }

    /// A node without children
    pub fn leaf(&self, kind: NodeKind, at: Pos, text: &str) -> Node {
        self.node(kind, at, text, Vec::new())
    }

    /// Translation unit named `file_name`
    pub fn root(&self, file_name: &str, items: Vec<Node>) -> Node {
        self.node(NodeKind::Root, (0, 0), file_name, items)
    }

    /// Identifier reference
    pub fn ident(&self, at: Pos, name: &str) -> Node {
        self.leaf(NodeKind::Ident, at, name)
    }

    /// Integer literal
    pub fn int(&self, at: Pos, value: i64) -> Node {
        self.leaf(NodeKind::IntCon, at, &value.to_string())
    }

    /// Character literal, `lexeme` including its quotes
    pub fn char_lit(&self, at: Pos, lexeme: &str) -> Node {
        self.leaf(NodeKind::CharCon, at, lexeme)
    }

    /// String literal; the quotes are added here
    pub fn string(&self, at: Pos, contents: &str) -> Node {
        self.leaf(NodeKind::StringCon, at, &format!("\"{contents}\""))
    }

    /// `null`
    pub fn null(&self, at: Pos) -> Node {
        self.leaf(NodeKind::Null, at, "null")
    }

    /// Bare type node, as used by `new T[n]`
    pub fn ty(&self, keyword: &str, at: Pos) -> Node {
        self.leaf(type_kind(keyword), at, keyword)
    }

    /// `keyword name` declarator
    pub fn decl(&self, keyword: &str, at: Pos, name_at: Pos, name: &str) -> Node {
        let name = self.leaf(NodeKind::DeclId, name_at, name);
        self.node(type_kind(keyword), at, keyword, vec![name])
    }

    /// `keyword[] name` declarator
    pub fn array_decl(&self, keyword: &str, at: Pos, name_at: Pos, name: &str) -> Node {
        let marker = self.leaf(NodeKind::Array, at, "[]");
        let name = self.leaf(NodeKind::DeclId, name_at, name);
        self.node(type_kind(keyword), at, keyword, vec![marker, name])
    }

    /// Struct field declarator
    pub fn field(&self, keyword: &str, at: Pos, name_at: Pos, name: &str) -> Node {
        let name = self.leaf(NodeKind::Field, name_at, name);
        self.node(type_kind(keyword), at, keyword, vec![name])
    }

    /// Array-typed struct field declarator
    pub fn array_field(&self, keyword: &str, at: Pos, name_at: Pos, name: &str) -> Node {
        let marker = self.leaf(NodeKind::Array, at, "[]");
        let name = self.leaf(NodeKind::Field, name_at, name);
        self.node(type_kind(keyword), at, keyword, vec![marker, name])
    }

    /// `struct name { fields }`
    pub fn struct_decl(&self, at: Pos, name_at: Pos, name: &str, fields: Vec<Node>) -> Node {
        let mut children = vec![self.leaf(NodeKind::TypeId, name_at, name)];
        children.extend(fields);
        self.node(NodeKind::Struct, at, "struct", children)
    }

    /// Variable declaration, optionally initialized
    pub fn vardecl(&self, at: Pos, decl: Node, init: Option<Node>) -> Node {
        let mut children = vec![decl];
        children.extend(init);
        self.node(NodeKind::VarDecl, at, "=", children)
    }

    /// Function definition
    pub fn function(&self, at: Pos, decl: Node, params: Vec<Node>, body: Node) -> Node {
        let params = self.node(NodeKind::ParamList, at, "(", params);
        self.node(NodeKind::Function, at, "function", vec![decl, params, body])
    }

    /// Function prototype
    pub fn prototype(&self, at: Pos, decl: Node, params: Vec<Node>) -> Node {
        let params = self.node(NodeKind::ParamList, at, "(", params);
        self.node(NodeKind::Prototype, at, "prototype", vec![decl, params])
    }

    /// `{ statements }`
    pub fn block(&self, at: Pos, statements: Vec<Node>) -> Node {
        self.node(NodeKind::Block, at, "{", statements)
    }

    /// `while (cond) body`
    pub fn while_loop(&self, at: Pos, cond: Node, body: Node) -> Node {
        self.node(NodeKind::While, at, "while", vec![cond, body])
    }

    /// `if (cond) then`
    pub fn if_then(&self, at: Pos, cond: Node, then: Node) -> Node {
        self.node(NodeKind::If, at, "if", vec![cond, then])
    }

    /// `if (cond) then else otherwise`
    pub fn if_else(&self, at: Pos, cond: Node, then: Node, otherwise: Node) -> Node {
        self.node(NodeKind::IfElse, at, "if", vec![cond, then, otherwise])
    }

    /// `return value;` or `return;`
    pub fn ret(&self, at: Pos, value: Option<Node>) -> Node {
        match value {
            Some(value) => self.node(NodeKind::Return, at, "return", vec![value]),
            None => self.leaf(NodeKind::ReturnVoid, at, "return"),
        }
    }

    /// `target = value`
    pub fn assign(&self, at: Pos, target: Node, value: Node) -> Node {
        self.node(NodeKind::Assign, at, "=", vec![target, value])
    }

    /// Binary operator; the text is the operator spelling
    pub fn binary(&self, kind: NodeKind, at: Pos, left: Node, right: Node) -> Node {
        let text = kind.operator().unwrap_or_default();
        self.node(kind, at, text, vec![left, right])
    }

    /// Unary operator or cast
    pub fn unary(&self, kind: NodeKind, at: Pos, operand: Node) -> Node {
        let text = kind.operator().unwrap_or_default();
        self.node(kind, at, text, vec![operand])
    }

    /// `callee(args)`
    pub fn call(&self, at: Pos, callee_at: Pos, callee: &str, args: Vec<Node>) -> Node {
        let mut children = vec![self.ident(callee_at, callee)];
        children.extend(args);
        self.node(NodeKind::Call, at, "(", children)
    }

    /// `object.field`
    pub fn select(&self, at: Pos, object: Node, field_at: Pos, field: &str) -> Node {
        let field = self.leaf(NodeKind::Field, field_at, field);
        self.node(NodeKind::Select, at, ".", vec![object, field])
    }

    /// `array[index]`
    pub fn index(&self, at: Pos, array: Node, index: Node) -> Node {
        self.node(NodeKind::Index, at, "[", vec![array, index])
    }

    /// `new name()`
    pub fn new_struct(&self, at: Pos, name_at: Pos, name: &str) -> Node {
        let ty = self.leaf(NodeKind::TypeId, name_at, name);
        self.node(NodeKind::New, at, "new", vec![ty])
    }

    /// `new keyword[size]`
    pub fn new_array(&self, at: Pos, keyword: &str, ty_at: Pos, size: Node) -> Node {
        let ty = self.ty(keyword, ty_at);
        self.node(NodeKind::NewArray, at, "new", vec![ty, size])
    }

    /// `new string[size]`
    pub fn new_string(&self, at: Pos, size: Node) -> Node {
        self.node(NodeKind::NewString, at, "new", vec![size])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_shape() {
        let interner = Interner::new();
        let b = TreeBuilder::new(&interner, FileId(0));
        let decl = b.array_decl("node", (1, 0), (1, 7), "list");
        assert_eq!(decl.kind, NodeKind::TypeId);
        assert_eq!(interner.resolve(&decl.text), "node");
        assert!(decl.has_array_marker());
        assert_eq!(decl.declared_name().map(|n| n.kind), Some(NodeKind::DeclId));
    }

    #[test]
    fn test_function_shape() {
        let interner = Interner::new();
        let b = TreeBuilder::new(&interner, FileId(0));
        let f = b.function(
            (1, 0),
            b.decl("int", (1, 0), (1, 4), "f"),
            vec![b.decl("int", (1, 6), (1, 10), "n")],
            b.block((1, 13), vec![b.ret((2, 4), Some(b.ident((2, 11), "n")))]),
        );
        let kinds: Vec<NodeKind> = f.children.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Int, NodeKind::ParamList, NodeKind::Block]);
        assert_eq!(f.children[1].children.len(), 1);
    }

    #[test]
    fn test_string_literal_keeps_quotes() {
        let interner = Interner::new();
        let b = TreeBuilder::new(&interner, FileId(0));
        let lit = b.string((3, 2), "hi");
        assert_eq!(interner.resolve(&lit.text), "\"hi\"");
        assert_eq!(lit.loc, Location::new(FileId(0), 3, 2));
    }

    #[test]
    fn test_return_without_value() {
        let interner = Interner::new();
        let b = TreeBuilder::new(&interner, FileId(0));
        assert_eq!(b.ret((1, 1), None).kind, NodeKind::ReturnVoid);
    }
}
