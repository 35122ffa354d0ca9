//! Loading parser output from JSON
//!
//! Each node is an object `{"kind": "...", "loc": [file, line, column], "text": "...",
//! "children": [...]}`. `text` and `children` may be omitted.

use crate::{Node, NodeKind};
use oc_intern::Interner;
use oc_span::{FileId, Location};
use serde::Deserialize;
use thiserror::Error;

/// Why a tree could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input is not valid JSON for a tree
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A node does not follow the shape its kind requires
    #[error("{at}: malformed {kind} node: {reason}")]
    Shape {
        /// Offending construct
        kind: NodeKind,
        /// Where it sits
        at: Location,
        /// What is wrong with it
        reason: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct RawNode {
    kind: NodeKind,
    #[serde(default)]
    loc: (u32, u32, u32),
    #[serde(default)]
    text: String,
    #[serde(default)]
    children: Vec<RawNode>,
}

impl RawNode {
    fn into_node(self, interner: &Interner) -> Node {
        let (file, line, column) = self.loc;
        let children = self
            .children
            .into_iter()
            .map(|child| child.into_node(interner))
            .collect();
        Node::new(
            self.kind,
            Location::new(FileId(file), line, column),
            interner.intern(&self.text),
            children,
        )
    }
}

/// Parse a tree from JSON and check that every node has the expected shape
pub fn load_json(source: &str, interner: &Interner) -> Result<Node, LoadError> {
    let raw: RawNode = serde_json::from_str(source)?;
    let root = raw.into_node(interner);
    check_shape(&root)?;
    Ok(root)
}

/// Validate the children of `node` and everything below it
pub fn check_shape(node: &Node) -> Result<(), LoadError> {
    if let Err(reason) = shape_of(node) {
        return Err(LoadError::Shape {
            kind: node.kind,
            at: node.loc,
            reason,
        });
    }
    node.children.iter().try_for_each(check_shape)
}

fn kinds(node: &Node) -> Vec<NodeKind> {
    node.children.iter().map(|child| child.kind).collect()
}

fn is_declarator(node: &Node, name_kind: NodeKind) -> bool {
    node.kind.is_type() && node.declared_name().is_some_and(|name| name.kind == name_kind)
}

fn shape_of(node: &Node) -> Result<(), &'static str> {
    let children = &node.children;
    let arity = |expected: usize| {
        if children.len() == expected {
            Ok(())
        } else {
            Err("wrong number of children")
        }
    };
    match node.kind {
        NodeKind::Root | NodeKind::Block => Ok(()),
        NodeKind::Struct => match children.split_first() {
            Some((name, fields)) if name.kind == NodeKind::TypeId => {
                if fields.iter().all(|f| is_declarator(f, NodeKind::Field)) {
                    Ok(())
                } else {
                    Err("fields must be type nodes naming a field")
                }
            }
            // Reported by the semantic pass as a malformed struct
            _ => Ok(()),
        },
        NodeKind::Void
        | NodeKind::Int
        | NodeKind::Char
        | NodeKind::Bool
        | NodeKind::String
        | NodeKind::TypeId => {
            let ok = kinds(node).iter().enumerate().all(|(i, kind)| match kind {
                NodeKind::Array => i == 0,
                NodeKind::DeclId | NodeKind::Field => i + 1 == children.len(),
                _ => false,
            });
            if ok && children.len() <= 2 {
                Ok(())
            } else {
                Err("expected an optional [] marker followed by a name")
            }
        }
        NodeKind::Function | NodeKind::Prototype => {
            let expected = if node.kind == NodeKind::Function { 3 } else { 2 };
            arity(expected)?;
            if !is_declarator(&children[0], NodeKind::DeclId) {
                return Err("first child must declare the function name");
            }
            if children[1].kind != NodeKind::ParamList {
                return Err("second child must be the parameter list");
            }
            if expected == 3 && children[2].kind != NodeKind::Block {
                return Err("body must be a block");
            }
            Ok(())
        }
        NodeKind::ParamList => {
            if children.iter().all(|p| is_declarator(p, NodeKind::DeclId)) {
                Ok(())
            } else {
                Err("parameters must be type nodes naming a parameter")
            }
        }
        NodeKind::VarDecl => match children.first() {
            Some(decl) if is_declarator(decl, NodeKind::DeclId) && children.len() <= 2 => Ok(()),
            _ => Err("expected a declarator and an optional initializer"),
        },
        NodeKind::While | NodeKind::If => arity(2),
        NodeKind::IfElse => arity(3),
        NodeKind::Return => arity(1),
        NodeKind::ReturnVoid => arity(0),
        NodeKind::Assign | NodeKind::Index => arity(2),
        kind if kind.is_binary() => arity(2),
        kind if kind.is_unary() => arity(1),
        NodeKind::Call => match children.first() {
            Some(callee) if callee.kind == NodeKind::Ident => Ok(()),
            _ => Err("first child must name the callee"),
        },
        NodeKind::New => match kinds(node).as_slice() {
            [NodeKind::TypeId] => Ok(()),
            _ => Err("expected the struct type"),
        },
        NodeKind::NewArray => {
            arity(2)?;
            if children[0].kind.is_type() {
                Ok(())
            } else {
                Err("expected the element type")
            }
        }
        NodeKind::NewString => arity(1),
        NodeKind::Select => {
            arity(2)?;
            if children[1].kind == NodeKind::Field {
                Ok(())
            } else {
                Err("selector must be a field name")
            }
        }
        NodeKind::Field
        | NodeKind::Array
        | NodeKind::DeclId
        | NodeKind::Ident
        | NodeKind::IntCon
        | NodeKind::CharCon
        | NodeKind::StringCon
        | NodeKind::Null => arity(0),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_tree() {
        let interner = Interner::new();
        let json = r#"{
            "kind": "root", "text": "t.oc",
            "children": [
                {"kind": "vardecl", "loc": [0, 1, 4], "text": "=", "children": [
                    {"kind": "int", "loc": [0, 1, 0], "text": "int", "children": [
                        {"kind": "declid", "loc": [0, 1, 4], "text": "x"}
                    ]},
                    {"kind": "intcon", "loc": [0, 1, 8], "text": "3"}
                ]}
            ]
        }"#;
        let root = load_json(json, &interner).unwrap();
        assert_eq!(root.kind, NodeKind::Root);
        let decl = &root.children[0];
        assert_eq!(decl.kind, NodeKind::VarDecl);
        assert_eq!(decl.loc, Location::new(FileId(0), 1, 4));
        assert_eq!(interner.resolve(&decl.children[1].text), "3");
    }

    #[test]
    fn test_rejects_bad_shape() {
        let interner = Interner::new();
        let json = r#"{"kind": "while", "loc": [0, 2, 0], "children": [
            {"kind": "ident", "loc": [0, 2, 7], "text": "x"}
        ]}"#;
        let err = load_json(json, &interner).unwrap_err();
        assert!(matches!(err, LoadError::Shape { kind: NodeKind::While, .. }));
        assert_eq!(err.to_string(), "0.2.0: malformed WHILE node: wrong number of children");
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let interner = Interner::new();
        let err = load_json(r#"{"kind": "lambda"}"#, &interner).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_nameless_struct_is_left_to_the_checker() {
        let interner = Interner::new();
        let json = r#"{"kind": "struct", "loc": [0, 1, 0], "text": "struct"}"#;
        assert!(load_json(json, &interner).is_ok());
    }
}
