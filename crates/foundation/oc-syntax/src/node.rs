//! Tree nodes

use crate::{AttrSet, NodeKind, SymbolId};
use oc_intern::Name;
use oc_span::Location;
use std::fmt;

/// Scope number assigned by the semantic pass; 0 is file scope
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BlockNr(pub u32);

impl BlockNr {
    /// File scope
    pub const GLOBAL: Self = Self(0);

    /// Whether this is file scope
    pub fn is_global(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for BlockNr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A syntax tree node, annotated in place by the semantic pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Construct this node represents
    pub kind: NodeKind,
    /// Source location
    pub loc: Location,
    /// Lexeme or name
    pub text: Name,
    /// Ordered children
    pub children: Vec<Node>,
    /// Type and role attributes
    pub attrs: AttrSet,
    /// Scope number
    pub block: BlockNr,
    /// Struct name, when the node's type is a struct
    pub struct_name: Option<Name>,
    /// Declaration site of the name this node refers to
    pub decl_loc: Option<Location>,
    /// Symbol this node declares or refers to
    pub symbol: Option<SymbolId>,
}

impl Node {
    /// A fresh, unannotated node
    pub fn new(kind: NodeKind, loc: Location, text: Name, children: Vec<Node>) -> Self {
        Self {
            kind,
            loc,
            text,
            children,
            attrs: AttrSet::empty(),
            block: BlockNr::GLOBAL,
            struct_name: None,
            decl_loc: None,
            symbol: None,
        }
    }

    /// Name node of a declared type: its last child when that is a `DeclId` or `Field`
    pub fn declared_name(&self) -> Option<&Node> {
        self.children
            .last()
            .filter(|child| matches!(child.kind, NodeKind::DeclId | NodeKind::Field))
    }

    /// Mutable form of [`Node::declared_name`]
    pub fn declared_name_mut(&mut self) -> Option<&mut Node> {
        self.children
            .last_mut()
            .filter(|child| matches!(child.kind, NodeKind::DeclId | NodeKind::Field))
    }

    /// Whether a declared type carries the `[]` marker
    pub fn has_array_marker(&self) -> bool {
        self.children.iter().any(|child| child.kind == NodeKind::Array)
    }

    /// Set `block` on this node and every descendant
    pub fn stamp_block(&mut self, block: BlockNr) {
        self.block = block;
        for child in &mut self.children {
            child.stamp_block(block);
        }
    }

    /// Pre-order iterator over this node and its descendants
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_intern::Interner;
    use oc_span::FileId;

    fn leaf(interner: &Interner, kind: NodeKind, text: &str, line: u32) -> Node {
        Node::new(kind, Location::new(FileId(0), line, 0), interner.intern(text), vec![])
    }

    #[test]
    fn test_stamp_block_reaches_every_descendant() {
        let interner = Interner::new();
        let inner = Node::new(
            NodeKind::Assign,
            Location::default(),
            interner.intern("="),
            vec![
                leaf(&interner, NodeKind::Ident, "x", 1),
                leaf(&interner, NodeKind::IntCon, "1", 1),
            ],
        );
        let mut block = Node::new(NodeKind::Block, Location::default(), interner.intern("{"), vec![inner]);
        block.stamp_block(BlockNr(4));
        assert!(block.descendants().all(|node| node.block == BlockNr(4)));
        assert_eq!(block.descendants().count(), 4);
    }

    #[test]
    fn test_declared_name_and_array_marker() {
        let interner = Interner::new();
        let ty = Node::new(
            NodeKind::Int,
            Location::default(),
            interner.intern("int"),
            vec![
                leaf(&interner, NodeKind::Array, "[]", 1),
                leaf(&interner, NodeKind::DeclId, "xs", 1),
            ],
        );
        let name = ty.declared_name().map(|n| interner.resolve(&n.text));
        assert_eq!(name, Some("xs"));
        assert!(ty.has_array_marker());

        let bare = leaf(&interner, NodeKind::Int, "int", 2);
        assert!(bare.declared_name().is_none());
        assert!(!bare.has_array_marker());
    }

    #[test]
    fn test_descendants_are_preorder() {
        let interner = Interner::new();
        let tree = Node::new(
            NodeKind::Add,
            Location::default(),
            interner.intern("+"),
            vec![
                leaf(&interner, NodeKind::Ident, "a", 1),
                leaf(&interner, NodeKind::Ident, "b", 2),
            ],
        );
        let lines: Vec<u32> = tree.descendants().map(|node| node.loc.line).collect();
        assert_eq!(lines, vec![0, 1, 2]);
    }
}
