//! Annotated-tree dump

use crate::Node;
use oc_intern::Interner;

/// Render `root` one node per line, indented by depth
pub fn dump_tree(root: &Node, interner: &Interner) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0, interner);
    out
}

/// The dump line for a single node, without indentation
pub fn node_line(node: &Node, interner: &Interner) -> String {
    let mut line = format!(
        "{} \"{}\" ({}) {{{}}}",
        node.kind.tag(),
        interner.resolve(&node.text),
        node.loc,
        node.block
    );
    let struct_name = node.struct_name.map(|name| interner.resolve(&name));
    let attrs = node.attrs.render(struct_name);
    if !attrs.is_empty() {
        line.push(' ');
        line.push_str(&attrs);
    }
    if let Some(decl) = node.decl_loc {
        line.push_str(&format!(" ({decl})"));
    }
    line
}

fn write_node(out: &mut String, node: &Node, depth: usize, interner: &Interner) {
    out.push_str(&"|   ".repeat(depth));
    out.push_str(&node_line(node, interner));
    out.push('\n');
    for child in &node.children {
        write_node(out, child, depth + 1, interner);
    }
}
