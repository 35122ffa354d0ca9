//! Mapping oc types to oil type names

use crate::mangle::{MangleKind, mangle};
use oc_intern::Interner;
use oc_syntax::{AttrSet, BlockNr, Node, NodeKind};

/// Type name for a type keyword node, ignoring any `[]` marker
pub fn keyword_type(ty: &Node, interner: &Interner) -> String {
    match ty.kind {
        NodeKind::Int => "int".to_string(),
        NodeKind::Char | NodeKind::Bool => "char".to_string(),
        NodeKind::String => "char*".to_string(),
        NodeKind::TypeId => struct_pointer(interner.resolve(&ty.text)),
        _ => "void".to_string(),
    }
}

/// Type name for a declarator, `[]` marker included
pub fn declarator_type(ty: &Node, interner: &Interner) -> String {
    let base = keyword_type(ty, interner);
    if ty.has_array_marker() {
        format!("{base}*")
    } else {
        base
    }
}

/// Type name for a value with the given attributes, used for temporaries
pub fn value_type(attrs: AttrSet, struct_name: Option<&str>) -> String {
    let base = if attrs.contains(AttrSet::STRUCT) {
        struct_pointer(struct_name.unwrap_or_default())
    } else if attrs.contains(AttrSet::STRING) {
        "char*".to_string()
    } else if attrs.contains(AttrSet::INT) {
        "int".to_string()
    } else if attrs.contains(AttrSet::NULL) {
        return "void*".to_string();
    } else {
        "void".to_string()
    };
    if attrs.contains(AttrSet::ARRAY) {
        format!("{base}*")
    } else {
        base
    }
}

/// `struct s_<name>*`
pub fn struct_pointer(name: &str) -> String {
    format!("struct {}*", struct_tag(name))
}

/// `s_<name>`
pub fn struct_tag(name: &str) -> String {
    mangle(MangleKind::StructType, BlockNr::GLOBAL, name, Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_span::FileId;
    use oc_syntax::TreeBuilder;

    #[test]
    fn test_declarator_types() {
        let interner = Interner::new();
        let b = TreeBuilder::new(&interner, FileId(0));
        let cases = [
            (b.decl("int", (1, 0), (1, 4), "a"), "int"),
            (b.decl("bool", (1, 0), (1, 5), "a"), "char"),
            (b.decl("char", (1, 0), (1, 5), "a"), "char"),
            (b.decl("string", (1, 0), (1, 7), "a"), "char*"),
            (b.decl("void", (1, 0), (1, 5), "a"), "void"),
            (b.decl("node", (1, 0), (1, 5), "a"), "struct s_node*"),
            (b.array_decl("int", (1, 0), (1, 6), "a"), "int*"),
            (b.array_decl("node", (1, 0), (1, 7), "a"), "struct s_node**"),
        ];
        for (decl, expected) in cases {
            assert_eq!(declarator_type(&decl, &interner), expected);
        }
    }

    #[test]
    fn test_value_types() {
        assert_eq!(value_type(AttrSet::INT | AttrSet::VREG, None), "int");
        assert_eq!(value_type(AttrSet::STRING, None), "char*");
        assert_eq!(value_type(AttrSet::STRUCT, Some("s")), "struct s_s*");
        assert_eq!(value_type(AttrSet::INT | AttrSet::ARRAY, None), "int*");
        assert_eq!(value_type(AttrSet::NULL, None), "void*");
    }
}
