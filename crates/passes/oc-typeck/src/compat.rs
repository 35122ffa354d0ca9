//! Structural type compatibility

use oc_intern::{Interner, Name};
use oc_syntax::AttrSet;

/// Whether two attribute sets describe compatible types
///
/// `null` fits any reference type (string, struct, array); otherwise the two
/// sides must share at least one type flag. Struct names are not compared.
pub fn same_type(left: AttrSet, right: AttrSet) -> bool {
    let references = AttrSet::STRING | AttrSet::STRUCT | AttrSet::ARRAY;
    let null_fits = |a: AttrSet, b: AttrSet| a.contains(AttrSet::NULL) && b.intersects(references);
    if null_fits(left, right) || null_fits(right, left) {
        return true;
    }
    left.type_flags().intersects(right.type_flags())
}

/// [`same_type`], plus equal struct names when both sides are non-null structs
pub fn compatible(
    left: AttrSet,
    left_struct: Option<Name>,
    right: AttrSet,
    right_struct: Option<Name>,
) -> bool {
    if !same_type(left, right) {
        return false;
    }
    let named = |attrs: AttrSet| attrs.contains(AttrSet::STRUCT) && !attrs.contains(AttrSet::NULL);
    if named(left) && named(right) {
        return left_struct == right_struct;
    }
    true
}

/// Human-readable type for diagnostics
pub fn describe(attrs: AttrSet, struct_name: Option<Name>, interner: &Interner) -> String {
    let base = if attrs.contains(AttrSet::NULL) {
        return "null".to_string();
    } else if attrs.contains(AttrSet::STRUCT) {
        let name = struct_name.map_or("?", |name| interner.resolve(&name));
        format!("struct {name}")
    } else if attrs.contains(AttrSet::STRING) {
        "string".to_string()
    } else if attrs.contains(AttrSet::INT) {
        "int".to_string()
    } else if attrs.contains(AttrSet::VOID) {
        "void".to_string()
    } else {
        return "untyped".to_string();
    };
    if attrs.contains(AttrSet::ARRAY) {
        format!("{base}[]")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_fits_reference_types_only() {
        assert!(same_type(AttrSet::NULL, AttrSet::STRING));
        assert!(same_type(AttrSet::STRUCT, AttrSet::NULL));
        assert!(same_type(AttrSet::NULL, AttrSet::INT | AttrSet::ARRAY));
        assert!(!same_type(AttrSet::NULL, AttrSet::INT));
    }

    #[test]
    fn test_shared_type_flag() {
        assert!(same_type(AttrSet::INT | AttrSet::CONST, AttrSet::INT | AttrSet::VARIABLE));
        assert!(!same_type(AttrSet::INT, AttrSet::STRING));
        assert!(!same_type(AttrSet::VARIABLE, AttrSet::VARIABLE));
    }

    #[test]
    fn test_struct_names_must_agree() {
        let interner = Interner::new();
        let a = Some(interner.intern("a"));
        let b = Some(interner.intern("b"));
        assert!(compatible(AttrSet::STRUCT, a, AttrSet::STRUCT, a));
        assert!(!compatible(AttrSet::STRUCT, a, AttrSet::STRUCT, b));
        assert!(compatible(AttrSet::STRUCT, a, AttrSet::NULL, None));
    }

    #[test]
    fn test_describe() {
        let interner = Interner::new();
        let node = Some(interner.intern("node"));
        assert_eq!(describe(AttrSet::STRUCT | AttrSet::ARRAY, node, &interner), "struct node[]");
        assert_eq!(describe(AttrSet::INT | AttrSet::VREG, None, &interner), "int");
        assert_eq!(describe(AttrSet::NULL | AttrSet::CONST, None, &interner), "null");
        assert_eq!(describe(AttrSet::FUNCTION, None, &interner), "untyped");
    }
}
