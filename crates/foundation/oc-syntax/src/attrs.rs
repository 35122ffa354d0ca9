//! Type and role attributes carried by nodes and symbols

use bitflags::bitflags;

bitflags! {
    /// Attribute set. Flags below `FUNCTION` describe a type; the rest mark a role.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AttrSet: u16 {
        /// `void`
        const VOID = 1 << 0;
        /// `int`, `char` and `bool`
        const INT = 1 << 1;
        /// the `null` constant
        const NULL = 1 << 2;
        /// `string`
        const STRING = 1 << 3;
        /// a struct type; the struct name travels separately
        const STRUCT = 1 << 4;
        /// array of the base type
        const ARRAY = 1 << 5;
        /// function name
        const FUNCTION = 1 << 6;
        /// variable name
        const VARIABLE = 1 << 7;
        /// struct field
        const FIELD = 1 << 8;
        /// names a type
        const TYPEID = 1 << 9;
        /// function parameter
        const PARAM = 1 << 10;
        /// assignable location
        const LVAL = 1 << 11;
        /// literal constant
        const CONST = 1 << 12;
        /// value computed into a register
        const VREG = 1 << 13;
        /// value computed as an address
        const VADDR = 1 << 14;
    }
}

/// Dump order of the individual flags
const RENDER_ORDER: [(AttrSet, &str); 15] = [
    (AttrSet::VOID, "void"),
    (AttrSet::INT, "int"),
    (AttrSet::STRING, "string"),
    (AttrSet::STRUCT, "struct"),
    (AttrSet::TYPEID, "typeid"),
    (AttrSet::NULL, "null"),
    (AttrSet::ARRAY, "[]"),
    (AttrSet::FIELD, "field"),
    (AttrSet::VARIABLE, "variable"),
    (AttrSet::FUNCTION, "function"),
    (AttrSet::LVAL, "lval"),
    (AttrSet::PARAM, "param"),
    (AttrSet::CONST, "const"),
    (AttrSet::VREG, "vreg"),
    (AttrSet::VADDR, "vaddr"),
];

impl AttrSet {
    /// Every flag that describes a type (`VOID..=ARRAY`)
    pub const TYPE_FLAGS: Self = Self::from_bits_retain(
        Self::VOID.bits()
            | Self::INT.bits()
            | Self::NULL.bits()
            | Self::STRING.bits()
            | Self::STRUCT.bits()
            | Self::ARRAY.bits(),
    );

    /// The type part of the set
    pub fn type_flags(self) -> Self {
        self & Self::TYPE_FLAGS
    }

    /// Whether any type flag is present
    pub fn is_typed(self) -> bool {
        self.intersects(Self::TYPE_FLAGS)
    }

    /// A struct value that is neither an array of structs nor `null`
    pub fn is_plain_struct(self) -> bool {
        self.contains(Self::STRUCT) && !self.intersects(Self::ARRAY | Self::NULL)
    }

    /// Render for dumps. `struct_name` follows the `struct` word in quotes.
    pub fn render(self, struct_name: Option<&str>) -> String {
        let mut words = Vec::new();
        for (flag, word) in RENDER_ORDER {
            if !self.contains(flag) {
                continue;
            }
            if flag == Self::STRUCT {
                words.push(format!("struct \"{}\"", struct_name.unwrap_or_default()));
            } else {
                words.push(word.to_string());
            }
        }
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_uses_fixed_order() {
        let attrs = AttrSet::VADDR | AttrSet::LVAL | AttrSet::INT | AttrSet::VARIABLE;
        assert_eq!(attrs.render(None), "int variable lval vaddr");
    }

    #[test]
    fn test_render_struct_name_and_typeid() {
        let attrs = AttrSet::STRUCT | AttrSet::TYPEID;
        assert_eq!(attrs.render(Some("node")), "struct \"node\" typeid");
        assert_eq!(AttrSet::ARRAY.render(None), "[]");
        assert_eq!(AttrSet::empty().render(None), "");
    }

    #[test]
    fn test_type_flags_strip_roles() {
        let attrs = AttrSet::STRING | AttrSet::ARRAY | AttrSet::PARAM | AttrSet::LVAL;
        assert_eq!(attrs.type_flags(), AttrSet::STRING | AttrSet::ARRAY);
        assert!(attrs.is_typed());
        assert!(!(AttrSet::FUNCTION | AttrSet::VREG).is_typed());
    }

    #[test]
    fn test_plain_struct() {
        assert!(AttrSet::STRUCT.is_plain_struct());
        assert!(!(AttrSet::STRUCT | AttrSet::ARRAY).is_plain_struct());
    }
}
