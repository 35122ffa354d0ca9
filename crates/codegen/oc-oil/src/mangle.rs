//! Name mangling for emitted identifiers

use oc_span::Location;
use oc_syntax::BlockNr;

/// What a mangled name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MangleKind<'a> {
    /// Function name
    Function,
    /// Integer literal
    IntLiteral,
    /// Label anchor; the text is the label prefix (`while`, `fi`, ...)
    Label,
    /// Declared variable or parameter
    Declared,
    /// Struct type name
    StructType,
    /// Field of the struct named `owner`
    Field {
        /// Struct the field belongs to
        owner: &'a str,
    },
    /// Anything else
    Other,
}

/// Mangle `text`; the same inputs always give the same name
pub fn mangle(kind: MangleKind<'_>, block: BlockNr, text: &str, loc: Location) -> String {
    match kind {
        MangleKind::Function => format!("__{text}"),
        MangleKind::IntLiteral => int_literal(text),
        MangleKind::Label => format!("{}:;", label(text, loc)),
        MangleKind::Declared => format!("_{block}_{text}"),
        MangleKind::StructType => format!("s_{text}"),
        MangleKind::Field { owner } => format!("f_{owner}_{text}"),
        MangleKind::Other if block.is_global() => format!("__{text}"),
        MangleKind::Other => format!("_{block}_{text}"),
    }
}

/// Label name keyed by source position, e.g. `while_0_3_0`
pub fn label(prefix: &str, loc: Location) -> String {
    format!("{prefix}_{}", loc.key())
}

// Leading zeros would read as octal downstream.
fn int_literal(text: &str) -> String {
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() && !text.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_span::FileId;

    fn loc(line: u32, column: u32) -> Location {
        Location::new(FileId(0), line, column)
    }

    #[test]
    fn test_mangle_table() {
        let here = loc(3, 0);
        let inner = BlockNr(2);
        assert_eq!(mangle(MangleKind::Function, inner, "main", here), "__main");
        assert_eq!(mangle(MangleKind::IntLiteral, inner, "42", here), "42");
        assert_eq!(mangle(MangleKind::Label, inner, "while", here), "while_0_3_0:;");
        assert_eq!(mangle(MangleKind::Declared, inner, "x", here), "_2_x");
        assert_eq!(mangle(MangleKind::Declared, BlockNr::GLOBAL, "x", here), "_0_x");
        assert_eq!(mangle(MangleKind::StructType, BlockNr::GLOBAL, "node", here), "s_node");
        assert_eq!(
            mangle(MangleKind::Field { owner: "node" }, BlockNr::GLOBAL, "next", here),
            "f_node_next"
        );
        assert_eq!(mangle(MangleKind::Other, BlockNr::GLOBAL, "y", here), "__y");
        assert_eq!(mangle(MangleKind::Other, inner, "y", here), "_2_y");
    }

    #[test]
    fn test_int_literal_drops_leading_zeros() {
        assert_eq!(int_literal("007"), "7");
        assert_eq!(int_literal("0"), "0");
        assert_eq!(int_literal("000"), "0");
        assert_eq!(int_literal("120"), "120");
    }

    #[test]
    fn test_scoped_names_do_not_collide() {
        let names: std::collections::HashSet<String> = (0..50)
            .map(|block| mangle(MangleKind::Declared, BlockNr(block), "i", loc(1, 1)))
            .collect();
        assert_eq!(names.len(), 50);
    }

    #[test]
    fn test_labels_do_not_collide() {
        let mut labels = std::collections::HashSet::new();
        for line in 1..20 {
            for column in 0..20 {
                assert!(labels.insert(label("while", loc(line, column))));
            }
        }
        // `1_23` vs `12_3` style ambiguity is ruled out by the separator
        assert_ne!(label("fi", loc(1, 23)), label("fi", loc(12, 3)));
    }
}
