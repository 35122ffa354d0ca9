//! Numbered temporaries

use oc_syntax::AttrSet;

/// Role of a temporary, which picks its name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempKind {
    /// Heap allocation result or other pointer
    Pointer,
    /// Comparison, negation or condition value
    Bool,
    /// Integer intermediate
    Int,
    /// Character intermediate
    Char,
    /// String intermediate
    String,
}

impl TempKind {
    /// Name prefix
    pub fn prefix(self) -> char {
        match self {
            Self::Pointer => 'p',
            Self::Bool => 'b',
            Self::Int => 'i',
            Self::Char => 'c',
            Self::String => 's',
        }
    }

    /// Kind for holding a value with these attributes
    pub fn for_attrs(attrs: AttrSet) -> Self {
        if attrs.intersects(AttrSet::STRUCT | AttrSet::ARRAY | AttrSet::NULL) {
            Self::Pointer
        } else if attrs.contains(AttrSet::STRING) {
            Self::String
        } else {
            Self::Int
        }
    }
}

/// Hands out temporaries numbered from 1, never reusing a number
#[derive(Debug, Clone)]
pub struct TempCounter {
    next: u32,
}

impl TempCounter {
    /// Counter starting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Next temporary of `kind`, e.g. `b3`
    pub fn fresh(&mut self, kind: TempKind) -> String {
        let number = self.next;
        self.next += 1;
        let name = format!("{}{number}", kind.prefix());
        tracing::trace!(temp = %name, "allocate temporary");
        name
    }
}

impl Default for TempCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_shared_across_kinds() {
        let mut temps = TempCounter::new();
        assert_eq!(temps.fresh(TempKind::Bool), "b1");
        assert_eq!(temps.fresh(TempKind::Int), "i2");
        assert_eq!(temps.fresh(TempKind::Pointer), "p3");
        assert_eq!(temps.fresh(TempKind::Char), "c4");
        assert_eq!(temps.fresh(TempKind::String), "s5");
    }

    #[test]
    fn test_kind_for_attrs() {
        assert_eq!(TempKind::for_attrs(AttrSet::STRUCT), TempKind::Pointer);
        assert_eq!(TempKind::for_attrs(AttrSet::INT | AttrSet::ARRAY), TempKind::Pointer);
        assert_eq!(TempKind::for_attrs(AttrSet::STRING), TempKind::String);
        assert_eq!(TempKind::for_attrs(AttrSet::INT | AttrSet::VREG), TempKind::Int);
    }
}
