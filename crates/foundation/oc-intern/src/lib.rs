//! String interning for identifiers and lexemes

pub use lasso::Spur as Name;
use lasso::ThreadedRodeo;
use std::sync::Arc;

/// Thread-safe string interner shared by every pass of one session
#[derive(Clone, Debug)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Create an empty interner
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern `text`, returning the existing key if it was seen before
    pub fn intern(&self, text: &str) -> Name {
        self.inner.get_or_intern(text)
    }

    /// Text behind a key produced by this interner
    pub fn resolve(&self, name: &Name) -> &str {
        self.inner.resolve(name)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_idempotent() {
        let interner = Interner::new();
        let first = interner.intern("count");
        let second = interner.intern("count");
        assert_eq!(first, second);
        assert_ne!(first, interner.intern("counts"));
    }

    #[test]
    fn test_resolve_returns_original_text() {
        let interner = Interner::new();
        let name = interner.intern("__ocmain");
        assert_eq!(interner.resolve(&name), "__ocmain");
    }

    #[test]
    fn test_clones_share_storage() {
        let interner = Interner::new();
        let clone = interner.clone();
        let name = clone.intern("shared");
        assert_eq!(interner.resolve(&name), "shared");
        assert_eq!(interner.intern("shared"), name);
    }
}
