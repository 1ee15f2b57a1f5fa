//! Identifier interning.
//!
//! Symbol tables are keyed by interned identifiers so that every scope
//! lookup compares integers instead of strings. String literals do NOT go
//! through here; they are collected without deduplication by
//! [`StringPool`](crate::StringPool).

use lasso::{Rodeo, Spur};
use std::fmt;

/// An interned identifier. A lightweight (u32) handle into a
/// [`StringInterner`]; comparing two handles is an integer comparison.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.0)
    }
}

/// Identifier interner owned by one compilation unit.
///
/// Binding is single-threaded, so this wraps a plain `Rodeo`.
#[derive(Default)]
pub struct StringInterner {
    rodeo: Rodeo,
}

impl StringInterner {
    pub fn new() -> Self {
        Self { rodeo: Rodeo::new() }
    }

    /// Intern an identifier, returning the existing handle if it was seen before.
    #[inline]
    pub fn intern(&mut self, s: &str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern(s))
    }

    /// Look up an identifier without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString::from_spur)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.as_spur())
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = StringInterner::new();
        let a = interner.intern("counter");
        let b = interner.intern("counter");
        let c = interner.intern("limit");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "counter");
        assert_eq!(interner.resolve(c), "limit");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_get_does_not_intern() {
        let mut interner = StringInterner::new();
        assert!(interner.get("x").is_none());
        assert!(interner.is_empty());
        let x = interner.intern("x");
        assert_eq!(interner.get("x"), Some(x));
    }
}
