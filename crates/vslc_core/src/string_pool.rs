//! The string pool: every string literal of a program, in first-seen order.
//!
//! Code generation emits the pool as a table of constants and refers to each
//! literal by its index, so indices must stay stable for the lifetime of the
//! compilation unit. Unlike [`StringInterner`](crate::StringInterner) the
//! pool never deduplicates: two literals with equal text get two indices.

use crate::index::next_index;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a string in the [`StringPool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct StringIndex(pub u32);

impl StringIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StringIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringIndex({})", self.0)
    }
}

impl fmt::Display for StringIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only list of owned strings.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    /// Capacity reserved on the first insertion when none was requested.
    pub const INITIAL_CAPACITY: usize = 8;

    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strings: Vec::with_capacity(capacity),
        }
    }

    /// Take ownership of `string` and append it, returning its position.
    ///
    /// When the backing storage is full its capacity is doubled.
    pub fn intern(&mut self, string: String) -> StringIndex {
        if self.strings.len() == self.strings.capacity() {
            let grow_by = self.strings.capacity().max(Self::INITIAL_CAPACITY);
            self.strings.reserve_exact(grow_by);
        }
        let index = StringIndex(next_index(self.strings.len()));
        self.strings.push(string);
        index
    }

    #[inline]
    pub fn get(&self, index: StringIndex) -> Option<&str> {
        self.strings.get(index.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.strings.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StringIndex, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (StringIndex(i as u32), s.as_str()))
    }

    /// Release every stored string and then the backing storage.
    ///
    /// Returns the number of strings released.
    pub fn destroy(self) -> usize {
        let mut released = 0;
        for string in self.strings {
            drop(string);
            released += 1;
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_insertion_order() {
        let mut pool = StringPool::new();
        let a = pool.intern("\"a\"".to_string());
        let b = pool.intern("\"b\"".to_string());
        let again = pool.intern("\"a\"".to_string());

        assert_eq!(a, StringIndex(0));
        assert_eq!(b, StringIndex(1));
        assert_eq!(again, StringIndex(2));
        assert_eq!(pool.get(a), Some("\"a\""));
        assert_eq!(pool.get(b), Some("\"b\""));
        assert_eq!(pool.get(again), Some("\"a\""));
        assert_eq!(pool.get(StringIndex(3)), None);
    }

    #[test]
    fn test_capacity_doubles() {
        let mut pool = StringPool::new();
        pool.intern("first".to_string());
        assert!(pool.capacity() >= StringPool::INITIAL_CAPACITY);

        let mut pool = StringPool::with_capacity(2);
        pool.intern("a".to_string());
        pool.intern("b".to_string());
        pool.intern("c".to_string());
        assert!(pool.capacity() >= 4);
        assert_eq!(pool.get(StringIndex(2)), Some("c"));
    }

    #[test]
    fn test_destroy_counts_strings() {
        let mut pool = StringPool::new();
        for i in 0..20 {
            pool.intern(format!("s{}", i));
        }
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.destroy(), 20);
    }

    #[test]
    fn test_iter() {
        let mut pool = StringPool::new();
        pool.intern("x".to_string());
        pool.intern("y".to_string());
        let collected: Vec<_> = pool.iter().map(|(i, s)| (i.index(), s.to_string())).collect();
        assert_eq!(collected, vec![(0, "x".to_string()), (1, "y".to_string())]);
    }
}
