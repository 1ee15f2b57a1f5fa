//! `u32` positions into the compiler's arenas.
//!
//! Nodes, symbols, frames, functions and pooled strings are addressed by
//! `u32` handles. Running out of handle space is treated like running out of
//! memory.

/// The position the next element pushed onto an arena of `len` elements gets.
///
/// # Panics
///
/// Panics when `len` is `u32::MAX` or more.
#[inline]
pub fn next_index(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(index) if index < u32::MAX => index,
        _ => panic!("arena of {len} elements exceeds the u32 handle space"),
    }
}
