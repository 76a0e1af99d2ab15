//! Structural fingerprinting.
//!
//! The hasher is Bob Jenkins' "one-at-a-time" hash: a single `u32`
//! accumulator, a cheap per-byte mix and a three-step final avalanche. It is
//! not cryptographic and is only used to derive the structural identity of a
//! shape graph.
//!
//! Numbers are fingerprinted through their decimal text, so a shape signature
//! such as `[50:U64]` hashes exactly like the string `"[50:U64]"`. Stored
//! identities depend on this textual form.

use core::fmt::Write as _;

/// Incremental one-at-a-time hasher.
///
/// # Example
///
/// ```
/// use dystruct_types::Hasher;
///
/// let mut h = Hasher::new();
/// h.update_str("[");
/// h.update_unsigned(50);
/// h.update_str(":U64]");
/// let id = h.finalize_and_reset();
///
/// let mut text = Hasher::new();
/// text.update(b"[50:U64]");
/// assert_eq!(id, text.finalize_and_reset());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hasher {
    hash: u32,
}

impl Hasher {
    pub const fn new() -> Self {
        Self { hash: 0 }
    }

    pub fn reset(&mut self) {
        self.hash = 0;
    }

    #[inline]
    pub fn hash_byte(&mut self, byte: u8) {
        let mut hash = self.hash;
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
        self.hash = hash;
    }

    /// Hashes every byte of `data`.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.hash_byte(byte);
        }
    }

    /// Hashes `s` with C-string semantics: stops before the first NUL byte.
    pub fn update_str(&mut self, s: &str) {
        for &byte in s.as_bytes().iter().take_while(|&&b| b != 0) {
            self.hash_byte(byte);
        }
    }

    /// Hashes the base-10 text of `value` (no sign, no leading zeros).
    pub fn update_unsigned(&mut self, value: u32) {
        let mut text = DecimalBuf::new();
        // u32::MAX is 10 digits, which always fits.
        let _ = write!(text, "{value}");
        self.update(text.as_bytes());
    }

    /// Applies the final avalanche, returns the hash and resets the state.
    pub fn finalize_and_reset(&mut self) -> u32 {
        let hash = Self::final_mix(self.hash);
        self.reset();
        hash
    }

    /// Returns the current accumulator without the final mix.
    pub fn state(&self) -> u32 {
        self.hash
    }

    #[inline]
    fn final_mix(mut hash: u32) -> u32 {
        hash = hash.wrapping_add(hash << 3);
        hash ^= hash >> 11;
        hash = hash.wrapping_add(hash << 15);
        hash
    }
}

impl core::hash::Hasher for Hasher {
    fn finish(&self) -> u64 {
        u64::from(Self::final_mix(self.hash))
    }

    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }
}

/// Stack buffer large enough for any `u32` in decimal.
struct DecimalBuf {
    buf: [u8; 10],
    len: usize,
}

impl DecimalBuf {
    fn new() -> Self {
        Self {
            buf: [0; 10],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl core::fmt::Write for DecimalBuf {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let end = self.len + s.len();
        let dst = self.buf.get_mut(self.len..end).ok_or(core::fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Hashes `data` in one shot.
pub fn one_at_a_time(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize_and_reset()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn empty_input_hashes_to_zero() {
        assert_eq!(one_at_a_time(b""), 0);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(one_at_a_time(b"a"), 0xca2e_9442);
        assert_eq!(
            one_at_a_time(b"The quick brown fox jumps over the lazy dog"),
            0x519e_91f5
        );
    }

    #[test]
    fn finalize_resets_state() {
        let mut h = Hasher::new();
        h.update(b"a");
        let first = h.finalize_and_reset();
        assert_eq!(h.state(), 0);
        h.update(b"a");
        assert_eq!(h.finalize_and_reset(), first);
    }

    #[test]
    fn unsigned_is_hashed_as_decimal_text() {
        for value in [0u32, 7, 10, 256, 65_536, u32::MAX] {
            let mut h = Hasher::new();
            h.update_unsigned(value);
            assert_eq!(
                h.finalize_and_reset(),
                one_at_a_time(value.to_string().as_bytes()),
                "value {value}"
            );
        }
    }

    #[test]
    fn update_str_stops_at_nul() {
        let mut h = Hasher::new();
        h.update_str("abc\0def");
        assert_eq!(h.finalize_and_reset(), one_at_a_time(b"abc"));
    }

    #[test]
    fn incremental_equals_one_shot() {
        let mut h = Hasher::new();
        h.update_str("<");
        h.update_str("U64");
        h.update_str(",");
        h.update_str("U64");
        h.update_str(">");
        assert_eq!(h.finalize_and_reset(), one_at_a_time(b"<U64,U64>"));
    }

    #[test]
    fn core_hasher_finish_does_not_reset() {
        use core::hash::Hasher as _;

        let mut h = Hasher::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xca2e_9442);
        assert_eq!(h.finish(), 0xca2e_9442);
    }
}
