//! Wide hash codes.
//!
//! Digests are kept at their full 256-bit width so that a cryptographic
//! hash can drive bucket placement without truncation. The table size only
//! enters through [`HashCode::reduce`].

use core::fmt;

/// A 256-bit unsigned integer produced by a [`KeyHasher`](crate::KeyHasher).
///
/// Limbs are stored most significant first.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HashCode([u64; 4]);

impl HashCode {
    /// Build a code from four 64-bit limbs, most significant first.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        HashCode(limbs)
    }

    /// Interpret 32 bytes as a big-endian integer.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(word);
        }
        HashCode(limbs)
    }

    pub fn limbs(&self) -> [u64; 4] {
        self.0
    }

    /// `self mod modulus`, computed over the whole 256-bit value.
    ///
    /// Panics if `modulus` is zero.
    #[inline]
    pub fn reduce(&self, modulus: usize) -> usize {
        assert!(modulus > 0, "cannot reduce a hash code modulo zero");
        let m = modulus as u128;
        // rem < m <= 2^64, so shifting it by one limb cannot overflow u128.
        let rem = self
            .0
            .iter()
            .fold(0u128, |rem, &limb| ((rem << 64) | limb as u128) % m);
        rem as usize
    }
}

impl From<u64> for HashCode {
    fn from(v: u64) -> Self {
        HashCode([0, 0, 0, v])
    }
}

impl From<u128> for HashCode {
    fn from(v: u128) -> Self {
        HashCode([0, 0, (v >> 64) as u64, v as u64])
    }
}

impl fmt::LowerHex for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for limb in self.0 {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}

impl fmt::Display for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashCode({:x})", self)
    }
}
