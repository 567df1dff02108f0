//! SHA-256 key digests.

use crate::hash_code::HashCode;
use crate::strategy::KeyHasher;
use core::fmt::Display;
use sha2::{Digest, Sha256};

/// Hashes the `Display` text of a key with SHA-256 and reads the digest as
/// a big-endian 256-bit integer.
///
/// Placement is deterministic across processes and platforms, unlike the
/// default `StdHash`. Keys with identical text share a code, so equal keys
/// must render equal text.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sha256Digest;

impl Sha256Digest {
    pub fn digest_bytes(bytes: &[u8]) -> HashCode {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        HashCode::from_be_bytes(out)
    }
}

impl<K> KeyHasher<K> for Sha256Digest
where
    K: ?Sized + Display,
{
    fn hash_code(&self, key: &K) -> HashCode {
        Sha256Digest::digest_bytes(key.to_string().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            Sha256Digest.hash_code("abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            Sha256Digest.hash_code("").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    /// Invariant: numbers hash through their decimal text.
    #[test]
    fn numeric_keys_hash_their_text() {
        assert_eq!(Sha256Digest.hash_code(&42u32), Sha256Digest.hash_code("42"));
        assert_ne!(Sha256Digest.hash_code(&42u32), Sha256Digest.hash_code(&24u32));
    }

    #[test]
    fn digest_reduces_to_a_bucket() {
        let code = Sha256Digest.hash_code("abc");
        // Low byte of the digest is 0xad; 0xad % 16 == 13.
        assert_eq!(code.reduce(16), 13);
    }
}
