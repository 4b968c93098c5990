//! Hashing utilities for the loyalty platform
//!
//! SHA-256 based hashing used for component addresses, mint-permit
//! digests, and ledger bookkeeping.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
/// Used for the checksum in Base58Check address encoding
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Computes a 32-byte digest of domain-tagged data
///
/// The tag separates signing domains so a signature over one message
/// type can never be replayed as another (e.g. mint permits vs. future
/// message kinds).
pub fn tagged_digest(tag: &str, data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    hasher.update([0u8]);
    hasher.update(data);
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let data = b"hello world";
        let hash = sha256(data);
        assert_eq!(hash.len(), 32);
        assert_eq!(
            sha256_hex(data),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_double_sha256() {
        let data = b"hello world";
        let hash = double_sha256(data);
        assert_eq!(hash.len(), 32);
    }

    #[test]
    fn test_tagged_digest_separates_domains() {
        let data = b"same payload";
        let a = tagged_digest("loyalty/mint-permit", data);
        let b = tagged_digest("loyalty/other", data);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
