//! Cryptographic utilities for the loyalty platform
//!
//! This module provides:
//! - SHA-256 hashing and domain-tagged digests
//! - ECDSA key management (secp256k1)
//! - Base58Check address derivation for principals

pub mod hash;
pub mod keys;

pub use hash::{double_sha256, sha256, sha256_hex, tagged_digest};
pub use keys::{
    public_key_from_hex, public_key_to_address, sign_digest, verify_signature, KeyError, KeyPair,
};
