//! ECDSA key management for platform principals
//!
//! Administrators, whitelisted mint signers, and ordinary holders are all
//! identified by Base58Check addresses derived from secp256k1 public keys.

use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::hash::sha256;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Get the principal address for this key pair
    /// Base58Check(version || RIPEMD160(SHA256(pubkey)))
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }

    /// Sign a 32-byte message digest with the private key
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, KeyError> {
        sign_digest(&self.secret_key, digest)
    }

    /// Verify a signature against this key pair's public key
    pub fn verify(&self, digest: &[u8], signature: &[u8]) -> Result<bool, KeyError> {
        verify_signature(&self.public_key, digest, signature)
    }
}

/// Convert a public key to a principal address
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    // SHA256 of the public key, then RIPEMD160
    let sha256_hash = sha256(&public_key.serialize());
    let mut ripemd = Ripemd160::new();
    ripemd.update(&sha256_hash);
    let ripemd_hash = ripemd.finalize();

    // Version byte 0x00 for ordinary principals
    let mut address_bytes = vec![0x00];
    address_bytes.extend_from_slice(&ripemd_hash);

    // Checksum: first 4 bytes of double SHA256
    let checksum = {
        let first_hash = Sha256::digest(&address_bytes);
        let second_hash = Sha256::digest(first_hash);
        second_hash[..4].to_vec()
    };
    address_bytes.extend_from_slice(&checksum);

    bs58::encode(address_bytes).into_string()
}

/// Parse a public key from hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Sign a message digest with a secret key
pub fn sign_digest(secret_key: &SecretKey, digest: &[u8]) -> Result<Vec<u8>, KeyError> {
    let secp = Secp256k1::new();

    // Non-32-byte inputs are hashed first
    let hash = if digest.len() == 32 {
        digest.to_vec()
    } else {
        sha256(digest)
    };

    let message = Message::from_digest_slice(&hash)?;
    let signature = secp.sign_ecdsa(&message, secret_key);
    Ok(signature.serialize_compact().to_vec())
}

/// Verify a signature against a public key
pub fn verify_signature(
    public_key: &PublicKey,
    digest: &[u8],
    signature: &[u8],
) -> Result<bool, KeyError> {
    let secp = Secp256k1::new();

    let hash = if digest.len() == 32 {
        digest.to_vec()
    } else {
        sha256(digest)
    };

    let message = Message::from_digest_slice(&hash)?;
    let sig = secp256k1::ecdsa::Signature::from_compact(signature)
        .map_err(|_| KeyError::InvalidSignature)?;

    match secp.verify_ecdsa(&message, &sig, public_key) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
