//! Administrator board configuration
//!
//! A fixed M-of-N set of administrator addresses established once and
//! never mutated afterwards.

use crate::crypto::sha256;
use chrono::{DateTime, Utc};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use thiserror::Error;

/// Errors raised while constructing an administrator board
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Administrator set is empty")]
    NoAdministrators,
    #[error("Invalid quorum: {0}")]
    InvalidQuorum(String),
    #[error("Duplicate administrator address")]
    DuplicateAdministrator,
}

/// A fixed administrator set with a confirmation quorum
///
/// The board itself has a deterministic address, derived from the quorum
/// and the sorted administrator addresses. Relayed calls see this address
/// as their caller, so components can gate operations on it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminBoard {
    /// Administrator addresses, in submission order
    pub administrators: Vec<String>,
    /// Minimum distinct confirmations required before execution
    pub required: u8,
    /// Deterministic board address
    pub address: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl AdminBoard {
    /// Create a new board
    ///
    /// # Errors
    /// Returns an error unless `0 < required <= administrators.len()` and
    /// all addresses are distinct.
    pub fn new(administrators: Vec<String>, required: u8) -> Result<Self, BoardError> {
        if administrators.is_empty() {
            return Err(BoardError::NoAdministrators);
        }

        if required == 0 {
            return Err(BoardError::InvalidQuorum(
                "quorum must be at least 1".to_string(),
            ));
        }

        if required as usize > administrators.len() {
            return Err(BoardError::InvalidQuorum(format!(
                "quorum {} exceeds administrator count {}",
                required,
                administrators.len()
            )));
        }

        // Check for duplicates
        let mut sorted = administrators.clone();
        sorted.sort();
        for i in 1..sorted.len() {
            if sorted[i] == sorted[i - 1] {
                return Err(BoardError::DuplicateAdministrator);
            }
        }

        let address = Self::generate_address(&sorted, required);

        Ok(Self {
            administrators,
            required,
            address,
            created_at: Utc::now(),
        })
    }

    /// Generate the board address from quorum and sorted administrators
    ///
    /// Address = Base58Check(version || RIPEMD160(SHA256(required || sorted admins)))
    fn generate_address(sorted_admins: &[String], required: u8) -> String {
        let mut script_data = vec![required];
        for admin in sorted_admins {
            script_data.extend_from_slice(admin.as_bytes());
        }

        let sha256_hash = sha256(&script_data);

        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha256_hash);
        let ripemd_hash = ripemd.finalize();

        // Script-style version byte (0x05 -> addresses starting with '3')
        let mut address_bytes = vec![0x05];
        address_bytes.extend_from_slice(&ripemd_hash);

        let checksum = {
            use sha2::Sha256;
            let first_hash = Sha256::digest(&address_bytes);
            let second_hash = Sha256::digest(first_hash);
            second_hash[..4].to_vec()
        };
        address_bytes.extend_from_slice(&checksum);

        bs58::encode(address_bytes).into_string()
    }

    /// Get the board address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Check if an address is a recognized administrator
    pub fn is_administrator(&self, address: &str) -> bool {
        self.administrators.iter().any(|a| a == address)
    }

    /// Get the required quorum (M)
    pub fn required(&self) -> u8 {
        self.required
    }

    /// Get the total administrator count (N)
    pub fn administrator_count(&self) -> usize {
        self.administrators.len()
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.required, self.administrators.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_admins() -> Vec<String> {
        vec![
            "alice".to_string(),
            "bob".to_string(),
            "david".to_string(),
        ]
    }

    #[test]
    fn test_board_creation() {
        let board = AdminBoard::new(sample_admins(), 2).unwrap();

        assert_eq!(board.required(), 2);
        assert_eq!(board.administrator_count(), 3);
        assert_eq!(board.description(), "2-of-3");
        assert!(board.is_administrator("alice"));
        assert!(!board.is_administrator("mallory"));
    }

    #[test]
    fn test_board_validation() {
        // Empty administrator set
        assert!(matches!(
            AdminBoard::new(vec![], 1),
            Err(BoardError::NoAdministrators)
        ));

        // Zero quorum
        assert!(matches!(
            AdminBoard::new(sample_admins(), 0),
            Err(BoardError::InvalidQuorum(_))
        ));

        // Quorum exceeds administrator count
        assert!(matches!(
            AdminBoard::new(sample_admins(), 4),
            Err(BoardError::InvalidQuorum(_))
        ));

        // Duplicate administrators
        assert!(matches!(
            AdminBoard::new(vec!["same".to_string(), "same".to_string()], 2),
            Err(BoardError::DuplicateAdministrator)
        ));
    }

    #[test]
    fn test_address_determinism() {
        let board1 = AdminBoard::new(sample_admins(), 2).unwrap();
        let board2 = AdminBoard::new(sample_admins(), 2).unwrap();
        assert_eq!(board1.address(), board2.address());

        // Different quorum, different address
        let board3 = AdminBoard::new(sample_admins(), 3).unwrap();
        assert_ne!(board1.address(), board3.address());
    }

    #[test]
    fn test_address_format() {
        let board = AdminBoard::new(sample_admins(), 2).unwrap();
        assert!(board.address().starts_with('3'));
    }
}
