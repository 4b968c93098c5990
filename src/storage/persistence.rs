//! Platform persistence layer
//!
//! Saves and loads the whole platform as JSON with atomic writes and
//! rotating backups.

use crate::platform::Platform;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: std::path::PathBuf,
    pub platform_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: std::path::PathBuf::from(".loyalty_data"),
            platform_file: "platform.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Platform storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Get the platform file path
    fn platform_path(&self) -> std::path::PathBuf {
        self.config.data_dir.join(&self.config.platform_file)
    }

    /// Get a backup file path
    fn backup_path(&self, index: usize) -> std::path::PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.platform_file, index))
    }

    /// Save the platform to disk
    pub fn save(&self, platform: &Platform) -> Result<(), StorageError> {
        let path = self.platform_path();

        // Create backup if enabled
        if self.config.backup_enabled && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("platform.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, platform)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Load the platform from disk
    pub fn load(&self) -> Result<Platform, StorageError> {
        let path = self.platform_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Platform file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);

        let platform: Platform = serde_json::from_reader(reader)?;
        Ok(platform)
    }

    /// Check if a saved platform exists
    pub fn exists(&self) -> bool {
        self.platform_path().exists()
    }

    /// Delete the saved platform
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.platform_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                let next = self.backup_path(i + 1);
                fs::rename(&current, &next)?;
            }
        }

        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<Platform, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        let file = fs::File::open(&backup_path)?;
        let reader = BufReader::new(file);

        let platform: Platform = serde_json::from_reader(reader)?;
        Ok(platform)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        let mut backups = Vec::new();

        for i in 0..self.config.max_backups {
            if self.backup_path(i).exists() {
                backups.push(i);
            }
        }

        backups
    }
}

/// Save a platform to a specific file path
pub fn save_to_file(platform: &Platform, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, platform)?;
    Ok(())
}

/// Load a platform from a specific file path
pub fn load_from_file(path: &Path) -> Result<Platform, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let platform: Platform = serde_json::from_reader(reader)?;
    Ok(platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_platform() -> Platform {
        Platform::new(
            vec!["alice".to_string(), "bob".to_string(), "david".to_string()],
            2,
            "deployer".to_string(),
            "dev_address".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_save_load_platform() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let storage = Storage::new(config).unwrap();
        let mut platform = sample_platform();
        let target = platform.targets.payment.address.clone();
        platform
            .ledger
            .submit_transaction("alice", &target, 0, vec![1, 2, 3])
            .unwrap();
        platform.confirm_transaction("alice", 0).unwrap();

        // Save
        storage.save(&platform).unwrap();
        assert!(storage.exists());

        // Load
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.board_address(), platform.board_address());
        assert_eq!(loaded.ledger.transaction_count(), 1);
        assert!(loaded.ledger.has_confirmed(0, "alice"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let storage = Storage::new(config).unwrap();
        assert!(!storage.exists());
        assert!(matches!(
            storage.load(),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn test_backup_rotation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            max_backups: 3,
            ..Default::default()
        };

        let storage = Storage::new(config).unwrap();
        let mut platform = sample_platform();
        let target = platform.targets.payment.address.clone();

        // Save multiple times
        for i in 0..5 {
            storage.save(&platform).unwrap();
            platform
                .ledger
                .submit_transaction("alice", &target, 0, vec![i])
                .unwrap();
        }

        // Should have 3 backups (max)
        let backups = storage.list_backups();
        assert!(backups.len() <= 3);
    }
}
