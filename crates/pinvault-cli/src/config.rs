//! CLI configuration — parsed from TOML file + environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use pinvault_core::KdfParams;
use pinvault_store::{FileStore, KeyValueStore, SqliteStore};
use pinvault_vault::{CredentialVault, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub vault: VaultSection,

    #[serde(default)]
    pub storage: StorageSection,

    /// Argon2id parameters for newly written records
    #[serde(default)]
    pub kdf: KdfParams,

    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSection {
    /// Key the encrypted record is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    /// "file" or "sqlite"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Directory holding the store file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Storage backends the CLI can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    Sqlite,
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_backend() -> String {
    "file".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".pinvault")
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `PINVAULT_STORAGE_KEY`
    /// - `PINVAULT_BACKEND`
    /// - `PINVAULT_DATA_DIR`
    /// - `PINVAULT_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PINVAULT_STORAGE_KEY") {
            self.vault.storage_key = v;
        }
        if let Some(v) = lookup("PINVAULT_BACKEND") {
            self.storage.backend = v;
        }
        if let Some(v) = lookup("PINVAULT_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("PINVAULT_LOG_LEVEL") {
            self.log.level = v;
        }
    }

    /// Parse the backend string.
    pub fn backend(&self) -> Result<Backend> {
        match self.storage.backend.as_str() {
            "file" | "json" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => {
                anyhow::bail!("The memory backend does not persist between pinvault runs")
            }
            other => anyhow::bail!("Unknown storage backend: {}", other),
        }
    }

    /// Path of the store file for the configured backend
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(match self.backend()? {
            Backend::File => self.storage.data_dir.join("wallet.json"),
            Backend::Sqlite => self.storage.data_dir.join("wallet.db"),
        })
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.vault.storage_key.is_empty(),
            "vault.storage_key must not be empty"
        );

        self.backend()?;

        self.kdf
            .validate()
            .context("kdf parameters are not accepted by Argon2")?;

        anyhow::ensure!(
            matches!(
                self.log.level.as_str(),
                "error" | "warn" | "info" | "debug" | "trace" | "off"
            ),
            "log.level must be one of error/warn/info/debug/trace/off"
        );

        Ok(())
    }

    /// Open the configured store and wrap it in a vault.
    pub fn open_vault(&self) -> Result<CredentialVault<Box<dyn KeyValueStore>>> {
        let path = self.store_path()?;
        let store: Box<dyn KeyValueStore> = match self.backend()? {
            Backend::File => Box::new(FileStore::new(path)),
            Backend::Sqlite => Box::new(
                SqliteStore::open(&path)
                    .with_context(|| format!("Failed to open database: {}", path.display()))?,
            ),
        };

        Ok(CredentialVault::new(store)
            .with_storage_key(self.vault.storage_key.clone())
            .with_kdf_params(self.kdf))
    }
}

// ============================================================================
// Tests
// ============================================================================
