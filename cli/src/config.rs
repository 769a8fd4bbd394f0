// agricredit/cli/src/config.rs

use agricredit_economics::EconomicsConfig;
use agricredit_marketplace::{EscrowConfig, MarketConfig};
use agricredit_storage::GenesisAllocation;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `storage.data_dir`
pub const DATA_DIR_ENV: &str = "AGRICREDIT_DATA_DIR";

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgriConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub economics: EconomicsConfig,

    #[serde(default)]
    pub market: EscrowConfig,

    /// Initial allocations, applied once when the ledger is created
    #[serde(default)]
    pub genesis: Vec<GenesisAllocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Ledger database directory
    pub data_dir: PathBuf,

    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives the process
    Memory,
    #[default]
    Rocksdb,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_home().join("data"),
            backend: StorageBackend::default(),
        }
    }
}

impl AgriConfig {
    /// Load from `path` or the default location, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.storage.data_dir = PathBuf::from(dir);
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {:?}: {}", path, e))?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))
    }

    /// Write a fresh config, refusing to clobber an existing one unless `force`
    pub fn init(path: Option<&Path>, force: bool) -> Result<PathBuf> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_config_path);
        if path.exists() && !force {
            anyhow::bail!("Config already exists at {:?}. Use --force to overwrite", path);
        }

        let config = Self::default();
        config.save(&path)?;
        fs::create_dir_all(&config.storage.data_dir).with_context(|| {
            format!("Failed to create data directory {:?}", config.storage.data_dir)
        })?;
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.market_config().validate().map_err(|e| e.to_string())?;

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err("storage.data_dir must not be empty".to_string());
        }

        let mut seen = BTreeSet::new();
        for allocation in &self.genesis {
            if !seen.insert(&allocation.account) {
                return Err(format!("Duplicate genesis account {}", allocation.account));
            }
        }

        // genesis supply must fit a single balance
        self.genesis
            .iter()
            .try_fold(0u64, |sum, allocation| sum.checked_add(allocation.credits))
            .ok_or_else(|| "Genesis allocations overflow".to_string())?;

        Ok(())
    }

    pub fn market_config(&self) -> MarketConfig {
        MarketConfig {
            economics: self.economics.clone(),
            escrow: self.market.clone(),
        }
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agricredit")
}

pub fn default_config_path() -> PathBuf {
    default_home().join("config.toml")
}
