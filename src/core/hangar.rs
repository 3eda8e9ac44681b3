//! Hangar.
//!
//! Wires a config file, its store and the master key into the vault, the
//! tree and the dispatcher. The CLI goes through this; library users may
//! assemble the parts themselves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::core::cipher::MasterKey;
use crate::core::config::Config;
use crate::core::dispatch::{Dispatcher, TransportClient, VirtualizationClient};
use crate::core::store::{Database, JsonFile};
use crate::core::tree::Tree;
use crate::core::vault::Vault;
use crate::error::{ConfigError, Result};

/// An opened hangar: configuration plus the services built on its store.
pub struct Hangar {
    config: Config,
    config_path: PathBuf,
    tree: Tree,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for Hangar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hangar")
            .field("config_path", &self.config_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Hangar {
    /// Open the hangar described by the config at `config_path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the config file is missing,
    /// and `StoreError::Corrupt` if the store fails its consistency check.
    pub fn open(config_path: &Path, key: MasterKey) -> Result<Self> {
        let config = Config::load(config_path)?;
        let store = config.store_path(config_path);
        debug!(store = %store.display(), key = %key.fingerprint(), "opening hangar");

        let db = Arc::new(Database::open(JsonFile::new(store))?);
        let vault = Vault::new(db, Arc::new(key));
        let tree = Tree::new(vault).with_retention(config.policy.identity_retention);
        let dispatcher = Dispatcher::unconfigured(tree.clone()).with_timeout(config.timeout());

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            tree,
            dispatcher,
        })
    }

    /// Write a default config at `config_path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` if a config already exists.
    pub fn init(config_path: &Path) -> Result<Config> {
        if config_path.exists() {
            return Err(ConfigError::AlreadyInitialized(config_path.display().to_string()).into());
        }
        let config = Config::new();
        config.save(config_path)?;
        Ok(config)
    }

    /// Replace the external clients used for connect and power actions.
    pub fn with_clients(
        mut self,
        transport: Arc<dyn TransportClient>,
        virtualization: Arc<dyn VirtualizationClient>,
    ) -> Self {
        self.dispatcher = Dispatcher::new(self.tree.clone(), transport, virtualization)
            .with_timeout(self.config.timeout());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_path(&self) -> PathBuf {
        self.config.store_path(&self.config_path)
    }

    pub fn vault(&self) -> &Vault {
        self.tree.vault()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
