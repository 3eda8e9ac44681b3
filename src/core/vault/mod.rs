//! The identity vault.
//!
//! Owns identity records. Secrets are sealed on write and opened only when a
//! connection needs them; listings and mutation results carry metadata only.

mod identities;

use std::sync::Arc;

use tracing::warn;
use zeroize::Zeroizing;

use crate::core::cipher::{self, MasterKey, Sealed};
use crate::core::store::Database;
use crate::core::types::RowId;
use crate::error::{Error, Result};

/// Identity vault bound to one database and the process master key.
#[derive(Clone)]
pub struct Vault {
    pub(crate) db: Arc<Database>,
    pub(crate) key: Arc<MasterKey>,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("db", &self.db)
            .field("key", &self.key)
            .finish()
    }
}

impl Vault {
    pub fn new(db: Arc<Database>, key: Arc<MasterKey>) -> Self {
        Self { db, key }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Seal an optional secret; empty input stays unsealed.
    pub(crate) fn seal(&self, plaintext: &str) -> Result<Option<Sealed>> {
        cipher::seal(&self.key, plaintext)
    }

    /// Open a sealed secret, logging integrity failures as security events.
    pub(crate) fn open(&self, identity: RowId, sealed: &Sealed) -> Result<Zeroizing<String>> {
        cipher::open_sealed(&self.key, sealed).map_err(|e| {
            if let Error::Cipher(_) = &e {
                warn!(
                    identity,
                    key = %self.key.fingerprint(),
                    "identity secret failed integrity check"
                );
            }
            e
        })
    }
}
