//! Record storage.
//!
//! [`Database`] holds every table in memory behind one lock and hands out
//! transactions. A transaction runs against a working copy; the copy is
//! checked, persisted through the [`Backend`], and only then swapped in. If
//! the closure, the check, or the backend fails, the tables are left exactly
//! as they were, so cascades and multi-row duplications are all-or-nothing.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Backend` trait
//! 2. Add the implementation in a new file (e.g., `sqlite.rs`)
//! 3. Re-export from this module

mod fs;
mod memory;
mod tables;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

pub use fs::JsonFile;
pub use memory::Memory;
pub use tables::Tables;

/// Persistence backend.
///
/// Backends see whole snapshots; they never observe a half-applied
/// transaction.
pub trait Backend: Send + Sync {
    /// Load the last persisted tables. A missing store is an empty one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data exists but cannot be read or parsed.
    fn load(&self) -> Result<Tables>;

    /// Durably replace the persisted tables.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on any write failure. The caller rolls back.
    fn persist(&self, tables: &Tables) -> Result<()>;

    /// Where the data lives, for logs and errors.
    fn describe(&self) -> String;
}

/// Transactional table store.
pub struct Database {
    tables: Mutex<Tables>,
    backend: Box<dyn Backend>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.backend.describe())
            .finish()
    }
}

impl Database {
    /// Open a database over a backend, loading and checking its tables.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the loaded tables break an invariant.
    pub fn open(backend: impl Backend + 'static) -> Result<Self> {
        let tables = backend.load()?;
        tables.check().map_err(|reason| StoreError::Corrupt {
            path: backend.describe(),
            reason,
        })?;

        debug!(
            store = %backend.describe(),
            identities = tables.identities.len(),
            folders = tables.folders.len(),
            servers = tables.servers.len(),
            hosts = tables.hosts.len(),
            "store opened"
        );

        Ok(Self {
            tables: Mutex::new(tables),
            backend: Box::new(backend),
        })
    }

    /// An empty, non-persistent database.
    pub fn in_memory() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            backend: Box::new(Memory),
        }
    }

    /// Run a read-only query.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T>) -> Result<T> {
        let tables = self.tables.lock();
        f(&tables)
    }

    /// Run a mutation atomically.
    ///
    /// Transactions are serialized; a transaction never observes another one
    /// half-applied.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, `StoreError::Aborted` if the result breaks
    /// an invariant, or the backend's error if persisting fails. In every
    /// error case nothing is applied.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self.tables.lock();
        let mut working = tables.clone();

        let value = f(&mut working)?;

        if let Err(reason) = working.check() {
            warn!(%reason, "transaction rejected by integrity check");
            return Err(StoreError::Aborted(reason).into());
        }

        if let Err(e) = self.backend.persist(&working) {
            warn!(store = %self.backend.describe(), error = %e, "persist failed, rolling back");
            return Err(e);
        }

        *tables = working;
        Ok(value)
    }
}
