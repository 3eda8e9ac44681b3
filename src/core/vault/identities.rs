//! Identity operations.
//!
//! CRUD and duplication for identities. Every operation is scoped to an
//! owner; rows owned by someone else are reported as not found.

use chrono::Utc;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::Vault;
use crate::core::domain::{Credential, Identity, IdentityPatch, IdentitySummary, NewIdentity};
use crate::core::store::Tables;
use crate::core::types::{OwnerId, RowId};
use crate::core::validation::{copy_name, validate_name};
use crate::error::Result;

impl Vault {
    /// List an owner's identities.
    ///
    /// Metadata only; nothing is decrypted.
    pub fn list(&self, owner: OwnerId) -> Result<Vec<IdentitySummary>> {
        self.db.read(|t| {
            Ok(t.identities
                .values()
                .filter(|i| i.owner == owner)
                .map(Identity::summary)
                .collect())
        })
    }

    /// Metadata for one identity.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the identity is absent or not owned.
    pub fn get(&self, owner: OwnerId, id: RowId) -> Result<IdentitySummary> {
        self.db.read(|t| t.identity(owner, id).map(Identity::summary))
    }

    /// Create an identity, sealing its secret.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the label is empty or too long.
    pub fn create(&self, owner: OwnerId, new: NewIdentity) -> Result<IdentitySummary> {
        let identity = self.db.transaction(|t| self.insert_in(t, owner, new))?;
        info!(owner, identity = identity.id, "identity created");
        Ok(identity.summary())
    }

    /// Update an identity.
    ///
    /// A new secret is sealed under a fresh iv; an empty one clears it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the identity is absent or not owned.
    pub fn update(&self, owner: OwnerId, id: RowId, patch: IdentityPatch) -> Result<IdentitySummary> {
        let label = patch
            .label
            .as_deref()
            .map(|l| validate_name("label", l))
            .transpose()?;
        let secret = patch.secret.as_deref().map(|s| self.seal(s)).transpose()?;
        let passphrase = patch
            .passphrase
            .as_deref()
            .map(|s| self.seal(s))
            .transpose()?;

        let summary = self.db.transaction(|t| {
            let identity = t.identity_mut(owner, id)?;
            if let Some(label) = label {
                identity.label = label;
            }
            if let Some(username) = patch.username {
                identity.username = username;
            }
            if let Some(kind) = patch.kind {
                identity.kind = kind;
            }
            if let Some(secret) = secret {
                identity.secret = secret;
            }
            if let Some(passphrase) = passphrase {
                identity.passphrase = passphrase;
            }
            identity.updated_at = Utc::now();
            Ok(identity.summary())
        })?;

        info!(owner, identity = id, "identity updated");
        Ok(summary)
    }

    /// Delete an identity.
    ///
    /// The id is removed from every server's identity list and from any host
    /// that used it, in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the identity is absent or not owned.
    pub fn delete(&self, owner: OwnerId, id: RowId) -> Result<()> {
        self.db.transaction(|t| remove_identity(t, owner, id))?;
        info!(owner, identity = id, "identity deleted");
        Ok(())
    }

    /// Duplicate an identity.
    ///
    /// The source secret is opened and sealed again, so the copy has its own
    /// iv and ciphertext even though the plaintext is the same.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the source is absent or not owned, and
    /// `CipherError::Integrity` if its secret fails to open.
    pub fn duplicate(&self, owner: OwnerId, id: RowId) -> Result<IdentitySummary> {
        let copy = self.db.transaction(|t| self.duplicate_in(t, owner, id))?;
        info!(owner, source = id, identity = copy.id, "identity duplicated");
        Ok(copy.summary())
    }

    /// Decrypt an identity for a connection.
    ///
    /// The plaintext is not cached; it lives as long as the returned value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the identity is absent or not owned, and
    /// `CipherError::Integrity` if its sealed data was tampered with.
    pub fn reveal(&self, owner: OwnerId, id: RowId) -> Result<Credential> {
        let identity = self.db.read(|t| t.identity(owner, id).cloned())?;
        debug!(owner, identity = id, "revealing identity");

        let secret = identity
            .secret
            .as_ref()
            .map(|sealed| self.open(id, sealed))
            .transpose()?;
        let passphrase = identity
            .passphrase
            .as_ref()
            .map(|sealed| self.open(id, sealed))
            .transpose()?;

        Ok(Credential {
            identity: id,
            kind: identity.kind,
            username: identity.username,
            secret,
            passphrase,
        })
    }

    /// Insert a new identity inside an open transaction.
    pub(crate) fn insert_in(&self, t: &mut Tables, owner: OwnerId, new: NewIdentity) -> Result<Identity> {
        let label = validate_name("label", &new.label)?;
        let secret = self.seal(&new.secret)?;
        let passphrase = self.seal(&new.passphrase)?;

        let id = t.allocate_id();
        let now = Utc::now();
        let identity = Identity {
            id,
            owner,
            label,
            username: new.username.filter(|u| !u.trim().is_empty()),
            kind: new.kind,
            secret,
            passphrase,
            created_at: now,
            updated_at: now,
        };
        t.identities.insert(id, identity.clone());
        Ok(identity)
    }

    /// Duplicate an identity inside an open transaction.
    pub(crate) fn duplicate_in(&self, t: &mut Tables, owner: OwnerId, id: RowId) -> Result<Identity> {
        let source = t.identity(owner, id)?.clone();

        let secret = match &source.secret {
            Some(sealed) => self.open(id, sealed)?,
            None => Zeroizing::default(),
        };
        let passphrase = match &source.passphrase {
            Some(sealed) => self.open(id, sealed)?,
            None => Zeroizing::default(),
        };

        self.insert_in(
            t,
            owner,
            NewIdentity {
                label: copy_name(&source.label),
                username: source.username,
                kind: source.kind,
                secret,
                passphrase,
            },
        )
    }
}

/// Remove an identity and every reference to it.
pub(crate) fn remove_identity(t: &mut Tables, owner: OwnerId, id: RowId) -> Result<()> {
    t.identity(owner, id)?;
    t.identities.remove(&id);

    let now = Utc::now();
    for server in t.servers.values_mut().filter(|s| s.owner == owner) {
        if server.identities.contains(&id) {
            server.identities.retain(|i| *i != id);
            server.updated_at = now;
        }
    }
    for host in t.hosts.values_mut().filter(|h| h.owner == owner) {
        if host.identity == Some(id) {
            host.identity = None;
            host.updated_at = now;
        }
    }
    Ok(())
}
