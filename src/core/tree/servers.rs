//! Server operations.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::info;

use super::{purge_orphans, require_folder, require_identities, IdentityRetention, Tree};
use crate::core::domain::{DeleteReport, Server, ServerFields, ServerPatch};
use crate::core::types::{OwnerId, RowId};
use crate::core::validation::{copy_name, validate_address, validate_name, validate_port};
use crate::error::Result;

impl Tree {
    /// Get one server.
    pub fn server(&self, owner: OwnerId, id: RowId) -> Result<Server> {
        self.db().read(|t| t.server(owner, id).cloned())
    }

    /// Create a server in `folder`, or at the root.
    ///
    /// The port defaults to the protocol's well-known port.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for bad fields or a repeated identity, and
    /// `Error::NotFound` for a folder or identity the owner cannot see.
    pub fn create_server(
        &self,
        owner: OwnerId,
        folder: Option<RowId>,
        fields: ServerFields,
    ) -> Result<Server> {
        let name = validate_name("name", &fields.name)?;
        let address = validate_address(&fields.address)?;
        let port = validate_port(fields.port.unwrap_or(fields.protocol.default_port()))?;
        let icon = fields.icon.filter(|i| !i.trim().is_empty());

        let server = self.db().transaction(|t| {
            require_folder(t, owner, folder)?;
            require_identities(t, owner, &fields.identities)?;

            let id = t.allocate_id();
            let now = Utc::now();
            let server = Server {
                id,
                owner,
                name,
                icon,
                address,
                port,
                protocol: fields.protocol,
                folder,
                identities: fields.identities,
                status: None,
                created_at: now,
                updated_at: now,
            };
            t.servers.insert(id, server.clone());
            Ok(server)
        })?;

        info!(owner, server = server.id, folder = ?folder, "server created");
        Ok(server)
    }

    /// Apply a partial update to a server.
    ///
    /// Changing the protocol without a port keeps the stored port.
    pub fn edit_server(&self, owner: OwnerId, id: RowId, patch: ServerPatch) -> Result<Server> {
        let name = patch.name.as_deref().map(|n| validate_name("name", n)).transpose()?;
        let address = patch.address.as_deref().map(validate_address).transpose()?;
        let port = patch.port.map(validate_port).transpose()?;

        let server = self.db().transaction(|t| {
            if let Some(identities) = &patch.identities {
                require_identities(t, owner, identities)?;
            }

            let server = t.server_mut(owner, id)?;
            if let Some(name) = name {
                server.name = name;
            }
            if let Some(icon) = patch.icon {
                server.icon = icon.filter(|i| !i.trim().is_empty());
            }
            if let Some(address) = address {
                server.address = address;
            }
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(protocol) = patch.protocol {
                server.protocol = protocol;
            }
            if let Some(identities) = patch.identities {
                server.identities = identities;
            }
            server.updated_at = Utc::now();
            Ok(server.clone())
        })?;

        info!(owner, server = id, "server updated");
        Ok(server)
    }

    /// Move a server to another folder, or to the root.
    pub fn move_server(&self, owner: OwnerId, id: RowId, folder: Option<RowId>) -> Result<Server> {
        let server = self.db().transaction(|t| {
            require_folder(t, owner, folder)?;
            let server = t.server_mut(owner, id)?;
            server.folder = folder;
            server.updated_at = Utc::now();
            Ok(server.clone())
        })?;

        info!(owner, server = id, folder = ?folder, "server moved");
        Ok(server)
    }

    /// Delete a server.
    ///
    /// Its identities are kept unless the tree runs with
    /// [`IdentityRetention::DeleteOrphans`], in which case those no longer
    /// referenced anywhere are removed in the same transaction.
    pub fn delete_server(&self, owner: OwnerId, id: RowId) -> Result<DeleteReport> {
        let retention = self.retention;
        let report = self.db().transaction(|t| {
            t.server(owner, id)?;
            let candidates: BTreeSet<RowId> = t
                .servers
                .remove(&id)
                .map(|s| s.identities.into_iter().collect())
                .unwrap_or_default();

            let identities = match retention {
                IdentityRetention::Keep => Vec::new(),
                IdentityRetention::DeleteOrphans => purge_orphans(t, owner, candidates),
            };
            Ok(DeleteReport {
                servers: vec![id],
                identities,
                ..Default::default()
            })
        })?;

        info!(owner, server = id, identities = report.identities.len(), "server deleted");
        Ok(report)
    }

    /// Duplicate a server together with its identities.
    ///
    /// Every referenced identity is duplicated through the vault, so the copy
    /// shares no identity rows (and no iv) with the source. The whole copy is
    /// one transaction: if any identity fails to open, nothing is created.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the server is absent or not owned, and
    /// `CipherError::Integrity` if a source secret fails to open.
    pub fn duplicate_server(&self, owner: OwnerId, id: RowId) -> Result<Server> {
        let copy = self.db().transaction(|t| {
            let source = t.server(owner, id)?.clone();

            let mut identities = Vec::with_capacity(source.identities.len());
            for identity in &source.identities {
                identities.push(self.vault.duplicate_in(t, owner, *identity)?.id);
            }

            let new_id = t.allocate_id();
            let now = Utc::now();
            let copy = Server {
                id: new_id,
                name: copy_name(&source.name),
                identities,
                created_at: now,
                updated_at: now,
                ..source
            };
            t.servers.insert(new_id, copy.clone());
            Ok(copy)
        })?;

        info!(
            owner,
            source = id,
            server = copy.id,
            identities = copy.identities.len(),
            "server duplicated"
        );
        Ok(copy)
    }
}
