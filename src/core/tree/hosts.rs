//! Virtualization host operations.
//!
//! A host's entries are a cache of what the host reports. They are replaced
//! wholesale by [`Tree::sync_entries`] and never created one by one.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use tracing::{debug, info};

use super::{purge_orphans, require_folder, IdentityRetention, Tree};
use crate::core::domain::{
    CompositeRef, DeleteReport, HostFields, HostPatch, PowerState, VirtualEntry, VirtualHost,
};
use crate::core::types::{OwnerId, RowId};
use crate::core::validation::{validate_address, validate_name, validate_port};
use crate::error::{Error, Result, ValidationError};

/// Proxmox VE API port.
const DEFAULT_HOST_PORT: u16 = 8006;

impl Tree {
    /// Get one host with its cached entries.
    pub fn host(&self, owner: OwnerId, id: RowId) -> Result<VirtualHost> {
        self.db().read(|t| t.host(owner, id).cloned())
    }

    /// Import a virtualization host. It starts with no entries.
    pub fn create_host(
        &self,
        owner: OwnerId,
        folder: Option<RowId>,
        fields: HostFields,
    ) -> Result<VirtualHost> {
        let name = validate_name("name", &fields.name)?;
        let address = validate_address(&fields.address)?;
        let port = validate_port(fields.port.unwrap_or(DEFAULT_HOST_PORT))?;
        let username = validate_name("username", &fields.username)?;

        let host = self.db().transaction(|t| {
            require_folder(t, owner, folder)?;
            if let Some(identity) = fields.identity {
                t.identity(owner, identity)?;
            }

            let id = t.allocate_id();
            let now = Utc::now();
            let host = VirtualHost {
                id,
                owner,
                name,
                folder,
                address,
                port,
                username,
                identity: fields.identity,
                entries: Vec::new(),
                created_at: now,
                updated_at: now,
            };
            t.hosts.insert(id, host.clone());
            Ok(host)
        })?;

        info!(owner, host = host.id, folder = ?folder, "host created");
        Ok(host)
    }

    /// Apply a partial update to a host.
    pub fn edit_host(&self, owner: OwnerId, id: RowId, patch: HostPatch) -> Result<VirtualHost> {
        let name = patch.name.as_deref().map(|n| validate_name("name", n)).transpose()?;
        let address = patch.address.as_deref().map(validate_address).transpose()?;
        let port = patch.port.map(validate_port).transpose()?;
        let username = patch
            .username
            .as_deref()
            .map(|u| validate_name("username", u))
            .transpose()?;

        let host = self.db().transaction(|t| {
            if let Some(Some(identity)) = patch.identity {
                t.identity(owner, identity)?;
            }

            let host = t.host_mut(owner, id)?;
            if let Some(name) = name {
                host.name = name;
            }
            if let Some(address) = address {
                host.address = address;
            }
            if let Some(port) = port {
                host.port = port;
            }
            if let Some(username) = username {
                host.username = username;
            }
            if let Some(identity) = patch.identity {
                host.identity = identity;
            }
            host.updated_at = Utc::now();
            Ok(host.clone())
        })?;

        info!(owner, host = id, "host updated");
        Ok(host)
    }

    /// Move a host to another folder, or to the root.
    pub fn move_host(&self, owner: OwnerId, id: RowId, folder: Option<RowId>) -> Result<VirtualHost> {
        let host = self.db().transaction(|t| {
            require_folder(t, owner, folder)?;
            let host = t.host_mut(owner, id)?;
            host.folder = folder;
            host.updated_at = Utc::now();
            Ok(host.clone())
        })?;

        info!(owner, host = id, folder = ?folder, "host moved");
        Ok(host)
    }

    /// Delete a host and its cached entries.
    pub fn delete_host(&self, owner: OwnerId, id: RowId) -> Result<DeleteReport> {
        let retention = self.retention;
        let report = self.db().transaction(|t| {
            t.host(owner, id)?;
            let (entries, candidates) = match t.hosts.remove(&id) {
                Some(host) => (host.entries.len(), host.identity.into_iter().collect()),
                None => (0, BTreeSet::new()),
            };

            let identities = match retention {
                IdentityRetention::Keep => Vec::new(),
                IdentityRetention::DeleteOrphans => purge_orphans(t, owner, candidates),
            };
            Ok(DeleteReport {
                hosts: vec![id],
                entries,
                identities,
                ..Default::default()
            })
        })?;

        info!(owner, host = id, entries = report.entries, "host deleted");
        Ok(report)
    }

    /// Replace a host's cached entries with what the host reported.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a remote id is empty, contains the
    /// reference delimiter, or appears twice. Nothing is stored in that case.
    pub fn sync_entries(
        &self,
        owner: OwnerId,
        id: RowId,
        entries: Vec<VirtualEntry>,
    ) -> Result<VirtualHost> {
        let mut seen = HashSet::new();
        for entry in &entries {
            CompositeRef::entry(id, &entry.remote_id)?;
            if !seen.insert(entry.remote_id.as_str()) {
                return Err(ValidationError::Invalid {
                    field: "remote_id",
                    reason: format!("'{}' is reported twice", entry.remote_id),
                }
                .into());
            }
        }

        let host = self.db().transaction(|t| {
            let host = t.host_mut(owner, id)?;
            host.entries = entries;
            host.updated_at = Utc::now();
            Ok(host.clone())
        })?;

        debug!(owner, host = id, entries = host.entries.len(), "host entries synced");
        Ok(host)
    }

    /// Record the observed power state of one entry.
    pub fn set_entry_status(
        &self,
        owner: OwnerId,
        entry: &CompositeRef,
        status: PowerState,
    ) -> Result<VirtualEntry> {
        let remote_id = entry
            .remote_id()
            .ok_or_else(|| Error::not_found("virtual entry", entry))?;

        self.db().transaction(|t| {
            let host = t.host_mut(owner, entry.host_id())?;
            let cached = host
                .entry_mut(remote_id)
                .ok_or_else(|| Error::not_found("virtual entry", entry))?;
            cached.status = status;
            let cached = cached.clone();
            host.updated_at = Utc::now();
            Ok(cached)
        })
    }

    /// Record polled power states for the entries a host still has.
    ///
    /// Statuses for entries dropped since the poll started are ignored, and
    /// entries added meanwhile keep their cached status.
    pub fn apply_statuses(
        &self,
        owner: OwnerId,
        id: RowId,
        statuses: &[(String, PowerState)],
    ) -> Result<VirtualHost> {
        let host = self.db().transaction(|t| {
            let host = t.host_mut(owner, id)?;
            for (remote_id, status) in statuses {
                if let Some(cached) = host.entry_mut(remote_id) {
                    cached.status = *status;
                }
            }
            host.updated_at = Utc::now();
            Ok(host.clone())
        })?;

        debug!(owner, host = id, polled = statuses.len(), "entry statuses applied");
        Ok(host)
    }
}
