//! Folder operations.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::info;

use super::{purge_orphans, require_folder, IdentityRetention, Tree};
use crate::core::domain::{DeleteReport, Folder};
use crate::core::store::Tables;
use crate::core::types::{OwnerId, RowId};
use crate::core::validation::validate_name;
use crate::error::{Result, ValidationError};

impl Tree {
    /// Get one folder.
    pub fn folder(&self, owner: OwnerId, id: RowId) -> Result<Folder> {
        self.db().read(|t| t.folder(owner, id).cloned())
    }

    /// Create a folder under `parent`, or at the root.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the parent is absent or not owned, and
    /// `ValidationError` for an invalid name.
    pub fn create_folder(&self, owner: OwnerId, parent: Option<RowId>, name: &str) -> Result<Folder> {
        let name = validate_name("name", name)?;
        let folder = self.db().transaction(|t| {
            require_folder(t, owner, parent)?;
            let id = t.allocate_id();
            let now = Utc::now();
            let folder = Folder {
                id,
                owner,
                name,
                parent,
                created_at: now,
                updated_at: now,
            };
            t.folders.insert(id, folder.clone());
            Ok(folder)
        })?;

        info!(owner, folder = folder.id, parent = ?parent, "folder created");
        Ok(folder)
    }

    /// Rename a folder in place.
    pub fn rename_folder(&self, owner: OwnerId, id: RowId, name: &str) -> Result<Folder> {
        let name = validate_name("name", name)?;
        let folder = self.db().transaction(|t| {
            let folder = t.folder_mut(owner, id)?;
            folder.name = name;
            folder.updated_at = Utc::now();
            Ok(folder.clone())
        })?;

        info!(owner, folder = id, "folder renamed");
        Ok(folder)
    }

    /// Move a folder under a new parent, or to the root.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::FolderCycle` if the new parent is the folder
    /// itself or one of its descendants.
    pub fn move_folder(&self, owner: OwnerId, id: RowId, parent: Option<RowId>) -> Result<Folder> {
        let folder = self.db().transaction(|t| {
            t.folder(owner, id)?;
            require_folder(t, owner, parent)?;
            if let Some(parent) = parent {
                if subtree(t, id).contains(&parent) {
                    return Err(ValidationError::FolderCycle { folder: id }.into());
                }
            }

            let folder = t.folder_mut(owner, id)?;
            folder.parent = parent;
            folder.updated_at = Utc::now();
            Ok(folder.clone())
        })?;

        info!(owner, folder = id, parent = ?parent, "folder moved");
        Ok(folder)
    }

    /// Delete a folder and everything beneath it.
    ///
    /// Child folders, their servers and hosts (with cached entries) go in one
    /// transaction. Identities follow the retention policy.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the folder is absent or not owned. On any
    /// error nothing is removed.
    pub fn delete_folder(&self, owner: OwnerId, id: RowId) -> Result<DeleteReport> {
        let retention = self.retention;
        let report = self.db().transaction(|t| {
            t.folder(owner, id)?;
            let folders = subtree(t, id);

            let servers: Vec<RowId> = t
                .servers
                .values()
                .filter(|s| s.owner == owner && s.folder.is_some_and(|f| folders.contains(&f)))
                .map(|s| s.id)
                .collect();
            let hosts: Vec<RowId> = t
                .hosts
                .values()
                .filter(|h| h.owner == owner && h.folder.is_some_and(|f| folders.contains(&f)))
                .map(|h| h.id)
                .collect();

            let mut candidates = BTreeSet::new();
            let mut entries = 0;
            for server in &servers {
                if let Some(server) = t.servers.remove(server) {
                    candidates.extend(server.identities);
                }
            }
            for host in &hosts {
                if let Some(host) = t.hosts.remove(host) {
                    entries += host.entries.len();
                    candidates.extend(host.identity);
                }
            }
            for folder in &folders {
                t.folders.remove(folder);
            }

            let identities = match retention {
                IdentityRetention::Keep => Vec::new(),
                IdentityRetention::DeleteOrphans => purge_orphans(t, owner, candidates),
            };

            Ok(DeleteReport {
                folders: folders.into_iter().collect(),
                servers,
                hosts,
                entries,
                identities,
            })
        })?;

        info!(
            owner,
            folder = id,
            folders = report.folders.len(),
            servers = report.servers.len(),
            hosts = report.hosts.len(),
            identities = report.identities.len(),
            "folder deleted"
        );
        Ok(report)
    }
}

/// A folder and all of its descendants.
fn subtree(t: &Tables, root: RowId) -> BTreeSet<RowId> {
    let mut found = BTreeSet::from([root]);
    let mut frontier = vec![root];
    while let Some(current) = frontier.pop() {
        for folder in t.folders.values() {
            if folder.parent == Some(current) && found.insert(folder.id) {
                frontier.push(folder.id);
            }
        }
    }
    found
}
