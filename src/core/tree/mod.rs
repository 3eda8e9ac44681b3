//! The resource tree.
//!
//! Folders, servers and virtualization hosts form one hierarchy per owner.
//! Structural changes run as single store transactions: a cascading delete or
//! a server duplication either applies completely or not at all.

mod folders;
mod hosts;
mod servers;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::domain::{
    CompositeKind, FolderNode, Reference, Resource, Server, TreeSnapshot, VirtualHost,
};
use crate::core::store::{Database, Tables};
use crate::core::types::{OwnerId, RowId};
use crate::core::vault::Vault;
use crate::error::{Error, Result};

/// What happens to identities when the last server using them is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityRetention {
    /// Identities are only ever removed explicitly.
    #[default]
    Keep,
    /// Identities no longer referenced by any server or host are removed with
    /// the deleted rows.
    DeleteOrphans,
}

impl std::fmt::Display for IdentityRetention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityRetention::Keep => f.write_str("keep"),
            IdentityRetention::DeleteOrphans => f.write_str("delete-orphans"),
        }
    }
}

/// Resource tree operations over the vault's database.
#[derive(Debug, Clone)]
pub struct Tree {
    vault: Vault,
    retention: IdentityRetention,
}

impl Tree {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            retention: IdentityRetention::default(),
        }
    }

    pub fn with_retention(mut self, retention: IdentityRetention) -> Self {
        self.retention = retention;
        self
    }

    pub fn retention(&self) -> IdentityRetention {
        self.retention
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    fn db(&self) -> &Database {
        &self.vault.db
    }

    /// Look up the resource a reference names.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if nothing the owner can see matches.
    pub fn resolve(&self, owner: OwnerId, reference: &Reference) -> Result<Resource> {
        self.db().read(|t| match reference {
            Reference::Row(id) => {
                if let Ok(folder) = t.folder(owner, *id) {
                    return Ok(Resource::Folder(folder.clone()));
                }
                if let Ok(server) = t.server(owner, *id) {
                    return Ok(Resource::Server(server.clone()));
                }
                if let Ok(host) = t.host(owner, *id) {
                    return Ok(Resource::Host(host.clone()));
                }
                Err(Error::not_found("resource", id))
            }
            Reference::Composite(composite) => {
                let host = t.host(owner, composite.host_id())?;
                match (composite.kind(), composite.remote_id()) {
                    (CompositeKind::Host, _) => Ok(Resource::Host(host.clone())),
                    (CompositeKind::Entry, Some(remote_id)) => {
                        let entry = host
                            .entry(remote_id)
                            .ok_or_else(|| Error::not_found("virtual entry", composite))?;
                        Ok(Resource::Entry {
                            host: host.clone(),
                            entry: entry.clone(),
                        })
                    }
                    (CompositeKind::Entry, None) => Err(Error::not_found("virtual entry", composite)),
                }
            }
        })
    }

    /// The owner's whole tree, folders nested, everything sorted by name.
    pub fn snapshot(&self, owner: OwnerId) -> Result<TreeSnapshot> {
        self.db().read(|t| {
            let mut children: BTreeMap<Option<RowId>, Vec<RowId>> = BTreeMap::new();
            for folder in t.folders.values().filter(|f| f.owner == owner) {
                children.entry(folder.parent).or_default().push(folder.id);
            }

            let servers_in = |folder: Option<RowId>| {
                let mut servers: Vec<Server> = t
                    .servers
                    .values()
                    .filter(|s| s.owner == owner && s.folder == folder)
                    .cloned()
                    .collect();
                servers.sort_by_key(|s| (s.name.to_lowercase(), s.id));
                servers
            };
            let hosts_in = |folder: Option<RowId>| {
                let mut hosts: Vec<VirtualHost> = t
                    .hosts
                    .values()
                    .filter(|h| h.owner == owner && h.folder == folder)
                    .cloned()
                    .collect();
                hosts.sort_by_key(|h| (h.name.to_lowercase(), h.id));
                hosts
            };

            fn build(
                t: &Tables,
                id: RowId,
                children: &BTreeMap<Option<RowId>, Vec<RowId>>,
                servers_in: &dyn Fn(Option<RowId>) -> Vec<Server>,
                hosts_in: &dyn Fn(Option<RowId>) -> Vec<VirtualHost>,
            ) -> FolderNode {
                let folder = t.folders[&id].clone();
                let mut folders: Vec<FolderNode> = children
                    .get(&Some(id))
                    .map(|ids| {
                        ids.iter()
                            .map(|child| build(t, *child, children, servers_in, hosts_in))
                            .collect()
                    })
                    .unwrap_or_default();
                folders.sort_by_key(|n| (n.folder.name.to_lowercase(), n.folder.id));
                FolderNode {
                    folder,
                    folders,
                    servers: servers_in(Some(id)),
                    hosts: hosts_in(Some(id)),
                }
            }

            let mut folders: Vec<FolderNode> = children
                .get(&None)
                .map(|ids| {
                    ids.iter()
                        .map(|id| build(t, *id, &children, &servers_in, &hosts_in))
                        .collect()
                })
                .unwrap_or_default();
            folders.sort_by_key(|n| (n.folder.name.to_lowercase(), n.folder.id));

            Ok(TreeSnapshot {
                folders,
                servers: servers_in(None),
                hosts: hosts_in(None),
            })
        })
    }
}

/// Check that a target folder exists for the owner.
fn require_folder(t: &Tables, owner: OwnerId, folder: Option<RowId>) -> Result<()> {
    if let Some(folder) = folder {
        t.folder(owner, folder)?;
    }
    Ok(())
}

/// Check an identity list: every id owned by `owner`, none repeated.
fn require_identities(t: &Tables, owner: OwnerId, identities: &[RowId]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for id in identities {
        if !seen.insert(*id) {
            return Err(crate::error::ValidationError::DuplicateIdentity(*id).into());
        }
        t.identity(owner, *id)?;
    }
    Ok(())
}

/// Remove the candidate identities that no server or host references anymore.
fn purge_orphans(t: &mut Tables, owner: OwnerId, candidates: BTreeSet<RowId>) -> Vec<RowId> {
    let mut removed = Vec::new();
    for id in candidates {
        let referenced = t
            .servers
            .values()
            .any(|s| s.owner == owner && s.identities.contains(&id))
            || t
                .hosts
                .values()
                .any(|h| h.owner == owner && h.identity == Some(id));
        if !referenced && t.identities.remove(&id).is_some() {
            removed.push(id);
        }
    }
    removed
}
