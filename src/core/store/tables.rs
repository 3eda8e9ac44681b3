//! The stored tables and their owner-scoped accessors.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::domain::{Folder, Identity, Server, VirtualHost};
use crate::core::types::{OwnerId, RowId};
use crate::error::{Error, Result};

/// Every table, keyed by row id.
///
/// Ids come from one shared sequence, so they are unique across tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub(crate) next_id: RowId,
    #[serde(default)]
    pub(crate) identities: BTreeMap<RowId, Identity>,
    #[serde(default)]
    pub(crate) folders: BTreeMap<RowId, Folder>,
    #[serde(default)]
    pub(crate) servers: BTreeMap<RowId, Server>,
    #[serde(default)]
    pub(crate) hosts: BTreeMap<RowId, VirtualHost>,
}

impl Tables {
    /// Draw the next row id.
    pub(crate) fn allocate_id(&mut self) -> RowId {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn identity(&self, owner: OwnerId, id: RowId) -> Result<&Identity> {
        self.identities
            .get(&id)
            .filter(|i| i.owner == owner)
            .ok_or_else(|| Error::identity_not_found(id))
    }

    pub(crate) fn identity_mut(&mut self, owner: OwnerId, id: RowId) -> Result<&mut Identity> {
        self.identities
            .get_mut(&id)
            .filter(|i| i.owner == owner)
            .ok_or_else(|| Error::identity_not_found(id))
    }

    pub(crate) fn folder(&self, owner: OwnerId, id: RowId) -> Result<&Folder> {
        self.folders
            .get(&id)
            .filter(|f| f.owner == owner)
            .ok_or_else(|| Error::folder_not_found(id))
    }

    pub(crate) fn folder_mut(&mut self, owner: OwnerId, id: RowId) -> Result<&mut Folder> {
        self.folders
            .get_mut(&id)
            .filter(|f| f.owner == owner)
            .ok_or_else(|| Error::folder_not_found(id))
    }

    pub(crate) fn server(&self, owner: OwnerId, id: RowId) -> Result<&Server> {
        self.servers
            .get(&id)
            .filter(|s| s.owner == owner)
            .ok_or_else(|| Error::server_not_found(id))
    }

    pub(crate) fn server_mut(&mut self, owner: OwnerId, id: RowId) -> Result<&mut Server> {
        self.servers
            .get_mut(&id)
            .filter(|s| s.owner == owner)
            .ok_or_else(|| Error::server_not_found(id))
    }

    pub(crate) fn host(&self, owner: OwnerId, id: RowId) -> Result<&VirtualHost> {
        self.hosts
            .get(&id)
            .filter(|h| h.owner == owner)
            .ok_or_else(|| Error::host_not_found(id))
    }

    pub(crate) fn host_mut(&mut self, owner: OwnerId, id: RowId) -> Result<&mut VirtualHost> {
        self.hosts
            .get_mut(&id)
            .filter(|h| h.owner == owner)
            .ok_or_else(|| Error::host_not_found(id))
    }

    /// Verify the cross-table invariants.
    ///
    /// Checked on load and before every commit.
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        let mut claim = |table: &str, key: RowId, id: RowId| {
            if key != id {
                return Err(format!("{} row {} is stored under key {}", table, id, key));
            }
            if !seen.insert(id) {
                return Err(format!("id {} is used more than once", id));
            }
            if id > self.next_id {
                return Err(format!("id {} is ahead of the sequence ({})", id, self.next_id));
            }
            Ok(())
        };

        for (key, identity) in &self.identities {
            claim("identity", *key, identity.id)?;
        }
        for (key, folder) in &self.folders {
            claim("folder", *key, folder.id)?;
        }
        for (key, server) in &self.servers {
            claim("server", *key, server.id)?;
        }
        for (key, host) in &self.hosts {
            claim("host", *key, host.id)?;
        }

        for folder in self.folders.values() {
            self.check_folder_ref(folder.owner, folder.parent, "folder", folder.id)?;
            self.check_acyclic(folder)?;
        }

        for server in self.servers.values() {
            self.check_folder_ref(server.owner, server.folder, "server", server.id)?;
            let mut listed = HashSet::new();
            for identity in &server.identities {
                if !listed.insert(*identity) {
                    return Err(format!("server {} lists identity {} twice", server.id, identity));
                }
                self.check_identity_ref(server.owner, *identity, "server", server.id)?;
            }
        }

        for host in self.hosts.values() {
            self.check_folder_ref(host.owner, host.folder, "host", host.id)?;
            if let Some(identity) = host.identity {
                self.check_identity_ref(host.owner, identity, "host", host.id)?;
            }
            let mut remotes = HashSet::new();
            for entry in &host.entries {
                if crate::core::domain::CompositeRef::entry(host.id, &entry.remote_id).is_err() {
                    return Err(format!(
                        "host {} has an entry with invalid remote id '{}'",
                        host.id, entry.remote_id
                    ));
                }
                if !remotes.insert(entry.remote_id.as_str()) {
                    return Err(format!(
                        "host {} lists remote id {} twice",
                        host.id, entry.remote_id
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_folder_ref(
        &self,
        owner: OwnerId,
        folder: Option<RowId>,
        table: &str,
        id: RowId,
    ) -> std::result::Result<(), String> {
        match folder {
            None => Ok(()),
            Some(folder) => match self.folders.get(&folder) {
                Some(f) if f.owner == owner => Ok(()),
                _ => Err(format!("{} {} refers to missing folder {}", table, id, folder)),
            },
        }
    }

    fn check_identity_ref(
        &self,
        owner: OwnerId,
        identity: RowId,
        table: &str,
        id: RowId,
    ) -> std::result::Result<(), String> {
        match self.identities.get(&identity) {
            Some(i) if i.owner == owner => Ok(()),
            _ => Err(format!("{} {} refers to missing identity {}", table, id, identity)),
        }
    }

    fn check_acyclic(&self, folder: &Folder) -> std::result::Result<(), String> {
        let mut current = folder.parent;
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == folder.id || steps > self.folders.len() {
                return Err(format!("folder {} is its own ancestor", folder.id));
            }
            current = self.folders.get(&parent).and_then(|f| f.parent);
            steps += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(id: RowId, owner: OwnerId, parent: Option<RowId>) -> Folder {
        let now = Utc::now();
        Folder {
            id,
            owner,
            name: format!("f{}", id),
            parent,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_allocate_id_is_monotonic() {
        let mut tables = Tables::default();
        assert_eq!(tables.allocate_id(), 1);
        assert_eq!(tables.allocate_id(), 2);
    }

    #[test]
    fn test_owner_scoping_hides_foreign_rows() {
        let mut tables = Tables::default();
        let id = tables.allocate_id();
        tables.folders.insert(id, folder(id, 1, None));
        assert!(tables.folder(1, id).is_ok());
        assert!(matches!(tables.folder(2, id), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_check_detects_cycle() {
        let mut tables = Tables::default();
        tables.next_id = 2;
        tables.folders.insert(1, folder(1, 1, Some(2)));
        tables.folders.insert(2, folder(2, 1, Some(1)));
        assert!(tables.check().unwrap_err().contains("ancestor"));
    }

    #[test]
    fn test_check_detects_cross_owner_parent() {
        let mut tables = Tables::default();
        tables.next_id = 2;
        tables.folders.insert(1, folder(1, 1, None));
        tables.folders.insert(2, folder(2, 2, Some(1)));
        assert!(tables.check().is_err());
    }

    #[test]
    fn test_check_detects_stale_sequence() {
        let mut tables = Tables::default();
        tables.folders.insert(5, folder(5, 1, None));
        assert!(tables.check().unwrap_err().contains("sequence"));
    }
}
