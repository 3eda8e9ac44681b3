//! Tree views and mutation reports returned to callers.

use serde::Serialize;

use super::{Folder, Server, VirtualHost};
use crate::core::types::RowId;

/// Everything a delete removed, so callers can reconcile their own view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub folders: Vec<RowId>,
    pub servers: Vec<RowId>,
    pub hosts: Vec<RowId>,
    /// Number of cached virtual entries dropped with their hosts.
    pub entries: usize,
    /// Identities removed by the orphan-retention policy.
    pub identities: Vec<RowId>,
}

impl DeleteReport {
    pub fn total(&self) -> usize {
        self.folders.len() + self.servers.len() + self.hosts.len() + self.identities.len()
    }
}

/// A folder with its contents, recursively.
#[derive(Debug, Clone, Serialize)]
pub struct FolderNode {
    #[serde(flatten)]
    pub folder: Folder,
    pub folders: Vec<FolderNode>,
    pub servers: Vec<Server>,
    pub hosts: Vec<VirtualHost>,
}

/// One owner's whole tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeSnapshot {
    pub folders: Vec<FolderNode>,
    pub servers: Vec<Server>,
    pub hosts: Vec<VirtualHost>,
}

impl TreeSnapshot {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.servers.is_empty() && self.hosts.is_empty()
    }
}
