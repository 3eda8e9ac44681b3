//! Virtualization host types.
//!
//! A host is an imported virtualization node (Proxmox VE). Its entries are
//! virtual machines, containers and the node shell; their existence and power
//! state belong to the host, so hangar only caches them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{OwnerId, RowId};

/// Power state of a virtualization-backed resource.
///
/// Transitional states exist on the host but are not observed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    Running,
    Stopped,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::Running => f.write_str("running"),
            PowerState::Stopped => f.write_str("stopped"),
        }
    }
}

/// A power request sent to the virtualization host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Start,
    Stop,
    Shutdown,
}

impl PowerAction {
    /// State the resource must be in for this action.
    pub fn requires(self) -> PowerState {
        match self {
            PowerAction::Start => PowerState::Stopped,
            PowerAction::Stop | PowerAction::Shutdown => PowerState::Running,
        }
    }

    /// State the resource ends up in once the host completes the action.
    pub fn target(self) -> PowerState {
        match self {
            PowerAction::Start => PowerState::Running,
            PowerAction::Stop | PowerAction::Shutdown => PowerState::Stopped,
        }
    }
}

impl std::fmt::Display for PowerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerAction::Start => f.write_str("start"),
            PowerAction::Stop => f.write_str("stop"),
            PowerAction::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// Kind of resource on a virtualization host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A QEMU virtual machine.
    Qemu,
    /// An LXC container.
    Lxc,
    /// The node's own shell. Always on, no power control.
    Shell,
}

impl EntryKind {
    pub fn has_power_control(self) -> bool {
        !matches!(self, EntryKind::Shell)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Qemu => f.write_str("qemu"),
            EntryKind::Lxc => f.write_str("lxc"),
            EntryKind::Shell => f.write_str("shell"),
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "qemu" | "vm" => Ok(EntryKind::Qemu),
            "lxc" | "container" => Ok(EntryKind::Lxc),
            "shell" | "node" => Ok(EntryKind::Shell),
            other => Err(format!("unknown entry kind '{}'", other)),
        }
    }
}

/// A cached resource living on a virtualization host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualEntry {
    pub kind: EntryKind,
    /// Host-side id: a vmid, or the node name for shells.
    pub remote_id: String,
    pub name: String,
    pub status: PowerState,
}

/// An imported virtualization host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualHost {
    pub id: RowId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<RowId>,
    pub address: String,
    pub port: u16,
    pub username: String,
    /// Credential for the host API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<RowId>,
    #[serde(default)]
    pub entries: Vec<VirtualEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VirtualHost {
    pub fn entry(&self, remote_id: &str) -> Option<&VirtualEntry> {
        self.entries.iter().find(|e| e.remote_id == remote_id)
    }

    pub fn entry_mut(&mut self, remote_id: &str) -> Option<&mut VirtualEntry> {
        self.entries.iter_mut().find(|e| e.remote_id == remote_id)
    }
}

/// Input for importing a host.
#[derive(Debug, Clone, Default)]
pub struct HostFields {
    pub name: String,
    pub address: String,
    /// Defaults to 8006, the Proxmox VE API port.
    pub port: Option<u16>,
    pub username: String,
    pub identity: Option<RowId>,
}

/// Partial update for a host.
#[derive(Debug, Clone, Default)]
pub struct HostPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub identity: Option<Option<RowId>>,
}
