//! Server types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PowerState;
use crate::core::types::{OwnerId, RowId};

/// Connection protocol of a plain server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Ssh,
    Telnet,
    Rdp,
    Vnc,
}

impl Protocol {
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Ssh => 22,
            Protocol::Telnet => 23,
            Protocol::Rdp => 3389,
            Protocol::Vnc => 5900,
        }
    }

    /// Only ssh carries a file-transfer subsystem (SFTP).
    pub fn supports_file_transfer(self) -> bool {
        matches!(self, Protocol::Ssh)
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Protocol::Ssh => "ssh",
            Protocol::Telnet => "telnet",
            Protocol::Rdp => "rdp",
            Protocol::Vnc => "vnc",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ssh" => Ok(Protocol::Ssh),
            "telnet" => Ok(Protocol::Telnet),
            "rdp" => Ok(Protocol::Rdp),
            "vnc" => Ok(Protocol::Vnc),
            other => Err(format!("unknown protocol '{}'", other)),
        }
    }
}

/// A plain server row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: RowId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub address: String,
    pub port: u16,
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<RowId>,
    /// Ordered; the first identity is the default credential.
    #[serde(default)]
    pub identities: Vec<RowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PowerState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Server {
    pub fn default_identity(&self) -> Option<RowId> {
        self.identities.first().copied()
    }
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}://{}:{})", self.name, self.protocol, self.address, self.port)
    }
}

/// Input for creating a server.
#[derive(Debug, Clone, Default)]
pub struct ServerFields {
    pub name: String,
    pub icon: Option<String>,
    pub address: String,
    /// Defaults to the protocol's well-known port.
    pub port: Option<u16>,
    pub protocol: Protocol,
    pub identities: Vec<RowId>,
}

/// Partial update for a server. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ServerPatch {
    pub name: Option<String>,
    pub icon: Option<Option<String>>,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<Protocol>,
    pub identities: Option<Vec<RowId>>,
}
