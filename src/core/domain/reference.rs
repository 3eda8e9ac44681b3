//! Resource references.
//!
//! A reference is the single string a caller uses to name a resource: either
//! a plain row id (`"42"`) for folders, servers and hosts, or a composite
//! `kind-hostId[-remoteId]` for resources that live on a virtualization host
//! (`"pveServer-7"`, `"pveEntry-7-101"`). References are parsed once at the
//! boundary; everything below works with the typed values.

use serde::{Deserialize, Serialize};

use super::{Folder, PowerState, Server, VirtualEntry, VirtualHost};
use crate::core::constants::{ENTRY_REFERENCE_TAG, HOST_REFERENCE_TAG, REFERENCE_DELIMITER};
use crate::core::types::RowId;
use crate::error::{Result, ValidationError};

/// Kind tag of a composite reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeKind {
    /// The virtualization host itself (`pveServer-<host>`).
    Host,
    /// A VM, container or shell on a host (`pveEntry-<host>-<remote>`).
    Entry,
}

impl CompositeKind {
    pub fn tag(self) -> &'static str {
        match self {
            CompositeKind::Host => HOST_REFERENCE_TAG,
            CompositeKind::Entry => ENTRY_REFERENCE_TAG,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            HOST_REFERENCE_TAG => Some(CompositeKind::Host),
            ENTRY_REFERENCE_TAG => Some(CompositeKind::Entry),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A parsed composite reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeRef {
    kind: CompositeKind,
    host_id: RowId,
    remote_id: Option<String>,
}

impl CompositeRef {
    pub fn host(host_id: RowId) -> Self {
        Self {
            kind: CompositeKind::Host,
            host_id,
            remote_id: None,
        }
    }

    /// Reference to an entry on a host.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidReference` if `remote_id` is empty or
    /// contains the delimiter.
    pub fn entry(host_id: RowId, remote_id: &str) -> Result<Self> {
        validate_remote_id(remote_id)?;
        Ok(Self {
            kind: CompositeKind::Entry,
            host_id,
            remote_id: Some(remote_id.to_string()),
        })
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn host_id(&self) -> RowId {
        self.host_id
    }

    /// Remote id; always `Some` for entries, `None` for hosts.
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    /// Parse `kind-hostId[-remoteId]`.
    ///
    /// Parsing is positional: field order and field count are fixed per kind.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidReference` for an unknown kind tag,
    /// the wrong field count, a non-numeric host id or an empty remote id.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason: &str| ValidationError::InvalidReference {
            reference: value.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = value.split(REFERENCE_DELIMITER).collect();
        let kind = CompositeKind::from_tag(parts[0]).ok_or_else(|| invalid("unknown kind"))?;

        let expected = match kind {
            CompositeKind::Host => 2,
            CompositeKind::Entry => 3,
        };
        if parts.len() != expected {
            return Err(invalid(&format!(
                "{} takes {} fields, got {}",
                kind,
                expected,
                parts.len()
            ))
            .into());
        }

        let host_id = parse_row_id(parts[1])
            .ok_or_else(|| invalid("host id must be a number without leading zeros"))?;

        match kind {
            CompositeKind::Host => Ok(Self::host(host_id)),
            CompositeKind::Entry => {
                if parts[2].is_empty() {
                    return Err(invalid("remote id is empty").into());
                }
                Self::entry(host_id, parts[2])
            }
        }
    }
}

impl std::fmt::Display for CompositeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.kind, REFERENCE_DELIMITER, self.host_id)?;
        if let Some(remote_id) = &self.remote_id {
            write!(f, "{}{}", REFERENCE_DELIMITER, remote_id)?;
        }
        Ok(())
    }
}

/// A reference as supplied by a caller, before it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A plain row id: folder, server or host.
    Row(RowId),
    Composite(CompositeRef),
}

impl Reference {
    pub fn entry(host_id: RowId, remote_id: &str) -> Result<Self> {
        CompositeRef::entry(host_id, remote_id).map(Reference::Composite)
    }
}

impl std::str::FromStr for Reference {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::InvalidReference {
                reference: s.to_string(),
                reason: "empty reference".to_string(),
            }
            .into());
        }

        if s.bytes().all(|b| b.is_ascii_digit()) {
            return parse_row_id(s).map(Reference::Row).ok_or_else(|| {
                ValidationError::InvalidReference {
                    reference: s.to_string(),
                    reason: "row id has leading zeros or is out of range".to_string(),
                }
                .into()
            });
        }

        CompositeRef::parse(s).map(Reference::Composite)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Row(id) => write!(f, "{}", id),
            Reference::Composite(composite) => write!(f, "{}", composite),
        }
    }
}

/// A resolved resource with its current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Folder(Folder),
    Server(Server),
    Host(VirtualHost),
    Entry {
        host: VirtualHost,
        entry: VirtualEntry,
    },
}

impl Resource {
    /// Human-readable kind name, used in errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Resource::Folder(_) => "folder",
            Resource::Server(_) => "server",
            Resource::Host(_) => "virtualization host",
            Resource::Entry { .. } => "virtual entry",
        }
    }

    /// The canonical reference for this resource.
    pub fn reference(&self) -> Reference {
        match self {
            Resource::Folder(folder) => Reference::Row(folder.id),
            Resource::Server(server) => Reference::Row(server.id),
            Resource::Host(host) => Reference::Composite(CompositeRef::host(host.id)),
            Resource::Entry { host, entry } => Reference::Composite(CompositeRef {
                kind: CompositeKind::Entry,
                host_id: host.id,
                remote_id: Some(entry.remote_id.clone()),
            }),
        }
    }

    /// Cached power state, for virtualization-backed resources.
    pub fn status(&self) -> Option<PowerState> {
        match self {
            Resource::Server(server) => server.status,
            Resource::Entry { entry, .. } => Some(entry.status),
            Resource::Folder(_) | Resource::Host(_) => None,
        }
    }
}

/// Check a host-side id before it is stored or embedded in a reference.
pub(crate) fn validate_remote_id(remote_id: &str) -> Result<()> {
    if remote_id.is_empty() || remote_id.contains(REFERENCE_DELIMITER) {
        return Err(ValidationError::InvalidReference {
            reference: remote_id.to_string(),
            reason: format!(
                "remote id must be non-empty and must not contain '{}'",
                REFERENCE_DELIMITER
            ),
        }
        .into());
    }
    Ok(())
}

/// Canonical decimal only, so every row has exactly one spelling.
fn parse_row_id(value: &str) -> Option<RowId> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if value.len() > 1 && value.starts_with('0') {
        return None;
    }
    value.parse().ok()
}
