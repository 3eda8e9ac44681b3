//! Identity types.
//!
//! An identity is a stored credential. Its secret is kept sealed; plaintext
//! only exists inside a [`Credential`] for the duration of one connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::core::cipher::Sealed;
use crate::core::types::{OwnerId, RowId};

/// What kind of secret an identity holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityKind {
    #[default]
    Password,
    SshKey,
    Token,
}

impl std::fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IdentityKind::Password => "password",
            IdentityKind::SshKey => "ssh-key",
            IdentityKind::Token => "token",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for IdentityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "password" => Ok(IdentityKind::Password),
            "ssh-key" | "key" => Ok(IdentityKind::SshKey),
            "token" => Ok(IdentityKind::Token),
            other => Err(format!("unknown identity kind '{}'", other)),
        }
    }
}

/// A stored identity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: RowId,
    pub owner: OwnerId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub kind: IdentityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<Sealed>,
    /// Passphrase protecting a private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<Sealed>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Metadata view, safe to hand to listings.
    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            id: self.id,
            label: self.label.clone(),
            username: self.username.clone(),
            kind: self.kind,
            has_secret: self.secret.is_some(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Identity metadata without any sealed material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySummary {
    pub id: RowId,
    pub label: String,
    pub username: Option<String>,
    pub kind: IdentityKind,
    pub has_secret: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an identity.
#[derive(Default)]
pub struct NewIdentity {
    pub label: String,
    pub username: Option<String>,
    pub kind: IdentityKind,
    /// Plaintext secret; empty means no secret.
    pub secret: Zeroizing<String>,
    pub passphrase: Zeroizing<String>,
}

impl NewIdentity {
    /// A password identity.
    pub fn password(label: &str, username: Option<&str>, secret: &str) -> Self {
        Self {
            label: label.to_string(),
            username: username.map(str::to_string),
            kind: IdentityKind::Password,
            secret: Zeroizing::new(secret.to_string()),
            passphrase: Zeroizing::default(),
        }
    }
}

/// Partial update for an identity. `None` leaves a field unchanged.
#[derive(Default)]
pub struct IdentityPatch {
    pub label: Option<String>,
    /// `Some(None)` clears the username.
    pub username: Option<Option<String>>,
    pub kind: Option<IdentityKind>,
    /// New secret; an empty string clears it.
    pub secret: Option<Zeroizing<String>>,
    pub passphrase: Option<Zeroizing<String>>,
}

/// A decrypted credential for one connection attempt.
///
/// Wiped on drop; never stored.
pub struct Credential {
    pub identity: RowId,
    pub kind: IdentityKind,
    pub username: Option<String>,
    pub secret: Option<Zeroizing<String>>,
    pub passphrase: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("kind", &self.kind)
            .field("username", &self.username)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
