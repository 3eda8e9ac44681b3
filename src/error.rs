//! Error types for hangar.
//!
//! Each subsystem has its own error enum; [`Error`] wraps them so callers can
//! use `?` across module boundaries. [`Error::kind`] collapses everything into
//! the five categories callers act on.

use thiserror::Error;

use crate::core::types::RowId;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    External(#[from] ExternalError),

    /// Absent and not-owned records are reported the same way.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Coarse error categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Input,
    Integrity,
    Precondition,
    External,
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn identity_not_found(id: RowId) -> Self {
        Self::not_found("identity", id)
    }

    pub fn folder_not_found(id: RowId) -> Self {
        Self::not_found("folder", id)
    }

    pub fn server_not_found(id: RowId) -> Self {
        Self::not_found("server", id)
    }

    pub fn host_not_found(id: RowId) -> Self {
        Self::not_found("host", id)
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Validation(_) | Error::Config(_) => ErrorKind::Input,
            Error::Cipher(CipherError::Incomplete { .. }) => ErrorKind::Input,
            Error::Cipher(CipherError::EncryptionFailed(_)) => ErrorKind::External,
            Error::Cipher(_) => ErrorKind::Integrity,
            // malformed stored data, including a partially sealed secret
            Error::Store(StoreError::Corrupt { .. }) => ErrorKind::Input,
            Error::Precondition(_) => ErrorKind::Precondition,
            Error::External(_)
            | Error::Store(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Prompt(_) => {
                ErrorKind::External
            }
        }
    }
}

/// Configuration and startup errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("encryption key not set: export {0} (64 hex characters)")]
    MissingKey(&'static str),

    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("config not found at {0}")]
    NotInitialized(String),

    #[error("config already exists at {0}")]
    AlreadyInitialized(String),

    #[error("failed to read config: {0}")]
    ReadFile(std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing config field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Sealing and opening failures.
#[derive(Error, Debug)]
pub enum CipherError {
    /// One of ciphertext, iv or tag is missing.
    #[error("sealed secret is incomplete: missing {field}")]
    Incomplete { field: &'static str },

    /// Tag verification failed, or the sealed parts are malformed.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Storage backend errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write store {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("store {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("store transaction aborted: {0}")]
    Aborted(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} is too long ({len} > {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("invalid port: {0}")]
    InvalidPort(u32),

    #[error("folder {folder} cannot be moved into its own subtree")]
    FolderCycle { folder: RowId },

    #[error("identity {0} is listed more than once")]
    DuplicateIdentity(RowId),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The requested action does not fit the resource's kind or state.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("{resource} has no identities to connect with")]
    NoIdentities { resource: String },

    #[error("file transfer requires ssh, {resource} uses {protocol}")]
    FileTransferUnsupported { resource: String, protocol: String },

    #[error("cannot {action} {resource}: it is {state}")]
    InvalidState {
        action: String,
        resource: String,
        state: String,
    },

    #[error("{action} is not supported for {kind}")]
    Unsupported { action: String, kind: &'static str },
}

/// Failures reported by external collaborators.
#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    #[error("virtualization host error: {0}")]
    Virtualization(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("no {0} client configured")]
    NoClient(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::server_not_found(3).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::from(CipherError::Incomplete { field: "iv" }).kind(),
            ErrorKind::Input
        );
        assert_eq!(
            Error::from(CipherError::Integrity("tag".into())).kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            Error::from(ExternalError::NoClient("transport")).kind(),
            ErrorKind::External
        );
        assert_eq!(
            Error::from(StoreError::Aborted("x".into())).kind(),
            ErrorKind::External
        );
        assert_eq!(
            Error::from(StoreError::Corrupt {
                path: "store.json".into(),
                reason: "missing field `iv`".into(),
            })
            .kind(),
            ErrorKind::Input
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::identity_not_found(42);
        assert_eq!(err.to_string(), "identity not found: 42");
    }
}
