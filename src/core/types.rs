//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A store-generated row id.
///
/// Ids come from a single sequence shared by every table, so a plain id
/// names at most one folder, server or host.
pub type RowId = u64;

/// The authenticated user that owns a record.
///
/// Callers authenticate users elsewhere; the core trusts this value.
pub type OwnerId = u64;

/// A hex-encoded byte string (ciphertext, iv or tag).
pub type HexString = String;
