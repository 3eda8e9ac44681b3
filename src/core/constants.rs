//! Constants used throughout hangar.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name.
pub const CONFIG_FILE: &str = "hangar.toml";

/// Default store file name, relative to the config file.
pub const STORE_FILE: &str = "hangar.json";

/// Environment variable holding the hex-encoded master key.
pub const KEY_ENV: &str = "HANGAR_ENCRYPTION_KEY";

/// Fallback key variable used by older deployments.
pub const LEGACY_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Environment variable for the log filter.
pub const LOG_ENV: &str = "HANGAR_LOG";

/// Master key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// IV length in bytes. Every seal draws a fresh one.
pub const IV_LEN: usize = 16;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Separator between composite reference fields.
pub const REFERENCE_DELIMITER: char = '-';

/// Composite reference tag for a virtualization host.
pub const HOST_REFERENCE_TAG: &str = "pveServer";

/// Composite reference tag for an entry on a virtualization host.
pub const ENTRY_REFERENCE_TAG: &str = "pveEntry";

/// Suffix appended to the names of duplicated records.
pub const COPY_SUFFIX: &str = " (copy)";

/// Default name for folders created without one.
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

/// Maximum length for names and labels.
pub const MAX_NAME_LEN: usize = 255;

/// Default timeout for external calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
