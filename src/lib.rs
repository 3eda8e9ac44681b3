//! Hangar - an encrypted identity vault and resource tree for remote servers
//! and virtualization hosts.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── identity      # Identity CRUD
//! │   ├── folder        # Folder commands
//! │   ├── server        # Server commands
//! │   ├── host          # Virtualization host commands
//! │   ├── tree          # Tree listing
//! │   ├── action        # Dispatch an action on a reference
//! │   ├── config        # hangar.toml management
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # AES-256-GCM sealing and the master key
//!     ├── store/        # Tables, transactions, memory and JSON backends
//!     ├── domain/       # Records, references and reports
//!     ├── vault/        # Identity operations
//!     ├── tree/         # Folder, server and host operations
//!     ├── dispatch/     # Action routing and client traits
//!     ├── config        # hangar.toml management
//!     └── hangar        # Wiring for the CLI
//! ```
//!
//! # Features
//!
//! - Secrets sealed with AES-256-GCM, a fresh IV per seal
//! - Duplicates re-seal their secrets instead of sharing ciphertext
//! - Cascading deletes and multi-identity duplication as single transactions
//! - One dispatcher for folders, servers, hosts and host entries

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::cipher::MasterKey;
pub use crate::core::config::Config;
pub use crate::core::dispatch::{Action, ActionOutcome, Dispatcher};
pub use crate::core::hangar::Hangar;
pub use crate::core::tree::{IdentityRetention, Tree};
pub use crate::core::vault::Vault;
pub use crate::error::{Error, ErrorKind, Result};
