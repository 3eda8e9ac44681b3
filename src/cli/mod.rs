//! Command-line interface.

pub mod action;
pub mod completions;
pub mod config;
pub mod folder;
pub mod host;
pub mod identity;
pub mod output;
pub mod server;
pub mod tree;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::cipher::MasterKey;
use crate::core::config::Config;
use crate::core::domain::{IdentityKind, Protocol};
use crate::core::hangar::Hangar;
use crate::core::types::{OwnerId, RowId};
use crate::error::Result;

/// Hangar - encrypted identities and a resource tree for remote servers.
#[derive(Parser)]
#[command(
    name = "hangar",
    about = "Encrypted identity vault and resource tree for remote servers",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to hangar.toml
    #[arg(long, global = true, env = "HANGAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Owner the commands act for
    #[arg(long, global = true, env = "HANGAR_OWNER", default_value_t = 1)]
    pub owner: OwnerId,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Manage identities (passwords, keys, tokens)
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },

    /// Manage folders
    Folder {
        #[command(subcommand)]
        action: FolderAction,
    },

    /// Manage servers
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },

    /// Manage virtualization hosts
    Host {
        #[command(subcommand)]
        action: HostAction,
    },

    /// Show the resource tree
    Tree {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Perform an action on a resource
    Action {
        /// Row id, pveServer-<host> or pveEntry-<host>-<remote>
        reference: String,
        /// connect, sftp, start, stop, shutdown, delete or duplicate
        action: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage hangar.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Identity subcommands.
#[derive(Subcommand)]
pub enum IdentityAction {
    /// List identities (metadata only)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an identity; the secret is prompted for unless given
    Add {
        label: String,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long, default_value_t = IdentityKind::Password)]
        kind: IdentityKind,
        /// Secret value (prompted when omitted)
        #[arg(long)]
        secret: Option<String>,
        /// Passphrase for an ssh key
        #[arg(long)]
        passphrase: Option<String>,
        /// Store no secret and skip the prompt
        #[arg(long, conflicts_with = "secret")]
        no_secret: bool,
    },

    /// Edit an identity
    Edit {
        id: RowId,
        #[arg(long)]
        label: Option<String>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        kind: Option<IdentityKind>,
        /// New secret; an empty value clears it
        #[arg(long)]
        secret: Option<String>,
        /// Prompt for a new secret
        #[arg(long, conflicts_with = "secret")]
        prompt_secret: bool,
    },

    /// Delete an identity and drop it from every server
    Rm { id: RowId },

    /// Duplicate an identity with a freshly sealed secret
    Dup { id: RowId },
}

/// Folder subcommands.
#[derive(Subcommand)]
pub enum FolderAction {
    /// Create a folder
    Add {
        #[arg(default_value = crate::core::constants::DEFAULT_FOLDER_NAME)]
        name: String,
        #[arg(long)]
        parent: Option<RowId>,
    },

    /// Rename a folder
    Rename { id: RowId, name: String },

    /// Move a folder; without --parent it moves to the root
    Mv {
        id: RowId,
        #[arg(long)]
        parent: Option<RowId>,
    },

    /// Delete a folder and everything in it
    Rm {
        id: RowId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Server subcommands.
#[derive(Subcommand)]
pub enum ServerAction {
    /// Add a server
    Add {
        name: String,
        address: String,
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long, default_value_t = Protocol::Ssh)]
        protocol: Protocol,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        folder: Option<RowId>,
        /// Identity id; repeat for more, the first is the default
        #[arg(short, long = "identity")]
        identities: Vec<RowId>,
    },

    /// Edit a server
    Edit {
        id: RowId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        protocol: Option<Protocol>,
        #[arg(long)]
        icon: Option<String>,
        /// Replace the identity list; repeat for more
        #[arg(short, long = "identity")]
        identities: Vec<RowId>,
        /// Remove every identity
        #[arg(long, conflicts_with = "identities")]
        clear_identities: bool,
    },

    /// Move a server; without --folder it moves to the root
    Mv {
        id: RowId,
        #[arg(long)]
        folder: Option<RowId>,
    },

    /// Delete a server
    Rm {
        id: RowId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Duplicate a server together with its identities
    Dup { id: RowId },
}

/// Virtualization host subcommands.
#[derive(Subcommand)]
pub enum HostAction {
    /// Import a virtualization host
    Add {
        name: String,
        address: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        port: Option<u16>,
        /// Identity used for the host API
        #[arg(short, long)]
        identity: Option<RowId>,
        #[arg(long)]
        folder: Option<RowId>,
    },

    /// Edit a host
    Edit {
        id: RowId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        identity: Option<RowId>,
        /// Remove the host API identity
        #[arg(long, conflicts_with = "identity")]
        clear_identity: bool,
    },

    /// Move a host; without --folder it moves to the root
    Mv {
        id: RowId,
        #[arg(long)]
        folder: Option<RowId>,
    },

    /// Delete a host and its entries
    Rm { id: RowId },

    /// Show a host's cached entries
    Entries {
        id: RowId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a host's entries with a JSON list
    Sync {
        id: RowId,
        /// JSON file with [{kind, remote_id, name, status}]
        file: PathBuf,
    },

    /// Poll the host for entry statuses
    Refresh { id: RowId },
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a default hangar.toml
    Init,
    /// Show the active configuration
    Show,
}

/// Resolve the config path: `--config`, `HANGAR_CONFIG`, then the user
/// config directory.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}

/// Open the hangar for a command, loading the key from the environment.
///
/// A missing key aborts before anything touches the store.
pub fn open(explicit: Option<&Path>) -> Result<Hangar> {
    let key = MasterKey::from_env()?;
    Hangar::open(&config_path(explicit)?, key)
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let owner = cli.owner;
    let path = cli.config.as_deref();

    match cli.command {
        Command::Identity { action } => identity::execute(&open(path)?, owner, action),
        Command::Folder { action } => folder::execute(&open(path)?, owner, action),
        Command::Server { action } => server::execute(&open(path)?, owner, action),
        Command::Host { action } => host::execute(&open(path)?, owner, action),
        Command::Tree { json } => tree::execute(&open(path)?, owner, json),
        Command::Action {
            reference,
            action: name,
            json,
        } => action::execute(&open(path)?, owner, &reference, &name, json),
        Command::Config { action } => config::execute(path, action),
        Command::Completions { shell } => completions::execute(shell),
    }
}
