//! Domain types.

mod folder;
mod host;
mod identity;
mod reference;
mod server;
mod snapshot;

pub use folder::Folder;
pub use host::{EntryKind, HostFields, HostPatch, PowerAction, PowerState, VirtualEntry, VirtualHost};
pub use identity::{Credential, Identity, IdentityKind, IdentityPatch, IdentitySummary, NewIdentity};
pub use reference::{CompositeKind, CompositeRef, Reference, Resource};
pub use server::{Protocol, Server, ServerFields, ServerPatch};
pub use snapshot::{DeleteReport, FolderNode, TreeSnapshot};
