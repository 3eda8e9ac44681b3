//! Action dispatch.
//!
//! [`Dispatcher::perform`] resolves a reference, checks the action against the
//! resource's kind and cached state, and routes it to the tree, the vault or
//! an external client. A request that fails its precondition never reaches a
//! client. External calls run without the store lock, are bounded by the
//! configured timeout and are never retried.

mod action;
mod client;

pub use action::{Action, ActionOutcome};
pub use client::{
    HostAccess, Session, SessionRequest, SessionTarget, TransportClient, Unconfigured,
    VirtualizationClient,
};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::constants::DEFAULT_TIMEOUT_SECS;
use crate::core::domain::{
    EntryKind, PowerAction, PowerState, Reference, Resource, Server, VirtualEntry, VirtualHost,
};
use crate::core::tree::Tree;
use crate::core::types::{OwnerId, RowId};
use crate::error::{Error, ExternalError, PreconditionError, Result};

/// Routes actions on resources to the subsystem that carries them out.
#[derive(Clone)]
pub struct Dispatcher {
    tree: Tree,
    transport: Arc<dyn TransportClient>,
    virtualization: Arc<dyn VirtualizationClient>,
    timeout: Duration,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tree", &self.tree)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        tree: Tree,
        transport: Arc<dyn TransportClient>,
        virtualization: Arc<dyn VirtualizationClient>,
    ) -> Self {
        Self {
            tree,
            transport,
            virtualization,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Dispatcher with no external clients; connect and power actions fail
    /// with `ExternalError::NoClient`.
    pub fn unconfigured(tree: Tree) -> Self {
        Self::new(tree, Arc::new(Unconfigured), Arc::new(Unconfigured))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Perform `action` on the resource `reference` names.
    ///
    /// | kind   | connect          | file transfer      | power             | delete | duplicate |
    /// |--------|------------------|--------------------|-------------------|--------|-----------|
    /// | folder | no               | no                 | no                | yes    | no        |
    /// | server | with an identity | with one, over ssh | no                | yes    | yes       |
    /// | host   | no               | no                 | no                | yes    | no        |
    /// | entry  | when running     | no                 | by state, not shell | no   | no        |
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown reference, `PreconditionError`
    /// when the action does not fit the resource, and `ExternalError` when a
    /// client fails or times out. Errors from the tree and vault pass through
    /// unchanged.
    pub async fn perform(
        &self,
        owner: OwnerId,
        reference: &Reference,
        action: Action,
    ) -> Result<ActionOutcome> {
        let resource = self.tree.resolve(owner, reference)?;
        debug!(owner, %reference, %action, kind = resource.kind_name(), "dispatching");

        if let Some(power) = action.power() {
            return match resource {
                Resource::Entry { host, entry } => {
                    self.power(owner, reference, &host, &entry, power).await
                }
                other => Err(unsupported(action, other.kind_name())),
            };
        }

        match (action, resource) {
            (Action::Delete, Resource::Folder(folder)) => {
                let report = self.tree.delete_folder(owner, folder.id)?;
                Ok(ActionOutcome::Deleted { report })
            }
            (Action::Delete, Resource::Server(server)) => {
                let report = self.tree.delete_server(owner, server.id)?;
                Ok(ActionOutcome::Deleted { report })
            }
            (Action::Delete, Resource::Host(host)) => {
                let report = self.tree.delete_host(owner, host.id)?;
                Ok(ActionOutcome::Deleted { report })
            }
            (Action::Duplicate, Resource::Server(server)) => {
                let copy = self.tree.duplicate_server(owner, server.id)?;
                Ok(ActionOutcome::Duplicated {
                    source: server.id,
                    id: copy.id,
                })
            }
            (Action::Connect, Resource::Server(server)) => {
                let request = self.server_session(owner, reference, &server)?;
                let session = self
                    .bounded("open session", self.transport.open_session(request))
                    .await?;
                info!(owner, %reference, session = %session.id, "session opened");
                Ok(ActionOutcome::Connected {
                    reference: reference.clone(),
                    session,
                })
            }
            (Action::OpenFileTransfer, Resource::Server(server)) => {
                if !server.protocol.supports_file_transfer() {
                    return Err(PreconditionError::FileTransferUnsupported {
                        resource: server.name,
                        protocol: server.protocol.to_string(),
                    }
                    .into());
                }
                let request = self.server_session(owner, reference, &server)?;
                let session = self
                    .bounded(
                        "open file transfer",
                        self.transport.open_file_transfer(request),
                    )
                    .await?;
                info!(owner, %reference, session = %session.id, "file transfer opened");
                Ok(ActionOutcome::FileTransferOpened {
                    reference: reference.clone(),
                    session,
                })
            }
            (Action::Connect, Resource::Entry { host, entry }) => {
                let state = entry.status;
                if state != PowerState::Running {
                    return Err(PreconditionError::InvalidState {
                        action: action.to_string(),
                        resource: entry.name,
                        state: state.to_string(),
                    }
                    .into());
                }
                let credential = match host.identity {
                    Some(identity) => self.tree.vault().reveal(owner, identity)?,
                    None => {
                        return Err(PreconditionError::NoIdentities { resource: host.name }.into())
                    }
                };
                let request = SessionRequest {
                    reference: reference.clone(),
                    target: SessionTarget::Entry {
                        host: HostAccess {
                            address: host.address,
                            port: host.port,
                            username: host.username,
                            credential: None,
                        },
                        kind: entry.kind,
                        remote_id: entry.remote_id,
                    },
                    credential,
                };
                let session = self
                    .bounded("open session", self.transport.open_session(request))
                    .await?;
                info!(owner, %reference, session = %session.id, "session opened");
                Ok(ActionOutcome::Connected {
                    reference: reference.clone(),
                    session,
                })
            }
            (action, resource) => Err(unsupported(action, resource.kind_name())),
        }
    }

    /// Poll the host for the status of each entry with power control and
    /// store what it reports.
    ///
    /// # Errors
    ///
    /// Returns `ExternalError` if any poll fails or times out; the cache is
    /// left unchanged in that case.
    pub async fn refresh_status(&self, owner: OwnerId, host_id: RowId) -> Result<VirtualHost> {
        let host = self.tree.host(owner, host_id)?;
        let access = self.host_access(owner, &host)?;

        let mut statuses = Vec::with_capacity(host.entries.len());
        for entry in host.entries.iter().filter(|e| e.kind.has_power_control()) {
            let status = self
                .bounded(
                    "get status",
                    self.virtualization
                        .get_status(&access, entry.kind, &entry.remote_id),
                )
                .await?;
            statuses.push((entry.remote_id.clone(), status));
        }
        drop(access);

        // The entry list may have been re-synced while polling.
        let host = self.tree.apply_statuses(owner, host_id, &statuses)?;
        info!(owner, host = host_id, entries = host.entries.len(), "statuses refreshed");
        Ok(host)
    }

    async fn power(
        &self,
        owner: OwnerId,
        reference: &Reference,
        host: &VirtualHost,
        entry: &VirtualEntry,
        power: PowerAction,
    ) -> Result<ActionOutcome> {
        if !entry.kind.has_power_control() {
            return Err(unsupported(Action::from(power), kind_label(entry.kind)));
        }
        if entry.status != power.requires() {
            return Err(PreconditionError::InvalidState {
                action: power.to_string(),
                resource: entry.name.clone(),
                state: entry.status.to_string(),
            }
            .into());
        }

        let access = self.host_access(owner, host)?;
        self.bounded(
            "power action",
            self.virtualization
                .issue_action(&access, entry.kind, &entry.remote_id, power),
        )
        .await?;

        info!(owner, %reference, action = %power, "power action acknowledged");
        Ok(ActionOutcome::Issued {
            reference: reference.clone(),
            action: power,
            state: power.target(),
        })
    }

    fn server_session(
        &self,
        owner: OwnerId,
        reference: &Reference,
        server: &Server,
    ) -> Result<SessionRequest> {
        let identity = server
            .default_identity()
            .ok_or_else(|| PreconditionError::NoIdentities {
                resource: server.name.clone(),
            })?;
        let credential = self.tree.vault().reveal(owner, identity)?;

        Ok(SessionRequest {
            reference: reference.clone(),
            target: SessionTarget::Server {
                address: server.address.clone(),
                port: server.port,
                protocol: server.protocol,
            },
            credential,
        })
    }

    fn host_access(&self, owner: OwnerId, host: &VirtualHost) -> Result<HostAccess> {
        let credential = host
            .identity
            .map(|identity| self.tree.vault().reveal(owner, identity))
            .transpose()?;
        Ok(HostAccess {
            address: host.address.clone(),
            port: host.port,
            username: host.username.clone(),
            credential,
        })
    }

    /// Await an external call within the dispatch timeout.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(operation, error = %e, "external call failed");
                Err(e)
            }
            Err(_) => {
                warn!(operation, secs = self.timeout.as_secs(), "external call timed out");
                Err(ExternalError::Timeout {
                    operation: operation.to_string(),
                    secs: self.timeout.as_secs(),
                }
                .into())
            }
        }
    }
}

impl From<PowerAction> for Action {
    fn from(power: PowerAction) -> Self {
        match power {
            PowerAction::Start => Action::Start,
            PowerAction::Stop => Action::Stop,
            PowerAction::Shutdown => Action::Shutdown,
        }
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Qemu => "virtual machine",
        EntryKind::Lxc => "container",
        EntryKind::Shell => "node shell",
    }
}

fn unsupported(action: Action, kind: &'static str) -> Error {
    PreconditionError::Unsupported {
        action: action.to_string(),
        kind,
    }
    .into()
}

/// Parse a reference and check it names something the owner can act on.
pub fn parse_reference(tree: &Tree, owner: OwnerId, value: &str) -> Result<(Reference, Resource)> {
    let reference: Reference = value.parse()?;
    let resource = tree.resolve(owner, &reference)?;
    Ok((reference, resource))
}
