//! Seams to the external collaborators.
//!
//! Protocol clients (ssh, telnet, rdp, vnc, sftp) and the virtualization API
//! live outside this crate. The dispatcher talks to them through these traits
//! and hands them credentials that are decrypted just before the call.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::domain::{Credential, EntryKind, PowerAction, PowerState, Protocol, Reference};
use crate::error::{ExternalError, Result};

/// Where a session should go.
#[derive(Debug)]
pub enum SessionTarget {
    /// A plain server, reached directly.
    Server {
        address: String,
        port: u16,
        protocol: Protocol,
    },
    /// A console on a virtualization host entry, reached through the host.
    Entry {
        host: HostAccess,
        kind: EntryKind,
        remote_id: String,
    },
}

/// A request to open an interactive session or a file-transfer channel.
#[derive(Debug)]
pub struct SessionRequest {
    pub reference: Reference,
    pub target: SessionTarget,
    pub credential: Credential,
}

/// Handle for a session opened by a transport client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
}

/// Address and credential for a virtualization host API.
#[derive(Debug)]
pub struct HostAccess {
    pub address: String,
    pub port: u16,
    pub username: String,
    pub credential: Option<Credential>,
}

/// Opens sessions on remote targets.
#[async_trait]
pub trait TransportClient: Send + Sync {
    async fn open_session(&self, request: SessionRequest) -> Result<Session>;

    async fn open_file_transfer(&self, request: SessionRequest) -> Result<Session>;
}

/// Queries and drives a virtualization host.
#[async_trait]
pub trait VirtualizationClient: Send + Sync {
    async fn get_status(&self, host: &HostAccess, kind: EntryKind, remote_id: &str)
        -> Result<PowerState>;

    /// Request a power action. Returns once the host acknowledges the request,
    /// not when the entry reaches its target state.
    async fn issue_action(
        &self,
        host: &HostAccess,
        kind: EntryKind,
        remote_id: &str,
        action: PowerAction,
    ) -> Result<()>;
}

/// Client used when nothing is wired in; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl TransportClient for Unconfigured {
    async fn open_session(&self, _request: SessionRequest) -> Result<Session> {
        Err(ExternalError::NoClient("transport").into())
    }

    async fn open_file_transfer(&self, _request: SessionRequest) -> Result<Session> {
        Err(ExternalError::NoClient("file transfer").into())
    }
}

#[async_trait]
impl VirtualizationClient for Unconfigured {
    async fn get_status(
        &self,
        _host: &HostAccess,
        _kind: EntryKind,
        _remote_id: &str,
    ) -> Result<PowerState> {
        Err(ExternalError::NoClient("virtualization").into())
    }

    async fn issue_action(
        &self,
        _host: &HostAccess,
        _kind: EntryKind,
        _remote_id: &str,
        _action: PowerAction,
    ) -> Result<()> {
        Err(ExternalError::NoClient("virtualization").into())
    }
}
