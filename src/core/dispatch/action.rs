//! Actions and their outcomes.

use serde::Serialize;

use super::Session;
use crate::core::domain::{DeleteReport, PowerAction, PowerState, Reference};
use crate::core::types::RowId;

/// Lifecycle operation requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    OpenFileTransfer,
    Start,
    Stop,
    Shutdown,
    Delete,
    Duplicate,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Connect,
        Action::OpenFileTransfer,
        Action::Start,
        Action::Stop,
        Action::Shutdown,
        Action::Delete,
        Action::Duplicate,
    ];

    /// The power request behind this action, if it is one.
    pub fn power(self) -> Option<PowerAction> {
        match self {
            Action::Start => Some(PowerAction::Start),
            Action::Stop => Some(PowerAction::Stop),
            Action::Shutdown => Some(PowerAction::Shutdown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Connect => "connect",
            Action::OpenFileTransfer => "sftp",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Shutdown => "shutdown",
            Action::Delete => "delete",
            Action::Duplicate => "duplicate",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "connect" | "ssh" => Ok(Action::Connect),
            "sftp" | "file-transfer" | "files" => Ok(Action::OpenFileTransfer),
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            "shutdown" => Ok(Action::Shutdown),
            "delete" | "rm" => Ok(Action::Delete),
            "duplicate" | "dup" => Ok(Action::Duplicate),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// What an action did, with the ids and state callers need to update their
/// own view without reloading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ActionOutcome {
    Connected {
        #[serde(serialize_with = "as_display")]
        reference: Reference,
        session: Session,
    },
    FileTransferOpened {
        #[serde(serialize_with = "as_display")]
        reference: Reference,
        session: Session,
    },
    /// The host acknowledged a power request. `state` is where the entry is
    /// headed; the cached status changes on the next refresh.
    Issued {
        #[serde(serialize_with = "as_display")]
        reference: Reference,
        action: PowerAction,
        state: PowerState,
    },
    Deleted {
        report: DeleteReport,
    },
    Duplicated {
        source: RowId,
        id: RowId,
    },
}

fn as_display<S: serde::Serializer>(
    reference: &Reference,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrips_through_display() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!("DUP".parse::<Action>().unwrap(), Action::Duplicate);
        assert_eq!("file-transfer".parse::<Action>().unwrap(), Action::OpenFileTransfer);
        assert!("reboot".parse::<Action>().is_err());
    }

    #[test]
    fn test_power_mapping() {
        assert_eq!(Action::Shutdown.power(), Some(PowerAction::Shutdown));
        assert_eq!(Action::Connect.power(), None);
        assert_eq!(Action::Delete.power(), None);
    }
}
