//! Action command.
//!
//! Dispatches one action on a reference. Connect and power actions need
//! external clients; the CLI runs without them and reports so.

use tokio::runtime::{Builder, Runtime};

use crate::cli::{folder::print_report, output};
use crate::core::dispatch::{parse_reference, Action, ActionOutcome};
use crate::core::hangar::Hangar;
use crate::core::types::OwnerId;
use crate::error::{Result, ValidationError};

/// Runtime for the async dispatch calls.
pub fn runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_time().build()?)
}

pub fn execute(
    hangar: &Hangar,
    owner: OwnerId,
    reference: &str,
    action: &str,
    json: bool,
) -> Result<()> {
    let action: Action = action.parse().map_err(|reason| ValidationError::Invalid {
        field: "action",
        reason,
    })?;
    let (reference, _) = parse_reference(hangar.tree(), owner, reference)?;

    let outcome = runtime()?.block_on(hangar.dispatcher().perform(owner, &reference, action))?;

    if json {
        output::data(&serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        ActionOutcome::Connected { reference, session } => {
            output::success(&format!("connected to {} (session {})", reference, session.id));
        }
        ActionOutcome::FileTransferOpened { reference, session } => {
            output::success(&format!(
                "file transfer open on {} (session {})",
                reference, session.id
            ));
        }
        ActionOutcome::Issued {
            reference,
            action,
            state,
        } => {
            output::success(&format!("{} requested for {}", action, reference));
            output::hint(&format!("will be {} once the host completes it", output::state(state)));
        }
        ActionOutcome::Deleted { report } => print_report(&report, false)?,
        ActionOutcome::Duplicated { source, id } => {
            output::success(&format!(
                "duplicated {} as {}",
                output::reference(source),
                output::reference(id)
            ));
        }
    }

    Ok(())
}
