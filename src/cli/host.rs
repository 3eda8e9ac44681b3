//! Virtualization host commands.

use std::path::Path;

use crate::cli::{action::runtime, folder::print_report, output, HostAction};
use crate::core::domain::{CompositeRef, HostFields, HostPatch, VirtualEntry, VirtualHost};
use crate::core::hangar::Hangar;
use crate::core::types::OwnerId;
use crate::error::{Result, ValidationError};

pub fn execute(hangar: &Hangar, owner: OwnerId, action: HostAction) -> Result<()> {
    let tree = hangar.tree();

    match action {
        HostAction::Add {
            name,
            address,
            username,
            port,
            identity,
            folder,
        } => {
            let host = tree.create_host(
                owner,
                folder,
                HostFields {
                    name,
                    address,
                    port,
                    username,
                    identity,
                },
            )?;
            output::success(&format!(
                "imported host {} ({})",
                host.name,
                output::reference(CompositeRef::host(host.id))
            ));
        }
        HostAction::Edit {
            id,
            name,
            address,
            port,
            username,
            identity,
            clear_identity,
        } => {
            let identity = if clear_identity {
                Some(None)
            } else {
                identity.map(Some)
            };
            let host = tree.edit_host(
                owner,
                id,
                HostPatch {
                    name,
                    address,
                    port,
                    username,
                    identity,
                },
            )?;
            output::success(&format!("updated host {}", host.name));
        }
        HostAction::Mv { id, folder } => {
            let host = tree.move_host(owner, id, folder)?;
            let target = folder.map_or_else(|| "root".to_string(), |f| f.to_string());
            output::success(&format!(
                "moved host {} to {}",
                output::reference(CompositeRef::host(host.id)),
                target
            ));
        }
        HostAction::Rm { id } => {
            let report = tree.delete_host(owner, id)?;
            print_report(&report, false)?;
        }
        HostAction::Entries { id, json } => {
            let host = tree.host(owner, id)?;
            if json {
                output::data(&serde_json::to_string_pretty(&host.entries)?);
            } else {
                print_entries(&host);
            }
        }
        HostAction::Sync { id, file } => {
            let entries = read_entries(&file)?;
            let host = tree.sync_entries(owner, id, entries)?;
            output::success(&format!(
                "synced {} entries on {}",
                output::count(host.entries.len()),
                host.name
            ));
        }
        HostAction::Refresh { id } => {
            let host = runtime()?.block_on(hangar.dispatcher().refresh_status(owner, id))?;
            print_entries(&host);
        }
    }

    Ok(())
}

fn print_entries(host: &VirtualHost) {
    if host.entries.is_empty() {
        output::dimmed(&format!("{} has no entries", host.name));
        return;
    }

    output::blank();
    output::header(&format!("{} entries on {}", output::count(host.entries.len()), host.name));
    output::rule();
    for entry in &host.entries {
        let reference = CompositeRef::entry(host.id, &entry.remote_id)
            .map(|r| r.to_string())
            .unwrap_or_else(|_| entry.remote_id.clone());
        println!(
            "  {}  {}  {} {}",
            output::reference(reference),
            entry.name,
            output::faint(entry.kind),
            output::state(entry.status)
        );
    }
}

fn read_entries(path: &Path) -> Result<Vec<VirtualEntry>> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        ValidationError::Invalid {
            field: "entries",
            reason: format!("{}: {}", path.display(), e),
        }
        .into()
    })
}
