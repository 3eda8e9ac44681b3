//! Server commands.

use crate::cli::{folder::print_report, output, ServerAction};
use crate::core::domain::{ServerFields, ServerPatch};
use crate::core::hangar::Hangar;
use crate::core::types::OwnerId;
use crate::error::Result;

pub fn execute(hangar: &Hangar, owner: OwnerId, action: ServerAction) -> Result<()> {
    let tree = hangar.tree();

    match action {
        ServerAction::Add {
            name,
            address,
            port,
            protocol,
            icon,
            folder,
            identities,
        } => {
            let server = tree.create_server(
                owner,
                folder,
                ServerFields {
                    name,
                    icon,
                    address,
                    port,
                    protocol,
                    identities,
                },
            )?;
            output::success(&format!(
                "created server {} ({})",
                server,
                output::reference(server.id)
            ));
        }
        ServerAction::Edit {
            id,
            name,
            address,
            port,
            protocol,
            icon,
            identities,
            clear_identities,
        } => {
            let identities = if clear_identities {
                Some(Vec::new())
            } else if identities.is_empty() {
                None
            } else {
                Some(identities)
            };
            let server = tree.edit_server(
                owner,
                id,
                ServerPatch {
                    name,
                    icon: icon.map(|i| Some(i).filter(|i| !i.is_empty())),
                    address,
                    port,
                    protocol,
                    identities,
                },
            )?;
            output::success(&format!("updated server {}", server));
        }
        ServerAction::Mv { id, folder } => {
            tree.move_server(owner, id, folder)?;
            let target = folder.map_or_else(|| "root".to_string(), |f| f.to_string());
            output::success(&format!(
                "moved server {} to {}",
                output::reference(id),
                target
            ));
        }
        ServerAction::Rm { id, json } => {
            let report = tree.delete_server(owner, id)?;
            print_report(&report, json)?;
        }
        ServerAction::Dup { id } => {
            let copy = tree.duplicate_server(owner, id)?;
            output::success(&format!(
                "duplicated server as {} ({}) with {} identities",
                copy.name,
                output::reference(copy.id),
                copy.identities.len()
            ));
        }
    }

    Ok(())
}
