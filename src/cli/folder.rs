//! Folder commands.

use crate::cli::{output, FolderAction};
use crate::core::domain::DeleteReport;
use crate::core::hangar::Hangar;
use crate::core::types::OwnerId;
use crate::error::Result;

pub fn execute(hangar: &Hangar, owner: OwnerId, action: FolderAction) -> Result<()> {
    let tree = hangar.tree();

    match action {
        FolderAction::Add { name, parent } => {
            let folder = tree.create_folder(owner, parent, &name)?;
            output::success(&format!(
                "created folder {} ({})",
                folder.name,
                output::reference(folder.id)
            ));
        }
        FolderAction::Rename { id, name } => {
            let folder = tree.rename_folder(owner, id, &name)?;
            output::success(&format!("renamed folder to {}", folder.name));
        }
        FolderAction::Mv { id, parent } => {
            tree.move_folder(owner, id, parent)?;
            let target = parent.map_or_else(|| "root".to_string(), |p| p.to_string());
            output::success(&format!(
                "moved folder {} to {}",
                output::reference(id),
                target
            ));
        }
        FolderAction::Rm { id, json } => {
            let report = tree.delete_folder(owner, id)?;
            print_report(&report, json)?;
        }
    }

    Ok(())
}

/// Print what a delete removed.
pub fn print_report(report: &DeleteReport, json: bool) -> Result<()> {
    if json {
        output::data(&serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    output::success(&format!("removed {} records", output::count(report.total())));
    for (label, ids) in [
        ("folders", &report.folders),
        ("servers", &report.servers),
        ("hosts", &report.hosts),
        ("identities", &report.identities),
    ] {
        if !ids.is_empty() {
            let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            output::kv(label, ids.join(", "));
        }
    }
    if report.entries > 0 {
        output::kv("entries", report.entries);
    }
    Ok(())
}
