//! Tree command.

use crate::cli::output;
use crate::core::domain::{CompositeRef, FolderNode, Server, VirtualHost};
use crate::core::hangar::Hangar;
use crate::core::types::OwnerId;
use crate::error::Result;

/// Print the owner's resource tree.
pub fn execute(hangar: &Hangar, owner: OwnerId, json: bool) -> Result<()> {
    let snapshot = hangar.tree().snapshot(owner)?;

    if json {
        output::data(&serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if snapshot.is_empty() {
        output::dimmed("tree is empty");
        return Ok(());
    }

    for node in &snapshot.folders {
        print_folder(node, 0);
    }
    print_leaves(&snapshot.servers, &snapshot.hosts, 0);
    Ok(())
}

fn print_folder(node: &FolderNode, depth: usize) {
    println!(
        "{}▸ {} {}",
        indent(depth),
        node.folder.name,
        output::faint(node.folder.id)
    );
    for child in &node.folders {
        print_folder(child, depth + 1);
    }
    print_leaves(&node.servers, &node.hosts, depth + 1);
}

fn print_leaves(servers: &[Server], hosts: &[VirtualHost], depth: usize) {
    for server in servers {
        println!(
            "{}{} {} {}",
            indent(depth),
            server.name,
            output::faint(format!("{}://{}:{}", server.protocol, server.address, server.port)),
            output::reference(server.id)
        );
    }
    for host in hosts {
        println!(
            "{}{} {}",
            indent(depth),
            host.name,
            output::reference(CompositeRef::host(host.id))
        );
        for entry in &host.entries {
            println!(
                "{}{} {} {}",
                indent(depth + 1),
                entry.name,
                output::faint(entry.kind),
                output::state(entry.status)
            );
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
