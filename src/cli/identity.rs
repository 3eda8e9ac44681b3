//! Identity commands.
//!
//! Secrets are read from `--secret`, from piped stdin, or from a hidden
//! prompt, in that order. They are never printed.

use std::io::{self, IsTerminal};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::cli::{output, IdentityAction};
use crate::core::domain::{IdentityPatch, IdentitySummary, NewIdentity};
use crate::core::hangar::Hangar;
use crate::core::types::OwnerId;
use crate::error::Result;

pub fn execute(hangar: &Hangar, owner: OwnerId, action: IdentityAction) -> Result<()> {
    let vault = hangar.vault();

    match action {
        IdentityAction::List { json } => {
            let identities = vault.list(owner)?;
            if json {
                output::data(&serde_json::to_string_pretty(&identities)?);
            } else if identities.is_empty() {
                output::dimmed("no identities stored");
            } else {
                output::blank();
                output::header(&format!("{} identities", output::count(identities.len())));
                output::rule();
                for identity in &identities {
                    print_row(identity);
                }
            }
        }
        IdentityAction::Add {
            label,
            username,
            kind,
            secret,
            passphrase,
            no_secret,
        } => {
            let secret = match secret {
                Some(secret) => Zeroizing::new(secret),
                None if no_secret => Zeroizing::default(),
                None => read_secret(&format!("Secret for {}", label))?,
            };
            let identity = vault.create(
                owner,
                NewIdentity {
                    label,
                    username,
                    kind,
                    secret,
                    passphrase: Zeroizing::new(passphrase.unwrap_or_default()),
                },
            )?;
            output::success(&format!(
                "added identity {} ({})",
                identity.label,
                output::reference(identity.id)
            ));
        }
        IdentityAction::Edit {
            id,
            label,
            username,
            kind,
            secret,
            prompt_secret,
        } => {
            let secret = match secret {
                Some(secret) => Some(Zeroizing::new(secret)),
                None if prompt_secret => Some(read_secret("New secret")?),
                None => None,
            };
            let identity = vault.update(
                owner,
                id,
                IdentityPatch {
                    label,
                    username: username.map(|u| Some(u).filter(|u| !u.is_empty())),
                    kind,
                    secret,
                    passphrase: None,
                },
            )?;
            output::success(&format!("updated identity {}", identity.label));
        }
        IdentityAction::Rm { id } => {
            vault.delete(owner, id)?;
            output::success(&format!("removed identity {}", output::reference(id)));
        }
        IdentityAction::Dup { id } => {
            let copy = vault.duplicate(owner, id)?;
            output::success(&format!(
                "duplicated identity as {} ({})",
                copy.label,
                output::reference(copy.id)
            ));
        }
    }

    Ok(())
}

fn print_row(identity: &IdentitySummary) {
    let who = identity.username.as_deref().unwrap_or("-");
    let secret = if identity.has_secret { "sealed" } else { "no secret" };
    println!(
        "  {:>5}  {}  {} {}",
        output::reference(identity.id),
        identity.label,
        output::faint(format!("{}@{}", identity.kind, who)),
        output::faint(secret)
    );
}

/// Read a secret from piped stdin or a hidden prompt.
fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut input = Zeroizing::new(String::new());
        io::stdin().read_line(&mut input)?;
        let trimmed = Zeroizing::new(input.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let value = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    Ok(Zeroizing::new(value))
}
