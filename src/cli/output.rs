//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks, running
//! - Red: errors, stopped
//! - Yellow: warnings
//! - Cyan: references, paths, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info

use console::{style, StyledObject};
use std::fmt::Display;

use crate::core::domain::PowerState;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

fn styled<D>(value: D) -> StyledObject<D> {
    let styled = style(value);
    if colors_enabled() {
        styled
    } else {
        styled.force_styling(false)
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ created server web`
pub fn success(msg: &str) {
    println!("{} {}", styled("✓").green(), msg);
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    eprintln!("{} {}", styled("✗").red(), msg);
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    println!("{} {}", styled("⚠").yellow(), msg);
}

/// Print a hint message (cyan) to stderr.
///
/// Example: `→ run: hangar config init`
pub fn hint(msg: &str) {
    eprintln!("{} {}", styled("→").cyan(), styled(msg).cyan());
}

/// Print a bold section header.
pub fn header(title: &str) {
    println!("{}", styled(title).bold());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  address  10.0.0.1`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", styled(format!("{:<10}", label)).dim(), styled(value).bold());
}

/// Print a horizontal rule separator.
pub fn rule() {
    println!("{}", styled("─".repeat(RULE_WIDTH)).dim());
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    println!("{}", styled(msg).dim());
}

/// Print an empty line.
pub fn blank() {
    println!();
}

/// Print machine-readable data as is.
pub fn data(msg: &str) {
    println!("{}", msg);
}

/// Format a count in bold green.
pub fn count(n: usize) -> String {
    styled(n).green().bold().to_string()
}

/// Format a reference or id in cyan.
pub fn reference(r: impl Display) -> String {
    styled(r).cyan().to_string()
}

/// Format a path in cyan.
pub fn path(p: &std::path::Path) -> String {
    styled(p.display()).cyan().to_string()
}

/// Format a power state: running green, stopped red.
pub fn state(state: PowerState) -> String {
    match state {
        PowerState::Running => styled(state).green().to_string(),
        PowerState::Stopped => styled(state).red().to_string(),
    }
}

/// Format secondary text inline.
pub fn faint(text: impl Display) -> String {
    styled(text).dim().to_string()
}
