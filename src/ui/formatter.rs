//! Pure formatting functions for UI output.
//!
//! Everything except [`display_error`] writes to a caller-supplied writer so the
//! synchronization workflow can be driven against an in-memory buffer.

use std::io::{self, Write};
use std::path::Path;

use console::style;

use crate::domain::VersionProposal;
use crate::warning::SyncWarning;

/// Format and print an error message in red on stderr.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Write a success message with green checkmark.
pub fn write_success(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("✓").green(), message)
}

/// Write a status message with yellow arrow.
pub fn write_status(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("→").yellow(), message)
}

/// Write a non-fatal warning.
pub fn write_warning(out: &mut dyn Write, warning: &SyncWarning) -> io::Result<()> {
    writeln!(out, "{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// Show the version read from the config document and the suggested successor.
pub fn write_proposal(out: &mut dyn Write, proposal: &VersionProposal) -> io::Result<()> {
    writeln!(out, "Current version: {}", style(&proposal.current).red())?;
    writeln!(
        out,
        "Suggested new version: {}",
        style(&proposal.suggested).green()
    )
}

/// The line shown while waiting for operator input (no trailing newline).
pub fn prompt_line(suggested: &str) -> String {
    format!("Enter new version [press Enter to use {}]: ", suggested)
}

/// List what a dry run would have written.
///
/// # Arguments
/// * `proposal` - The settled proposal
/// * `files` - Documents that would be rewritten
pub fn write_dry_run(
    out: &mut dyn Write,
    proposal: &VersionProposal,
    files: &[&Path],
) -> io::Result<()> {
    write_status(out, "Dry run:")?;
    writeln!(
        out,
        "  Would update version from {} to {}",
        proposal.current, proposal.chosen
    )?;
    for file in files {
        writeln!(out, "  Would rewrite {}", file.display())?;
    }
    Ok(())
}
