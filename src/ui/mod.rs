//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{BufRead, Write};

use crate::domain::VersionProposal;
use crate::error::{Result, VersionSyncError};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, prompt_line, write_dry_run, write_proposal, write_status, write_success,
    write_warning,
};

/// Prompts the operator for the version to release.
///
/// Shows the current and suggested versions, then reads one line.
/// Blank input keeps the suggestion; anything else is taken verbatim
/// (surrounding whitespace trimmed) without any format validation.
///
/// # Arguments
/// * `input` - Where the operator's line is read from (stdin in the binary)
/// * `out` - Where the prompt is written (stdout in the binary)
/// * `proposal` - Updated in place with the operator's choice
///
/// # Returns
/// * `Ok(())` - The proposal's `chosen` field holds the answer
/// * `Err(Input)` - If input ended before a line was read
pub fn prompt_new_version(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    proposal: &mut VersionProposal,
) -> Result<()> {
    write_proposal(out, proposal)?;
    write!(out, "{}", prompt_line(&proposal.suggested))?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Err(VersionSyncError::input(
            "no version entered (input closed)",
        ));
    }

    proposal.choose(&line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_blank_line_uses_suggestion() {
        let mut proposal = VersionProposal::new("0.1.0");
        let mut input = Cursor::new("\n");
        let mut out = Vec::new();

        prompt_new_version(&mut input, &mut out, &mut proposal).unwrap();
        assert_eq!(proposal.chosen, "0.1.1");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("press Enter to use 0.1.1"));
    }

    #[test]
    fn test_prompt_custom_version() {
        let mut proposal = VersionProposal::new("0.1.0");
        let mut input = Cursor::new("  2.0.0  \n");
        let mut out = Vec::new();

        prompt_new_version(&mut input, &mut out, &mut proposal).unwrap();
        assert_eq!(proposal.chosen, "2.0.0");
    }

    #[test]
    fn test_prompt_reads_only_one_line() {
        let mut proposal = VersionProposal::new("1.2");
        let mut input = Cursor::new("\n9.9.9\n");
        let mut out = Vec::new();

        prompt_new_version(&mut input, &mut out, &mut proposal).unwrap();
        assert_eq!(proposal.chosen, "1.2.1");
    }

    #[test]
    fn test_prompt_accepts_unterminated_last_line() {
        let mut proposal = VersionProposal::new("0.1.0");
        let mut input = Cursor::new("0.5.0");
        let mut out = Vec::new();

        prompt_new_version(&mut input, &mut out, &mut proposal).unwrap();
        assert_eq!(proposal.chosen, "0.5.0");
    }

    #[test]
    fn test_prompt_closed_input_is_an_error() {
        let mut proposal = VersionProposal::new("0.1.0");
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        let err = prompt_new_version(&mut input, &mut out, &mut proposal).unwrap_err();
        assert!(matches!(err, VersionSyncError::Input(_)));
    }
}
