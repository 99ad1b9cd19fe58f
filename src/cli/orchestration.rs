//! Main workflow orchestration logic
//!
//! Runs one synchronization pass:
//! read config -> read module (optional) -> compare -> propose -> prompt ->
//! write both documents, or leave them alone when the version is unchanged.
//! Only a failure to read the config document aborts the run.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, ProjectLayout};
use crate::domain::{AssignmentPattern, DocumentKind, VersionProposal, VersionRecord};
use crate::error::{Result, VersionSyncError};
use crate::ui;
use crate::warning::SyncWarning;

/// Arguments for the synchronization workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic,
/// so the workflow can be driven without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncWorkflowArgs {
    /// Config document (authoritative version)
    pub config_file: PathBuf,

    /// Module document repeating the version
    pub module_file: PathBuf,

    /// Assignment key in the config document
    pub config_key: String,

    /// Assignment key in the module document
    pub module_key: String,

    /// Version chosen up front; skips the prompt
    pub new_version: Option<String>,

    /// Accept the suggested version without prompting
    pub assume_yes: bool,

    /// Preview mode - report what would change, write nothing
    pub dry_run: bool,
}

impl SyncWorkflowArgs {
    /// Interactive run over the documents of `layout` with the keys from `config`
    pub fn from_layout(config: &Config, layout: &ProjectLayout) -> Self {
        SyncWorkflowArgs {
            config_file: layout.config_file.clone(),
            module_file: layout.module_file.clone(),
            config_key: config.keys.config.clone(),
            module_key: config.keys.module.clone(),
            new_version: None,
            assume_yes: false,
            dry_run: false,
        }
    }
}

/// Result of a completed workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Current, suggested and chosen versions
    pub proposal: VersionProposal,

    /// Documents actually rewritten, in write order
    pub written: Vec<PathBuf>,

    /// Non-fatal issues reported during the run
    pub warnings: Vec<SyncWarning>,

    /// Whether this was a preview
    pub dry_run: bool,
}

impl WorkflowResult {
    /// True when the operator kept the current version
    pub fn is_noop(&self) -> bool {
        !self.proposal.is_change()
    }
}

/// Main synchronization workflow
///
/// # Arguments
///
/// * `args` - Document paths, keys and prompt behavior
/// * `input` - Operator input (read at most one line)
/// * `out` - Console output
///
/// # Returns
///
/// * `Ok(WorkflowResult)` - The run completed (including no-op and dry run)
/// * `Err(MissingFile | PatternNotFound)` - The config document could not supply a version
/// * `Err(Input | Io)` - The prompt or a write failed
pub fn run_sync_workflow(
    args: &SyncWorkflowArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<WorkflowResult> {
    let config_pattern = AssignmentPattern::new(args.config_key.as_str())?;
    let module_pattern = AssignmentPattern::new(args.module_key.as_str())?;

    let config_record =
        VersionRecord::read(&args.config_file, DocumentKind::Config, &config_pattern)?;
    let mut warnings = Vec::new();

    let module_record = read_module(&args.module_file, &module_pattern, out, &mut warnings)?;

    if let Some(module) = &module_record {
        if module.version != config_record.version {
            let warning = SyncWarning::VersionMismatch {
                config_path: config_record.path.clone(),
                config_version: config_record.version.clone(),
                module_path: module.path.clone(),
                module_version: module.version.clone(),
            };
            ui::write_warning(out, &warning)?;
            warnings.push(warning);
        }
    }

    let mut proposal = VersionProposal::new(config_record.version.as_str());
    choose_version(args, &mut proposal, input, out)?;
    info!(current = %proposal.current, chosen = %proposal.chosen, "version chosen");

    let mut result = WorkflowResult {
        proposal,
        written: Vec::new(),
        warnings,
        dry_run: args.dry_run,
    };

    if result.is_noop() {
        ui::write_status(
            out,
            &format!("Keeping current version: {}", result.proposal.current),
        )?;
        ui::write_success(out, "Version check complete.")?;
        return Ok(result);
    }

    if args.dry_run {
        let mut files: Vec<&Path> = vec![config_record.path.as_path()];
        if let Some(module) = &module_record {
            if module.version != result.proposal.chosen {
                files.push(module.path.as_path());
            }
        }
        ui::write_dry_run(out, &result.proposal, &files)?;
        return Ok(result);
    }

    ui::write_status(
        out,
        &format!(
            "Updating version from {} to {}...",
            result.proposal.current, result.proposal.chosen
        ),
    )?;

    let chosen = result.proposal.chosen.clone();
    for record in std::iter::once(&config_record).chain(module_record.iter()) {
        if record.apply(&chosen)? {
            ui::write_success(
                out,
                &format!("Updated version in {}", record.path.display()),
            )?;
            result.written.push(record.path.clone());
        } else {
            ui::write_status(
                out,
                &format!("{} already at {}", record.path.display(), chosen),
            )?;
        }
    }

    ui::write_success(out, "Version check complete.")?;
    Ok(result)
}

/// Read the module document; a missing or unreadable one is left out of the run
fn read_module(
    path: &Path,
    pattern: &AssignmentPattern,
    out: &mut dyn Write,
    warnings: &mut Vec<SyncWarning>,
) -> Result<Option<VersionRecord>> {
    match VersionRecord::read(path, DocumentKind::Module, pattern) {
        Ok(record) => Ok(Some(record)),
        Err(VersionSyncError::MissingFile { .. }) => {
            debug!(path = %path.display(), "no module document, skipping it");
            Ok(None)
        }
        Err(e) => {
            let warning = SyncWarning::ModuleUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            ui::write_warning(out, &warning)?;
            warnings.push(warning);
            Ok(None)
        }
    }
}

/// Settle the proposal from `--set`, `--yes` or the interactive prompt
fn choose_version(
    args: &SyncWorkflowArgs,
    proposal: &mut VersionProposal,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    if let Some(version) = &args.new_version {
        ui::write_proposal(out, proposal)?;
        proposal.choose(version);
        ui::write_status(out, &format!("Using version {}", proposal.chosen))?;
        Ok(())
    } else if args.assume_yes {
        ui::write_proposal(out, proposal)?;
        ui::write_status(out, &format!("Using suggested version {}", proposal.chosen))?;
        Ok(())
    } else {
        ui::prompt_new_version(input, out, proposal)
    }
}
