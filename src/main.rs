use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use version_sync::cli::{run_sync_workflow, SyncWorkflowArgs};
use version_sync::config::{self, Config, CONFIG_FILE_NAME};
use version_sync::{logging, ui, VersionSyncError};

#[derive(clap::Parser)]
#[command(
    name = "version-sync",
    about = "Keep the version in pyproject.toml and the package __init__.py in step"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Project root (default: nearest directory holding the config document)"
    )]
    root: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Config document path (pyproject.toml)")]
    config_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Module document path (__init__.py)")]
    module_file: Option<PathBuf>,

    #[arg(long, value_name = "VERSION", help = "Release this version instead of prompting")]
    set: Option<String>,

    #[arg(
        short = 'y',
        long,
        conflicts_with = "set",
        help = "Accept the suggested version without prompting"
    )]
    yes: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("version-sync {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init_tracing(args.verbose);

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    // A custom config may rename the config document, which decides where the root is
    let custom_config = match args.config.as_deref() {
        Some(path) => Some(config::load_config(Some(path), &cwd).unwrap_or_else(|e| fail(&e))),
        None => None,
    };

    let root = match &args.root {
        Some(root) => root.clone(),
        None => discover_root(&cwd, custom_config.as_ref()),
    };

    let config = match custom_config {
        Some(cfg) => cfg,
        None => config::load_config(None, &root).unwrap_or_else(|e| fail(&e)),
    };

    let layout = config.layout(&root);
    let mut workflow_args = SyncWorkflowArgs::from_layout(&config, &layout);
    if let Some(path) = args.config_file {
        workflow_args.config_file = path;
    }
    if let Some(path) = args.module_file {
        workflow_args.module_file = path;
    }
    workflow_args.new_version = args.set;
    workflow_args.assume_yes = args.yes;
    workflow_args.dry_run = args.dry_run;

    debug!(
        root = %layout.root.display(),
        config_file = %workflow_args.config_file.display(),
        module_file = %workflow_args.module_file.display(),
        "resolved project layout"
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run_sync_workflow(&workflow_args, &mut input, &mut out) {
        Ok(result) => {
            debug!(
                written = result.written.len(),
                warnings = result.warnings.len(),
                dry_run = result.dry_run,
                "synchronization finished"
            );
            Ok(())
        }
        Err(e) => {
            out.flush()?;
            fail(&e)
        }
    }
}

/// Nearest ancestor of `cwd` holding the tool config or the config document, else `cwd`
fn discover_root(cwd: &Path, config: Option<&Config>) -> PathBuf {
    let default_config = Config::default();
    let config_document = &config.unwrap_or(&default_config).files.config;
    let markers = [Path::new(CONFIG_FILE_NAME), config_document.as_path()];

    config::find_project_root(cwd, &markers).unwrap_or_else(|| cwd.to_path_buf())
}

fn fail(err: &VersionSyncError) -> ! {
    ui::display_error(&err.to_string());
    process::exit(1);
}
