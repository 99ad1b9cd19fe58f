use std::fmt;
use std::path::{Path, PathBuf};

/// Non-fatal issues met while synchronizing versions.
/// Reported to the operator; the run carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncWarning {
    /// The module document declares a different version than the config document
    VersionMismatch {
        config_path: PathBuf,
        config_version: String,
        module_path: PathBuf,
        module_version: String,
    },
    /// The module document exists but its version cannot be read
    ModuleUnreadable { path: PathBuf, reason: String },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::VersionMismatch {
                config_path,
                config_version,
                module_path,
                module_version,
            } => {
                let config_name = file_name(config_path);
                let module_name = file_name(module_path);
                write!(
                    f,
                    "Version mismatch between {} ({}) and {} ({})",
                    config_name, config_version, module_name, module_version
                )
            }
            SyncWarning::ModuleUnreadable { path, reason } => {
                write!(f, "Skipping {}: {}", path.display(), reason)
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
