//! Installation domain events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Installation domain events - maps to the install crate and `keg install`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    /// Installation started for a formula
    Started { formula: String, head: bool },

    /// Source archive verified against the formula digest
    SourceVerified { formula: String, sha256: String },

    /// Source tree staged (extracted archive or head clone)
    SourceStaged {
        formula: String,
        source_dir: PathBuf,
    },

    /// Delegated installer started (pip into libexec)
    PipStarted { formula: String, libexec: PathBuf },

    /// Delegated installer finished
    PipCompleted { formula: String },

    /// Launcher script written into bin
    LauncherWritten { formula: String, path: PathBuf },

    /// Installation completed successfully
    Completed { formula: String, libexec: PathBuf },

    /// Installation failed
    Failed { formula: String, error: String },

    /// Existing install removed before a forced reinstall
    ReplacingExisting { formula: String },

    /// Formula uninstalled
    Uninstalled { formula: String },
}
