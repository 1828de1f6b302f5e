//! Installation error types

use std::borrow::Cow;

use thiserror::Error;

use crate::UserFacingError;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstallError {
    #[error("installation failed: {message}")]
    Failed { message: String },

    #[error("missing dependency: {name}")]
    DependencyMissing { name: String },

    #[error("pip install failed for {formula}: {stderr}")]
    PipFailed { formula: String, stderr: String },

    #[error("git clone failed: {message}")]
    GitCloneFailed { message: String },

    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("filesystem operation failed: {operation} on {path}: {message}")]
    FilesystemError {
        operation: String,
        path: String,
        message: String,
    },

    #[error("{formula} is already installed")]
    AlreadyInstalled { formula: String },

    #[error("{formula} is not installed")]
    NotInstalled { formula: String },

    #[error("smoke test failed: `{command} --help` exited with {code}")]
    SmokeTestFailed { command: String, code: String },

    #[error("temporary file error: {message}")]
    TempFileError { message: String },
}

impl UserFacingError for InstallError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            InstallError::DependencyMissing { .. } => {
                Some("Install the missing tool and make sure it is on your PATH.")
            }
            InstallError::AlreadyInstalled { .. } => {
                Some("Pass --force to reinstall over the existing version.")
            }
            InstallError::SmokeTestFailed { .. } => {
                Some("The package is installed but its launcher did not respond to --help.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            InstallError::GitCloneFailed { .. } | InstallError::TempFileError { .. }
        )
    }
}
