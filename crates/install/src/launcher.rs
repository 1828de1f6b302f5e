//! Launcher script generation
//!
//! The launcher is a two-line bash shim in the shared bin directory that
//! re-executes the real entry point inside the formula's libexec,
//! forwarding all arguments verbatim.

use keg_errors::{Error, InstallError};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Permission bits for generated launchers (rwxr-xr-x)
const LAUNCHER_MODE: u32 = 0o755;

/// Render the launcher script body
///
/// Fixed shape; rendering the same inputs twice is byte-identical.
#[must_use]
pub fn render_launcher(libexec: &Path, entry_point: &str) -> String {
    format!(
        "#!/bin/bash\nexec \"{}/bin/{}\" \"$@\"\n",
        libexec.display(),
        entry_point
    )
}

/// Write the launcher script and mark it executable
///
/// # Errors
///
/// Returns an error if the file cannot be written or its permissions
/// cannot be set.
pub async fn write_launcher(
    path: &Path,
    libexec: &Path,
    entry_point: &str,
) -> Result<(), Error> {
    let body = render_launcher(libexec, entry_point);

    tokio::fs::write(path, body)
        .await
        .map_err(|e| fs_error("write_launcher", path, &e))?;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(LAUNCHER_MODE))
        .await
        .map_err(|e| fs_error("chmod_launcher", path, &e))?;

    Ok(())
}

fn fs_error(operation: &str, path: &Path, e: &std::io::Error) -> Error {
    InstallError::FilesystemError {
        operation: operation.to_string(),
        path: path.display().to_string(),
        message: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_launcher_template() {
        let body = render_launcher(&PathBuf::from("/opt/keg/cellar/ai-bot/libexec"), "ai-bot");
        assert_eq!(
            body,
            "#!/bin/bash\nexec \"/opt/keg/cellar/ai-bot/libexec/bin/ai-bot\" \"$@\"\n"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let libexec = PathBuf::from("/opt/keg/cellar/ai-bot/libexec");
        assert_eq!(
            render_launcher(&libexec, "ai-bot"),
            render_launcher(&libexec, "ai-bot")
        );
    }

    #[tokio::test]
    async fn test_write_launcher_sets_mode() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ai");
        let libexec = temp.path().join("libexec");

        write_launcher(&path, &libexec, "ai-bot").await.unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o755);

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("#!/bin/bash\n"));
        assert!(body.ends_with("\"$@\"\n"));
    }

    #[tokio::test]
    async fn test_rewrite_is_byte_identical() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ai");
        let libexec = temp.path().join("libexec");

        write_launcher(&path, &libexec, "ai-bot").await.unwrap();
        let first = std::fs::read(&path).unwrap();

        write_launcher(&path, &libexec, "ai-bot").await.unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
