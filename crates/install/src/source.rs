//! Source acquisition
//!
//! Archive installs download the formula's versioned tarball, compare its
//! SHA-256 digest against the declared value, and extract it. Head installs
//! clone the development branch instead and skip the checksum entirely.

use keg_errors::{Error, InstallError, NetworkError};
use keg_events::{EventEmitter, EventSender, InstallEvent};
use keg_formula::Formula;
use keg_hash::Sha256Digest;
use keg_net::{download_to_path, NetClient};
use std::path::{Path, PathBuf};

/// The source a given install request resolves to
///
/// Resolution is the single decision point for the head/archive split: the
/// digest is parsed here for archives and never consulted for heads.
#[derive(Debug, Clone)]
pub enum ResolvedSource {
    Archive { url: String, digest: Sha256Digest },
    Head { url: String, branch: String },
}

/// Resolve the source for a formula
///
/// # Errors
///
/// Returns an error if a head install is requested but the formula has no
/// head section, or if an archive install is requested and the declared
/// digest is malformed (including the upstream placeholder case).
pub fn resolve_source(formula: &Formula, head: bool) -> Result<ResolvedSource, Error> {
    if head {
        let spec = formula.head()?;
        Ok(ResolvedSource::Head {
            url: spec.url.clone(),
            branch: spec.branch.clone(),
        })
    } else {
        Ok(ResolvedSource::Archive {
            url: formula.source.url.clone(),
            digest: formula.archive_digest()?,
        })
    }
}

/// Verify a downloaded archive against its expected digest
///
/// On mismatch the corrupt download is deleted and the install aborts;
/// nothing has been written under libexec or bin at this point.
///
/// # Errors
///
/// Returns `NetworkError::ChecksumMismatch` if the digests differ, or an
/// I/O error if the file cannot be read.
pub async fn verify_archive(path: &Path, expected: &Sha256Digest) -> Result<(), Error> {
    let actual = Sha256Digest::hash_file(path).await?;
    if actual != *expected {
        tokio::fs::remove_file(path).await.ok();
        return Err(NetworkError::ChecksumMismatch {
            expected: expected.to_hex(),
            actual: actual.to_hex(),
        }
        .into());
    }
    Ok(())
}

/// Extract a gzipped tarball into `dest`, stripping the single top-level
/// directory that release tarballs wrap their contents in
///
/// # Errors
///
/// Returns an error if decompression or unpacking fails.
pub async fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<(), Error> {
    use async_compression::tokio::bufread::GzipDecoder;
    use tokio::io::{AsyncWriteExt, BufReader};

    // Decompress to a temporary tar file first
    let temp_dir = tempfile::tempdir().map_err(|e| InstallError::TempFileError {
        message: format!("failed to create temp directory: {e}"),
    })?;
    let tar_path = temp_dir.path().join("archive.tar");

    {
        let input = tokio::fs::File::open(archive)
            .await
            .map_err(|e| extraction_error(format!("failed to open archive: {e}")))?;
        let mut output = tokio::fs::File::create(&tar_path)
            .await
            .map_err(|e| extraction_error(format!("failed to create temp file: {e}")))?;

        let mut decoder = GzipDecoder::new(BufReader::new(input));
        tokio::io::copy(&mut decoder, &mut output)
            .await
            .map_err(|e| extraction_error(format!("failed to decompress archive: {e}")))?;
        output
            .flush()
            .await
            .map_err(|e| extraction_error(format!("failed to flush temp file: {e}")))?;
    }

    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        use std::fs::File;
        use tar::Archive;

        let tar = File::open(&tar_path)
            .map_err(|e| extraction_error(format!("failed to open decompressed file: {e}")))?;
        let mut archive = Archive::new(tar);

        // Strip the first path component (cli-smart-1.1.0/... -> ...)
        for entry in archive
            .entries()
            .map_err(|e| extraction_error(format!("failed to read archive: {e}")))?
        {
            let mut entry =
                entry.map_err(|e| extraction_error(format!("failed to read entry: {e}")))?;
            let path = entry
                .path()
                .map_err(|e| extraction_error(format!("invalid entry path: {e}")))?;

            let components: Vec<_> = path.components().collect();
            if components.len() <= 1 {
                continue;
            }

            let stripped = components[1..].iter().collect::<PathBuf>();
            let dest_path = dest.join(&stripped);

            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    extraction_error(format!("failed to create parent directory: {e}"))
                })?;
            }

            entry
                .unpack(&dest_path)
                .map_err(|e| extraction_error(format!("failed to unpack entry: {e}")))?;
        }

        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| extraction_error(format!("task join error: {e}")))?
}

/// Shallow-clone a development branch into `dest`
///
/// # Errors
///
/// Returns an error if git cannot be spawned or the clone fails.
pub async fn clone_head(url: &str, branch: &str, dest: &Path) -> Result<(), Error> {
    let output = tokio::process::Command::new("git")
        .args([
            "clone",
            "--depth",
            "1",
            "--branch",
            branch,
            url,
            &dest.display().to_string(),
        ])
        .output()
        .await
        .map_err(|e| InstallError::GitCloneFailed {
            message: format!("failed to execute git: {e}"),
        })?;

    if !output.status.success() {
        return Err(InstallError::GitCloneFailed {
            message: format!(
                "failed to clone {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr)
            ),
        }
        .into());
    }

    Ok(())
}

/// Stage the resolved source into `source_dir`
///
/// Downloads and verifies the archive, or clones the head ref. Emits
/// install events along the way.
///
/// # Errors
///
/// Propagates download, checksum, extraction, and clone failures.
pub async fn stage_source(
    client: &NetClient,
    formula: &Formula,
    resolved: &ResolvedSource,
    staging: &Path,
    source_dir: &Path,
    events: Option<&EventSender>,
) -> Result<(), Error> {
    tokio::fs::create_dir_all(source_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, source_dir))?;

    match resolved {
        ResolvedSource::Archive { url, digest } => {
            let file_name = url.rsplit('/').next().unwrap_or("source.tar.gz");
            let archive_path = staging.join(file_name);

            download_to_path(client, url, &archive_path, events).await?;
            verify_archive(&archive_path, digest).await?;
            events.emit(InstallEvent::SourceVerified {
                formula: formula.name().to_string(),
                sha256: digest.to_hex(),
            });

            extract_tar_gz(&archive_path, source_dir).await?;
        }
        ResolvedSource::Head { url, branch } => {
            // Checksum check is skipped for head installs
            clone_head(url, branch, source_dir).await?;
        }
    }

    events.emit(InstallEvent::SourceStaged {
        formula: formula.name().to_string(),
        source_dir: source_dir.to_path_buf(),
    });

    Ok(())
}

fn extraction_error(message: String) -> Error {
    InstallError::ExtractionFailed { message }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_formula(sha256: &str) -> Formula {
        let toml = format!(
            r#"
[formula]
name = "ai-bot"
desc = "AI Bot Agent"
homepage = "https://example.com"
license = "MIT"

[source]
url = "https://example.com/ai-bot-1.1.0.tar.gz"
sha256 = "{sha256}"

[head]
url = "https://example.com/ai-bot.git"
branch = "main"

[install]
dependencies = []
entry_point = "ai-bot"
command = "ai"
"#
        );
        Formula::from_toml(&toml).unwrap()
    }

    #[test]
    fn test_resolve_archive_parses_digest() {
        let digest = Sha256Digest::from_data(b"fixture");
        let formula = sample_formula(&digest.to_hex());

        match resolve_source(&formula, false).unwrap() {
            ResolvedSource::Archive { url, digest: d } => {
                assert_eq!(url, "https://example.com/ai-bot-1.1.0.tar.gz");
                assert_eq!(d, digest);
            }
            ResolvedSource::Head { .. } => panic!("expected archive"),
        }
    }

    #[test]
    fn test_resolve_archive_rejects_placeholder_digest() {
        let formula = sample_formula("PLACEHOLDER_SHA256");
        assert!(resolve_source(&formula, false).is_err());
    }

    #[test]
    fn test_resolve_head_skips_digest() {
        // Placeholder digest must not block a head install
        let formula = sample_formula("PLACEHOLDER_SHA256");
        match resolve_source(&formula, true).unwrap() {
            ResolvedSource::Head { url, branch } => {
                assert_eq!(url, "https://example.com/ai-bot.git");
                assert_eq!(branch, "main");
            }
            ResolvedSource::Archive { .. } => panic!("expected head"),
        }
    }

    #[tokio::test]
    async fn test_verify_archive_mismatch_deletes_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.tar.gz");
        tokio::fs::write(&path, b"corrupt bytes").await.unwrap();

        let expected = Sha256Digest::from_data(b"something else");
        let err = verify_archive(&path, &expected).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::ChecksumMismatch { .. })
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_verify_archive_match() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.tar.gz");
        tokio::fs::write(&path, b"good bytes").await.unwrap();

        let expected = Sha256Digest::from_data(b"good bytes");
        verify_archive(&path, &expected).await.unwrap();
        assert!(path.exists());
    }
}
