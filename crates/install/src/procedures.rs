//! The formula's two procedures: install and smoke test
//!
//! Both take an explicit context of runtime-provided paths. `install`
//! delegates the real work to pip and wires up the launcher; `smoke_test`
//! invokes the launcher with `--help` and nothing else.

use keg_errors::{Error, InstallError};
use keg_events::{EventEmitter, EventSender, InstallEvent, TestEvent};
use keg_formula::InstallSpec;
use std::path::{Path, PathBuf};

use crate::context::InstallContext;
use crate::launcher::write_launcher;

/// Run the install procedure for a staged source tree
///
/// 1. Preflight: every declared dependency resolves on PATH.
/// 2. Delegate: `python3 -m pip install --prefix <libexec> .` in the
///    source directory, isolating the payload from the system site-packages.
/// 3. Write the launcher into `bin` and mark it executable.
///
/// Returns the launcher path.
///
/// # Errors
///
/// Returns an error if a dependency is missing, pip fails, or a
/// filesystem write fails. Failures are fatal; the caller removes the
/// partially-populated libexec.
pub async fn install(
    ctx: &InstallContext,
    spec: &InstallSpec,
    events: Option<&EventSender>,
) -> Result<PathBuf, Error> {
    for dependency in &spec.dependencies {
        if find_on_path(dependency).is_none() {
            return Err(InstallError::DependencyMissing {
                name: dependency.clone(),
            }
            .into());
        }
    }

    tokio::fs::create_dir_all(&ctx.libexec)
        .await
        .map_err(|e| fs_error("create_libexec", &ctx.libexec, &e))?;

    events.emit(InstallEvent::PipStarted {
        formula: ctx.formula_name.clone(),
        libexec: ctx.libexec.clone(),
    });
    run_pip(ctx).await?;
    events.emit(InstallEvent::PipCompleted {
        formula: ctx.formula_name.clone(),
    });

    tokio::fs::create_dir_all(&ctx.bin)
        .await
        .map_err(|e| fs_error("create_bin", &ctx.bin, &e))?;

    let launcher = ctx.bin.join(&spec.command);
    write_launcher(&launcher, &ctx.libexec, &spec.entry_point).await?;
    events.emit(InstallEvent::LauncherWritten {
        formula: ctx.formula_name.clone(),
        path: launcher.clone(),
    });

    Ok(launcher)
}

/// Run the post-install smoke test
///
/// Invokes `<bin>/<command> --help` and checks the exit status. This is
/// the sole success criterion; a non-success exit is reported as a test
/// failure and the install stays in place.
///
/// # Errors
///
/// Returns `InstallError::SmokeTestFailed` on a non-success exit or if the
/// launcher cannot be executed at all.
pub async fn smoke_test(
    bin: &Path,
    command: &str,
    formula_name: &str,
    events: Option<&EventSender>,
) -> Result<(), Error> {
    let launcher = bin.join(command);

    events.emit(TestEvent::Started {
        formula: formula_name.to_string(),
        command: command.to_string(),
    });

    let status = tokio::process::Command::new(&launcher)
        .arg("--help")
        .output()
        .await
        .map_err(|e| InstallError::SmokeTestFailed {
            command: command.to_string(),
            code: format!("spawn error: {e}"),
        })?
        .status;

    if status.success() {
        events.emit(TestEvent::Passed {
            formula: formula_name.to_string(),
        });
        Ok(())
    } else {
        let code = status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        events.emit(TestEvent::Failed {
            formula: formula_name.to_string(),
            command: command.to_string(),
            error: format!("exit code {code}"),
        });
        Err(InstallError::SmokeTestFailed {
            command: command.to_string(),
            code,
        }
        .into())
    }
}

/// Delegate to pip, installing the source tree into the private prefix
async fn run_pip(ctx: &InstallContext) -> Result<(), Error> {
    let output = tokio::process::Command::new("python3")
        .args(["-m", "pip", "install", "--prefix"])
        .arg(&ctx.libexec)
        .arg(".")
        .current_dir(&ctx.source_dir)
        .output()
        .await
        .map_err(|e| InstallError::PipFailed {
            formula: ctx.formula_name.clone(),
            stderr: format!("failed to execute python3: {e}"),
        })?;

    if !output.status.success() {
        return Err(InstallError::PipFailed {
            formula: ctx.formula_name.clone(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }

    Ok(())
}

/// Resolve an executable name against PATH
fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn fs_error(operation: &str, path: &Path, e: &std::io::Error) -> Error {
    InstallError::FilesystemError {
        operation: operation.to_string(),
        path: path.display().to_string(),
        message: e.to_string(),
    }
    .into()
}
