//! Install pipeline orchestration

use keg_errors::{Error, InstallError};
use keg_events::{EventEmitter, EventSender, InstallEvent};
use keg_formula::Formula;
use keg_net::NetClient;
use std::path::PathBuf;

use crate::context::{InstallContext, Layout};
use crate::procedures;
use crate::source::{resolve_source, stage_source};

/// Options for a single install request
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Install from the development branch instead of the release archive
    pub head: bool,
    /// Replace an existing install
    pub force: bool,
}

/// Outcome of a completed install
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub formula: String,
    pub libexec: PathBuf,
    pub launcher: PathBuf,
    pub head: bool,
}

/// Drives the not-installed -> installing -> installed sequence
///
/// The smoke test is a separate step so a failing test reports as a test
/// failure while the install itself stays in place.
pub struct Installer {
    layout: Layout,
    net: NetClient,
    events: Option<EventSender>,
}

impl EventEmitter for Installer {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

impl Installer {
    /// Create an installer over a layout and network client
    #[must_use]
    pub fn new(layout: Layout, net: NetClient) -> Self {
        Self {
            layout,
            net,
            events: None,
        }
    }

    /// Attach an event channel
    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// The layout this installer operates on
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether a formula currently has a cellar directory
    #[must_use]
    pub fn is_installed(&self, formula: &Formula) -> bool {
        self.layout.keg_dir(formula.name()).exists()
    }

    /// Install a formula
    ///
    /// Acquires the source (verified archive, or head clone with the
    /// checksum skipped), runs the install procedure, and cleans up the
    /// cellar directory if that procedure fails partway.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid digest, a failed download or
    /// checksum, a missing dependency, a pip failure, or when the formula
    /// is already installed and `force` is not set.
    pub async fn install(
        &self,
        formula: &Formula,
        opts: &InstallOptions,
    ) -> Result<InstallReport, Error> {
        let name = formula.name().to_string();
        self.emit(InstallEvent::Started {
            formula: name.clone(),
            head: opts.head,
        });

        // Resolve first: a malformed digest must fail before anything else
        let resolved = resolve_source(formula, opts.head)?;

        let keg_dir = self.layout.keg_dir(&name);
        if keg_dir.exists() {
            if opts.force {
                self.emit(InstallEvent::ReplacingExisting {
                    formula: name.clone(),
                });
                tokio::fs::remove_dir_all(&keg_dir)
                    .await
                    .map_err(|e| Error::io_with_path(&e, &keg_dir))?;
            } else {
                return Err(InstallError::AlreadyInstalled { formula: name }.into());
            }
        }

        let staging = tempfile::tempdir().map_err(|e| InstallError::TempFileError {
            message: format!("failed to create staging directory: {e}"),
        })?;
        let source_dir = staging.path().join("src");

        stage_source(
            &self.net,
            formula,
            &resolved,
            staging.path(),
            &source_dir,
            self.events.as_ref(),
        )
        .await?;

        let ctx = InstallContext::for_formula(&self.layout, &name, source_dir);
        let result = procedures::install(&ctx, &formula.install, self.events.as_ref()).await;

        match result {
            Ok(launcher) => {
                self.emit(InstallEvent::Completed {
                    formula: name.clone(),
                    libexec: ctx.libexec.clone(),
                });
                Ok(InstallReport {
                    formula: name,
                    libexec: ctx.libexec,
                    launcher,
                    head: opts.head,
                })
            }
            Err(e) => {
                // No partial installs: drop whatever pip managed to write
                tokio::fs::remove_dir_all(&keg_dir).await.ok();
                self.emit(InstallEvent::Failed {
                    formula: name,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Run the post-install smoke test for an installed formula
    ///
    /// # Errors
    ///
    /// Returns `NotInstalled` if the launcher is absent, or
    /// `SmokeTestFailed` on a non-success exit. The install is never
    /// removed on failure.
    pub async fn smoke_test(&self, formula: &Formula) -> Result<(), Error> {
        let launcher = self.layout.launcher(&formula.install.command);
        if !launcher.exists() {
            return Err(InstallError::NotInstalled {
                formula: formula.name().to_string(),
            }
            .into());
        }

        procedures::smoke_test(
            &self.layout.bin_dir(),
            &formula.install.command,
            formula.name(),
            self.events.as_ref(),
        )
        .await
    }

    /// Remove a formula's cellar directory and launcher
    ///
    /// # Errors
    ///
    /// Returns `NotInstalled` if neither exists.
    pub async fn uninstall(&self, formula: &Formula) -> Result<(), Error> {
        let name = formula.name().to_string();
        let keg_dir = self.layout.keg_dir(&name);
        let launcher = self.layout.launcher(&formula.install.command);

        if !keg_dir.exists() && !launcher.exists() {
            return Err(InstallError::NotInstalled { formula: name }.into());
        }

        if keg_dir.exists() {
            tokio::fs::remove_dir_all(&keg_dir)
                .await
                .map_err(|e| Error::io_with_path(&e, &keg_dir))?;
        }
        if launcher.exists() {
            tokio::fs::remove_file(&launcher)
                .await
                .map_err(|e| Error::io_with_path(&e, &launcher))?;
        }

        self.emit(InstallEvent::Uninstalled { formula: name });
        Ok(())
    }

    /// Names of formulae with a cellar directory
    ///
    /// # Errors
    ///
    /// Returns an error if the cellar exists but cannot be read.
    pub async fn list_installed(&self) -> Result<Vec<String>, Error> {
        let cellar = self.layout.cellar_dir();
        if !cellar.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&cellar)
            .await
            .map_err(|e| Error::io_with_path(&e, &cellar))?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
