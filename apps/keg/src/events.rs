//! Event rendering for the terminal

use console::style;
use keg_events::{AppEvent, DownloadEvent, GeneralEvent, InstallEvent, TestEvent};
use tracing::debug;

/// Renders events as terminal output lines
pub struct EventHandler {
    colors: bool,
}

impl EventHandler {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Handle a single event
    pub fn handle(&self, event: &AppEvent) {
        debug!(?event, "event received");
        match event {
            AppEvent::Download(event) => self.handle_download(event),
            AppEvent::Install(event) => self.handle_install(event),
            AppEvent::Test(event) => self.handle_test(event),
            AppEvent::General(event) => self.handle_general(event),
        }
    }

    fn handle_download(&self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started { url, .. } => {
                println!("{} {url}", self.arrow());
            }
            DownloadEvent::Retrying {
                attempt,
                max_attempts,
                reason,
                ..
            } => {
                println!("  retrying ({attempt}/{max_attempts}): {reason}");
            }
            DownloadEvent::Completed {
                bytes_downloaded, ..
            } => {
                println!("  downloaded {bytes_downloaded} bytes");
            }
            DownloadEvent::Failed { error, .. } => {
                eprintln!("{} download failed: {error}", self.cross());
            }
            DownloadEvent::Progress { .. } => {}
        }
    }

    fn handle_install(&self, event: &InstallEvent) {
        match event {
            InstallEvent::Started { formula, head } => {
                let suffix = if *head { " (head)" } else { "" };
                println!("{} Installing {formula}{suffix}", self.arrow());
            }
            InstallEvent::SourceVerified { sha256, .. } => {
                println!("  verified sha256 {sha256}");
            }
            InstallEvent::SourceStaged { .. } => {}
            InstallEvent::PipStarted { libexec, .. } => {
                println!("  pip install --prefix {}", libexec.display());
            }
            InstallEvent::PipCompleted { .. } => {}
            InstallEvent::LauncherWritten { path, .. } => {
                println!("  launcher {}", path.display());
            }
            InstallEvent::Completed { formula, .. } => {
                println!("{} Installed {formula}", self.check());
            }
            InstallEvent::Failed { formula, error } => {
                eprintln!("{} Install of {formula} failed: {error}", self.cross());
            }
            InstallEvent::ReplacingExisting { formula } => {
                println!("  replacing existing install of {formula}");
            }
            InstallEvent::Uninstalled { formula } => {
                println!("{} Uninstalled {formula}", self.check());
            }
        }
    }

    fn handle_test(&self, event: &TestEvent) {
        match event {
            TestEvent::Started { command, .. } => {
                println!("{} Testing `{command} --help`", self.arrow());
            }
            TestEvent::Passed { formula } => {
                println!("{} {formula} test passed", self.check());
            }
            TestEvent::Failed { formula, error, .. } => {
                eprintln!("{} {formula} test failed: {error}", self.cross());
            }
        }
    }

    fn handle_general(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Message { text } => println!("{text}"),
            GeneralEvent::Warning { text } => {
                eprintln!("{} {text}", self.warn());
            }
        }
    }

    fn arrow(&self) -> String {
        self.paint("==>", |s| style(s).cyan().bold().to_string())
    }

    fn check(&self) -> String {
        self.paint("ok:", |s| style(s).green().bold().to_string())
    }

    fn cross(&self) -> String {
        self.paint("error:", |s| style(s).red().bold().to_string())
    }

    fn warn(&self) -> String {
        self.paint("warning:", |s| style(s).yellow().bold().to_string())
    }

    fn paint(&self, text: &str, f: impl Fn(&str) -> String) -> String {
        if self.colors {
            f(text)
        } else {
            text.to_string()
        }
    }
}
