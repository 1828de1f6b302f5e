//! Filesystem layout and install context

use std::path::{Path, PathBuf};

/// Directory layout under the installation prefix
///
/// `cellar/<name>/libexec` is the private per-formula install root; `bin`
/// is the shared directory on the user's search path.
#[derive(Debug, Clone)]
pub struct Layout {
    prefix: PathBuf,
}

impl Layout {
    /// Create a layout rooted at the given prefix
    #[must_use]
    pub fn new(prefix: PathBuf) -> Self {
        Self { prefix }
    }

    /// The installation prefix
    #[must_use]
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Shared executable directory
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.prefix.join("bin")
    }

    /// Cellar root
    #[must_use]
    pub fn cellar_dir(&self) -> PathBuf {
        self.prefix.join("cellar")
    }

    /// A formula's private cellar directory
    #[must_use]
    pub fn keg_dir(&self, name: &str) -> PathBuf {
        self.cellar_dir().join(name)
    }

    /// A formula's private install root
    #[must_use]
    pub fn libexec(&self, name: &str) -> PathBuf {
        self.keg_dir(name).join("libexec")
    }

    /// Path of a launcher script in the shared bin
    #[must_use]
    pub fn launcher(&self, command: &str) -> PathBuf {
        self.bin_dir().join(command)
    }
}

/// Explicit call context for the install and test procedures
///
/// The runtime hands the procedures the paths they are allowed to touch;
/// nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Name of the formula being installed
    pub formula_name: String,
    /// Extracted source tree (cwd for the delegated installer)
    pub source_dir: PathBuf,
    /// Private per-formula install root
    pub libexec: PathBuf,
    /// Shared executable directory
    pub bin: PathBuf,
}

impl InstallContext {
    /// Build the context for a formula from the layout and a staged source
    #[must_use]
    pub fn for_formula(layout: &Layout, name: &str, source_dir: PathBuf) -> Self {
        Self {
            formula_name: name.to_string(),
            source_dir,
            libexec: layout.libexec(name),
            bin: layout.bin_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new(PathBuf::from("/opt/keg"));
        assert_eq!(layout.bin_dir(), PathBuf::from("/opt/keg/bin"));
        assert_eq!(
            layout.libexec("ai-bot"),
            PathBuf::from("/opt/keg/cellar/ai-bot/libexec")
        );
        assert_eq!(layout.launcher("ai"), PathBuf::from("/opt/keg/bin/ai"));
    }

    #[test]
    fn test_context_for_formula() {
        let layout = Layout::new(PathBuf::from("/opt/keg"));
        let ctx = InstallContext::for_formula(&layout, "ai-bot", PathBuf::from("/tmp/src"));
        assert_eq!(ctx.formula_name, "ai-bot");
        assert_eq!(ctx.libexec, PathBuf::from("/opt/keg/cellar/ai-bot/libexec"));
        assert_eq!(ctx.bin, PathBuf::from("/opt/keg/bin"));
        assert_eq!(ctx.source_dir, PathBuf::from("/tmp/src"));
    }
}
