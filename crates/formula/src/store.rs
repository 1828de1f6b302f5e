//! Formula directory lookup

use keg_errors::{Error, FormulaError};
use std::path::{Path, PathBuf};

use crate::{validate_name, Formula};

/// Resolves formula names to descriptor files in a formulae directory
///
/// One file per formula, `<dir>/<name>.toml`; name uniqueness falls out of
/// the filesystem.
#[derive(Debug, Clone)]
pub struct FormulaStore {
    dir: PathBuf,
}

impl FormulaStore {
    /// Create a store over a formulae directory
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory this store reads from
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the descriptor file for a formula name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is outside the allowed character set.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, Error> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.toml")))
    }

    /// Load and validate a formula by name
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::NotFound` if no descriptor file exists, or a
    /// parse/validation error for a malformed one.
    pub async fn load(&self, name: &str) -> Result<Formula, Error> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(FormulaError::NotFound {
                name: name.to_string(),
            }
            .into());
        }
        let formula = Formula::from_file(&path).await?;
        if formula.name() != name {
            return Err(FormulaError::InvalidFormula {
                message: format!(
                    "formula file {} declares name {}",
                    path.display(),
                    formula.name()
                ),
            }
            .into());
        }
        Ok(formula)
    }

    /// Names of all formulae present in the directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &self.dir))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
