#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Formula descriptors for keg
//!
//! A formula is a declarative TOML recipe telling keg how to fetch and
//! install one CLI tool: metadata, a versioned source archive with its
//! SHA-256 digest, an optional development-branch head reference, and the
//! install wiring (dependencies, entry point, launcher command name).
//!
//! The descriptor is plain data. It owns no control flow and no runtime
//! state; it is parsed once per install/test/info invocation.

mod store;

pub use store::FormulaStore;

use keg_errors::{Error, FormulaError};
use keg_hash::Sha256Digest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// A formula descriptor (contents of `formulae/<name>.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    pub formula: FormulaInfo,
    pub source: SourceSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<HeadSpec>,
    pub install: InstallSpec,
}

/// Formula metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaInfo {
    pub name: String,
    pub desc: String,
    pub homepage: String,
    /// SPDX identifier, informational only
    pub license: String,
}

/// Versioned source archive section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub url: String,
    /// Expected SHA-256 of the archive, 64 lowercase hex chars.
    ///
    /// Kept as a string so head installs never have to parse it; archive
    /// installs parse it through [`Formula::archive_digest`].
    pub sha256: String,
}

/// Development-branch head reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadSpec {
    pub url: String,
    pub branch: String,
}

/// Install wiring section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSpec {
    /// Tools that must resolve on PATH before the install procedure runs
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Binary name the delegated installer places under `<libexec>/bin`
    pub entry_point: String,
    /// Launcher name written into the shared `bin` directory
    pub command: String,
}

impl Formula {
    /// The formula name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.formula.name
    }

    /// Parse the declared archive digest
    ///
    /// Only archive installs call this; a head install never reads the
    /// sha256 field, so a placeholder digest does not block it.
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::InvalidDigest` if the field is not a
    /// 64-character hex digest.
    pub fn archive_digest(&self) -> Result<Sha256Digest, Error> {
        Sha256Digest::from_hex(&self.source.sha256).map_err(|e| {
            FormulaError::InvalidDigest {
                name: self.formula.name.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// The head reference, for development-branch installs
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::NoHeadSource` if the formula declares none.
    pub fn head(&self) -> Result<&HeadSpec, Error> {
        self.head.as_ref().ok_or_else(|| {
            FormulaError::NoHeadSource {
                name: self.formula.name.clone(),
            }
            .into()
        })
    }

    /// Load a formula from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or fails validation.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let formula: Self = toml::from_str(content).map_err(|e| FormulaError::InvalidFormula {
            message: e.to_string(),
        })?;
        formula.validate()?;
        Ok(formula)
    }

    /// Load a formula from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the content is invalid.
    pub async fn from_file(path: &Path) -> Result<Self, Error> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| FormulaError::InvalidFormula {
                    message: format!("failed to read formula: {e}"),
                })?;
        Self::from_toml(&content)
    }

    /// Serialize to a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| {
            FormulaError::InvalidFormula {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Validate descriptor fields
    ///
    /// The sha256 value is deliberately not parsed here - see
    /// [`Formula::archive_digest`].
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is empty or malformed.
    pub fn validate(&self) -> Result<(), Error> {
        validate_name(&self.formula.name)?;

        if self.formula.desc.is_empty() {
            return Err(invalid("desc cannot be empty"));
        }

        validate_http_url(&self.formula.homepage, "homepage")?;
        validate_http_url(&self.source.url, "source.url")?;

        if let Some(head) = &self.head {
            // git remotes commonly use https or the git scheme
            let parsed = Url::parse(&head.url)
                .map_err(|e| invalid(format!("head.url is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https" | "git" | "ssh") {
                return Err(invalid(format!(
                    "head.url has unsupported scheme: {}",
                    parsed.scheme()
                )));
            }
            if head.branch.is_empty() {
                return Err(invalid("head.branch cannot be empty"));
            }
        }

        if self.install.entry_point.is_empty() {
            return Err(invalid("install.entry_point cannot be empty"));
        }
        if self.install.command.is_empty() {
            return Err(invalid("install.command cannot be empty"));
        }
        if self.install.dependencies.iter().any(String::is_empty) {
            return Err(invalid("install.dependencies cannot contain empty names"));
        }

        Ok(())
    }
}

/// Check a formula name against the allowed character set
///
/// Names double as filenames and cellar directory names, so the set is
/// restricted to `[a-z0-9._+-]` with a leading alphanumeric.
///
/// # Errors
///
/// Returns `FormulaError::InvalidName` for empty or out-of-set names.
pub fn validate_name(name: &str) -> Result<(), Error> {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let rest_ok = chars.all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '+' | '-')
    });

    if first_ok && rest_ok {
        Ok(())
    } else {
        Err(FormulaError::InvalidName {
            name: name.to_string(),
        }
        .into())
    }
}

fn validate_http_url(url: &str, field: &str) -> Result<(), Error> {
    let parsed =
        Url::parse(url).map_err(|e| invalid(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "{field} has unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    FormulaError::InvalidFormula {
        message: message.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Formula {
        Formula {
            formula: FormulaInfo {
                name: "ai-bot".to_string(),
                desc: "AI Bot Agent".to_string(),
                homepage: "https://github.com/thiennp/cli-smart".to_string(),
                license: "MIT".to_string(),
            },
            source: SourceSpec {
                url: "https://github.com/thiennp/cli-smart/archive/refs/tags/v1.1.0.tar.gz"
                    .to_string(),
                sha256: keg_hash::Sha256Digest::from_data(b"fixture").to_hex(),
            },
            head: Some(HeadSpec {
                url: "https://github.com/thiennp/cli-smart.git".to_string(),
                branch: "main".to_string(),
            }),
            install: InstallSpec {
                dependencies: vec!["python3".to_string()],
                entry_point: "ai-bot".to_string(),
                command: "ai".to_string(),
            },
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let formula = sample();
        let toml = formula.to_toml().unwrap();
        let parsed = Formula::from_toml(&toml).unwrap();
        assert_eq!(parsed.name(), "ai-bot");
        assert_eq!(parsed.install.command, "ai");
        assert_eq!(parsed.head.unwrap().branch, "main");
    }

    #[test]
    fn test_archive_digest_parses_valid_hex() {
        let formula = sample();
        assert_eq!(
            formula.archive_digest().unwrap().to_hex(),
            formula.source.sha256
        );
    }

    #[test]
    fn test_placeholder_digest_fails_lazily() {
        let mut formula = sample();
        formula.source.sha256 = "PLACEHOLDER_SHA256".to_string();
        // The descriptor itself stays valid...
        formula.validate().unwrap();
        // ...but an archive install cannot proceed
        assert!(matches!(
            formula.archive_digest(),
            Err(Error::Formula(FormulaError::InvalidDigest { .. }))
        ));
    }

    #[test]
    fn test_head_accessor() {
        let mut formula = sample();
        assert_eq!(formula.head().unwrap().branch, "main");
        formula.head = None;
        assert!(matches!(
            formula.head(),
            Err(Error::Formula(FormulaError::NoHeadSource { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_desc() {
        let mut formula = sample();
        formula.formula.desc = String::new();
        assert!(formula.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut formula = sample();
        formula.source.url = "ftp://example.com/a.tar.gz".to_string();
        assert!(formula.validate().is_err());

        let mut formula = sample();
        formula.formula.homepage = "nonsense".to_string();
        assert!(formula.validate().is_err());
    }

    #[test]
    fn test_name_charset() {
        assert!(validate_name("ai-bot").is_ok());
        assert!(validate_name("python3.8").is_ok());
        assert!(validate_name("gcc+1").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("-leading-dash").is_err());
        assert!(validate_name("Upper").is_err());
        assert!(validate_name("sp ace").is_err());
        assert!(validate_name("../escape").is_err());
    }
}
