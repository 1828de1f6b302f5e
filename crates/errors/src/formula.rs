//! Formula descriptor error types

use std::borrow::Cow;

use thiserror::Error;

use crate::UserFacingError;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaError {
    #[error("formula not found: {name}")]
    NotFound { name: String },

    #[error("invalid formula: {message}")]
    InvalidFormula { message: String },

    #[error("invalid formula name: {name}")]
    InvalidName { name: String },

    #[error("invalid digest for {name}: {message}")]
    InvalidDigest { name: String, message: String },

    #[error("formula {name} has no head source")]
    NoHeadSource { name: String },
}

impl UserFacingError for FormulaError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            FormulaError::NotFound { .. } => {
                Some("Run `keg list` to see installed formulae, or check the formulae directory.")
            }
            FormulaError::InvalidDigest { .. } => {
                Some("The formula's sha256 field must be the 64-character hex digest of the source archive.")
            }
            _ => None,
        }
    }
}
