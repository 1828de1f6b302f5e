//! General-purpose events

use serde::{Deserialize, Serialize};

/// Events that do not belong to a specific domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Informational message for the user
    Message { text: String },

    /// Warning that does not abort the operation
    Warning { text: String },
}
