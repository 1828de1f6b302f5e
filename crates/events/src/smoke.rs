//! Post-install smoke test events

use serde::{Deserialize, Serialize};

/// Smoke test domain events - maps to `keg test` and the post-install check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TestEvent {
    /// Smoke test started (launcher invoked with --help)
    Started { formula: String, command: String },

    /// Smoke test passed
    Passed { formula: String },

    /// Smoke test failed; the install is kept
    Failed {
        formula: String,
        command: String,
        error: String,
    },
}
