//! Download domain events

use serde::{Deserialize, Serialize};

/// Download-specific events for the event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Download started with connection info
    Started {
        url: String,
        formula: Option<String>,
        total_bytes: Option<u64>,
    },

    /// Download progress update
    Progress {
        url: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// Download retrying after a transient failure
    Retrying {
        url: String,
        attempt: u32,
        max_attempts: u32,
        reason: String,
    },

    /// Download completed successfully
    Completed {
        url: String,
        formula: Option<String>,
        bytes_downloaded: u64,
    },

    /// Download failed
    Failed {
        url: String,
        formula: Option<String>,
        error: String,
    },
}
