//! Stored record types, shared between the store, the HTTP server, and the
//! importer. All of these serialize directly as API bodies.

use rank_core::Rated;
use serde::{Deserialize, Serialize};

/// A stored resume with its rating state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    /// Unique identifier.
    pub id: String,
    /// Submitting user, or `None` for a system-seeded resume.
    pub owner_id: Option<String>,
    /// Stored file name (unique).
    pub file_name: String,
    /// File name at upload time.
    pub original_name: String,
    /// Current rating.
    pub rating: i32,
    /// Matches won.
    pub wins: i32,
    /// Matches lost.
    pub losses: i32,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl Rated for Resume {
    fn id(&self) -> &str {
        &self.id
    }

    fn rating(&self) -> i32 {
        self.rating
    }
}

/// A single point in the rating history timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Rating right after the match was resolved.
    pub rating: i32,
    /// Timestamp when this rating was recorded (RFC 3339).
    pub recorded_at: String,
}

/// Resume with its full rating trajectory, oldest point first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProfile {
    /// The resume record.
    #[serde(flatten)]
    pub resume: Resume,
    /// Rating after each resolved match, in match order.
    pub rating_history: Vec<HistoryPoint>,
}
