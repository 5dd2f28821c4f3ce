use serde::{Deserialize, Serialize};

/// Tunable parameters of the rating engine.
///
/// Every field has a default so a configuration file only needs to name the
/// values it changes. Deserializes from the `[rating]` section of the arena
/// configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingConfig {
    /// Elo sensitivity constant. Bounds how far a single match can move a
    /// rating.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Rating assigned to newly created items.
    #[serde(default = "default_initial_rating")]
    pub initial_rating: i32,
    /// Probability that a draw restricts the pool to items with an owner.
    /// The promoted pool falls back to the full pool while it is empty.
    #[serde(default = "default_promoted_bias")]
    pub promoted_bias: f64,
    /// Attempts to draw a second pair member distinct from the first before
    /// giving up with `NotEnoughItems`.
    #[serde(default = "default_pair_attempts")]
    pub pair_attempts: u32,
    /// Attempts to commit a vote against concurrent updates before surfacing
    /// `StorageUnavailable`.
    #[serde(default = "default_commit_retries")]
    pub commit_retries: u32,
}

fn default_k_factor() -> f64 {
    32.0
}

fn default_initial_rating() -> i32 {
    1200
}

fn default_promoted_bias() -> f64 {
    0.5
}

fn default_pair_attempts() -> u32 {
    5
}

fn default_commit_retries() -> u32 {
    3
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: default_k_factor(),
            initial_rating: default_initial_rating(),
            promoted_bias: default_promoted_bias(),
            pair_attempts: default_pair_attempts(),
            commit_retries: default_commit_retries(),
        }
    }
}
