use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque unique identifier of a comparable item.
pub type ItemId = String;

/// Minimal view of a comparable item required by the engine.
///
/// Implemented by whatever record type the backing store holds, so the
/// selector and resolver can work with full storage rows without the engine
/// knowing about their extra fields.
pub trait Rated {
    /// Unique, immutable identifier.
    fn id(&self) -> &str;
    /// Current rating in integer rating units.
    fn rating(&self) -> i32;
}

/// A comparable item with its rating state.
///
/// This is the engine's own record type, used by [`MemoryStore`] and the
/// test suite. Durable backends typically define a richer row type and
/// implement [`Rated`] for it instead.
///
/// [`MemoryStore`]: crate::MemoryStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Submitting user, or `None` for a system-seeded item.
    pub owner_id: Option<String>,
    /// Current rating.
    pub rating: i32,
    /// Matches this item was declared winner of.
    pub wins: u32,
    /// Matches this item was declared loser of.
    pub losses: u32,
    /// Creation time; immutable, used as the leaderboard tie-breaker.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create an item with zero matches played.
    pub fn new(
        id: impl Into<ItemId>,
        owner_id: Option<String>,
        rating: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id,
            rating,
            wins: 0,
            losses: 0,
            created_at,
        }
    }
}

impl Rated for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn rating(&self) -> i32 {
        self.rating
    }
}

/// One point of an item's rating trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    /// Rating right after the match was resolved.
    pub rating: i32,
    /// When the match was resolved.
    pub recorded_at: DateTime<Utc>,
}
