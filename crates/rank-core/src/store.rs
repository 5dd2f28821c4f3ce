use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::item::{Item, ItemId, Rated, RatingPoint};

/// Pool filter for counting and sampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    /// Every item.
    All,
    /// Items with a non-null owner (user submissions).
    Promoted,
}

/// A record together with its optimistic-concurrency version.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The record as read.
    pub item: T,
    /// Version at read time; passed back on commit to detect races.
    pub version: u64,
}

/// One side of a match commit.
#[derive(Debug, Clone)]
pub struct RatingUpdate {
    /// Item to update.
    pub id: ItemId,
    /// Version the caller read. The commit fails with
    /// [`EngineError::Conflict`] if the stored version has moved past it.
    pub expected_version: u64,
    /// Rating after the match.
    pub new_rating: i32,
}

/// Storage contract of the rating engine.
///
/// The store is the only shared mutable resource: the selector and the
/// leaderboard only read, and the resolver writes exclusively through
/// [`commit_match`]. Implementations must serialize updates per item, not
/// globally.
///
/// [`commit_match`]: RatingStore::commit_match
pub trait RatingStore {
    /// Record type held by this store.
    type Item: Rated;

    /// Read one record with its current version.
    fn get(&self, id: &str) -> Result<Option<Versioned<Self::Item>>, EngineError>;

    /// Number of items in `pool`, minus the excluded id.
    fn count(&self, pool: Pool, exclude: Option<&str>) -> Result<usize, EngineError>;

    /// The item at `index` in the pool's enumeration order.
    ///
    /// Enumeration order must be stable between a [`count`] and a subsequent
    /// `nth` so a uniformly drawn index stays in range.
    ///
    /// [`count`]: RatingStore::count
    fn nth(
        &self,
        pool: Pool,
        exclude: Option<&str>,
        index: usize,
    ) -> Result<Option<Self::Item>, EngineError>;

    /// Commit a decided match as a single unit.
    ///
    /// Atomically: sets both new ratings, increments the winner's win count
    /// and the loser's loss count, appends one history point
    /// `(new_rating, recorded_at)` per item, and bumps both versions.
    ///
    /// Fails with [`EngineError::Conflict`] when either expected version is
    /// stale and [`EngineError::ItemNotFound`] when either record vanished.
    /// On any failure neither side is modified. The two ids must be
    /// distinct.
    fn commit_match(
        &self,
        winner: RatingUpdate,
        loser: RatingUpdate,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), EngineError>;

    /// Ranked slice: rating descending, ties broken by earliest creation
    /// time, then id.
    fn top(&self, limit: usize, offset: usize) -> Result<Vec<Self::Item>, EngineError>;
}

struct Entry {
    item: Item,
    version: u64,
    history: Vec<RatingPoint>,
}

/// In-memory reference implementation of [`RatingStore`].
///
/// Keeps one mutex per item so commits on disjoint pairs never contend; the
/// outer map lock is held only to look entries up. Used by the engine's own
/// tests and suitable for embedding where durability is not needed.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<ItemId, Arc<Mutex<Entry>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly created item with version 0 and an empty history.
    pub fn insert(&self, item: Item) {
        let id = item.id.clone();
        let entry = Entry {
            item,
            version: 0,
            history: Vec::new(),
        };
        self.entries
            .write()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(entry)));
    }

    /// Rating trajectory of an item, oldest first. Empty for unknown ids.
    pub fn history(&self, id: &str) -> Vec<RatingPoint> {
        let entries = self.entries.read().unwrap();
        entries
            .get(id)
            .map(|entry| entry.lock().unwrap().history.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, id: &str) -> Option<Arc<Mutex<Entry>>> {
        self.entries.read().unwrap().get(id).cloned()
    }

    /// Filtered snapshot in enumeration order (creation time, then id).
    fn snapshot(&self, pool: Pool, exclude: Option<&str>) -> Vec<Item> {
        let entries = self.entries.read().unwrap();
        let mut items: Vec<Item> = entries
            .values()
            .map(|entry| entry.lock().unwrap().item.clone())
            .filter(|item| match pool {
                Pool::All => true,
                Pool::Promoted => item.owner_id.is_some(),
            })
            .filter(|item| exclude.map_or(true, |ex| item.id != ex))
            .collect();
        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }
}

impl RatingStore for MemoryStore {
    type Item = Item;

    fn get(&self, id: &str) -> Result<Option<Versioned<Item>>, EngineError> {
        Ok(self.lookup(id).map(|entry| {
            let entry = entry.lock().unwrap();
            Versioned {
                item: entry.item.clone(),
                version: entry.version,
            }
        }))
    }

    fn count(&self, pool: Pool, exclude: Option<&str>) -> Result<usize, EngineError> {
        Ok(self.snapshot(pool, exclude).len())
    }

    fn nth(
        &self,
        pool: Pool,
        exclude: Option<&str>,
        index: usize,
    ) -> Result<Option<Item>, EngineError> {
        Ok(self.snapshot(pool, exclude).into_iter().nth(index))
    }

    fn commit_match(
        &self,
        winner: RatingUpdate,
        loser: RatingUpdate,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if winner.id == loser.id {
            return Err(EngineError::SelfMatch);
        }

        let winner_entry = self
            .lookup(&winner.id)
            .ok_or_else(|| EngineError::ItemNotFound(winner.id.clone()))?;
        let loser_entry = self
            .lookup(&loser.id)
            .ok_or_else(|| EngineError::ItemNotFound(loser.id.clone()))?;

        // Lock both sides in id order so concurrent commits on overlapping
        // pairs cannot deadlock.
        let (mut winner_guard, mut loser_guard) = if winner.id < loser.id {
            let w = winner_entry.lock().unwrap();
            let l = loser_entry.lock().unwrap();
            (w, l)
        } else {
            let l = loser_entry.lock().unwrap();
            let w = winner_entry.lock().unwrap();
            (w, l)
        };

        if winner_guard.version != winner.expected_version
            || loser_guard.version != loser.expected_version
        {
            return Err(EngineError::Conflict);
        }

        winner_guard.item.rating = winner.new_rating;
        winner_guard.item.wins += 1;
        winner_guard.version += 1;
        winner_guard.history.push(RatingPoint {
            rating: winner.new_rating,
            recorded_at,
        });

        loser_guard.item.rating = loser.new_rating;
        loser_guard.item.losses += 1;
        loser_guard.version += 1;
        loser_guard.history.push(RatingPoint {
            rating: loser.new_rating,
            recorded_at,
        });

        Ok(())
    }

    fn top(&self, limit: usize, offset: usize) -> Result<Vec<Item>, EngineError> {
        let mut items = self.snapshot(Pool::All, None);
        items.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }
}
