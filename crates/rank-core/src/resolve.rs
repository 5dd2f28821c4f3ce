use chrono::Utc;

use crate::config::RatingConfig;
use crate::elo;
use crate::error::EngineError;
use crate::item::Rated;
use crate::store::{RatingStore, RatingUpdate};

/// Outcome of a recorded vote: both ratings after the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Winner's rating after the match.
    pub winner_rating: i32,
    /// Loser's rating after the match.
    pub loser_rating: i32,
}

/// Applies vote outcomes to the rating store.
///
/// The resolver is stateless: every call is an independent optimistic
/// transaction. It reads both records with their versions, computes the Elo
/// update, and asks the store to commit both sides as a single unit. If a
/// concurrent vote moved either version in the meantime the commit fails
/// cleanly and the whole read-compute-commit cycle is retried from fresh
/// state, a bounded number of times.
pub struct MatchResolver {
    config: RatingConfig,
}

impl MatchResolver {
    /// Create a resolver with the given engine configuration.
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    /// Record that `winner_id` beat `loser_id`.
    ///
    /// Fails with [`EngineError::SelfMatch`] when both ids are equal,
    /// [`EngineError::ItemNotFound`] when either record is missing (nothing
    /// is mutated in that case), and [`EngineError::StorageUnavailable`]
    /// when the commit keeps conflicting past the retry budget. The internal
    /// [`EngineError::Conflict`] signal never escapes this method.
    pub fn record_vote<S: RatingStore>(
        &self,
        store: &S,
        winner_id: &str,
        loser_id: &str,
    ) -> Result<VoteOutcome, EngineError> {
        if winner_id == loser_id {
            return Err(EngineError::SelfMatch);
        }

        for _ in 0..self.config.commit_retries.max(1) {
            let winner = store
                .get(winner_id)?
                .ok_or_else(|| EngineError::ItemNotFound(winner_id.to_string()))?;
            let loser = store
                .get(loser_id)?
                .ok_or_else(|| EngineError::ItemNotFound(loser_id.to_string()))?;

            let (new_winner, new_loser) = elo::rate_match(
                winner.item.rating(),
                loser.item.rating(),
                self.config.k_factor,
            );

            let committed = store.commit_match(
                RatingUpdate {
                    id: winner_id.to_string(),
                    expected_version: winner.version,
                    new_rating: new_winner,
                },
                RatingUpdate {
                    id: loser_id.to_string(),
                    expected_version: loser.version,
                    new_rating: new_loser,
                },
                Utc::now(),
            );

            match committed {
                Ok(()) => {
                    return Ok(VoteOutcome {
                        winner_rating: new_winner,
                        loser_rating: new_loser,
                    })
                }
                Err(EngineError::Conflict) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(EngineError::StorageUnavailable(
            "vote commit retries exhausted".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::store::{MemoryStore, Pool, Versioned};
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn store_with_pair() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert(Item::new(
            "a",
            None,
            1200,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        ));
        store.insert(Item::new(
            "b",
            None,
            1200,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 1).unwrap(),
        ));
        store
    }

    fn resolver() -> MatchResolver {
        MatchResolver::new(RatingConfig::default())
    }

    #[test]
    fn test_record_vote_equal_ratings() {
        let store = store_with_pair();
        let outcome = resolver().record_vote(&store, "a", "b").unwrap();
        assert_eq!(outcome.winner_rating, 1216);
        assert_eq!(outcome.loser_rating, 1184);

        let winner = store.get("a").unwrap().unwrap().item;
        assert_eq!(winner.rating, 1216);
        assert_eq!(winner.wins, 1);
        assert_eq!(winner.losses, 0);

        let loser = store.get("b").unwrap().unwrap().item;
        assert_eq!(loser.rating, 1184);
        assert_eq!(loser.wins, 0);
        assert_eq!(loser.losses, 1);
    }

    #[test]
    fn test_history_tracks_match_count() {
        let store = store_with_pair();
        let r = resolver();
        r.record_vote(&store, "a", "b").unwrap();
        r.record_vote(&store, "b", "a").unwrap();
        r.record_vote(&store, "a", "b").unwrap();

        for id in ["a", "b"] {
            let item = store.get(id).unwrap().unwrap().item;
            assert_eq!(
                store.history(id).len() as u32,
                item.wins + item.losses,
                "history length must equal completed matches for {id}"
            );
        }
    }

    #[test]
    fn test_underdog_gains_more_on_rematch() {
        let store = store_with_pair();
        let r = resolver();
        r.record_vote(&store, "a", "b").unwrap();
        // "b" is now at 1184 facing 1216; winning earns more than 16.
        let outcome = r.record_vote(&store, "b", "a").unwrap();
        assert!(outcome.winner_rating - 1184 > 16);
    }

    #[test]
    fn test_self_vote_rejected_without_reads() {
        let store = store_with_pair();
        let result = resolver().record_vote(&store, "a", "a");
        assert!(matches!(result, Err(EngineError::SelfMatch)));
        assert_eq!(store.get("a").unwrap().unwrap().item.rating, 1200);
    }

    #[test]
    fn test_missing_loser_mutates_nothing() {
        let store = store_with_pair();
        let result = resolver().record_vote(&store, "a", "ghost");
        assert!(matches!(result, Err(EngineError::ItemNotFound(_))));

        let winner = store.get("a").unwrap().unwrap();
        assert_eq!(winner.item.rating, 1200);
        assert_eq!(winner.item.wins, 0);
        assert_eq!(winner.version, 0);
        assert!(store.history("a").is_empty());
    }

    #[test]
    fn test_missing_winner_mutates_nothing() {
        let store = store_with_pair();
        let result = resolver().record_vote(&store, "ghost", "b");
        assert!(matches!(result, Err(EngineError::ItemNotFound(_))));
        assert_eq!(store.get("b").unwrap().unwrap().item.rating, 1200);
    }

    /// Store wrapper that fails the first `remaining` commits with a
    /// conflict, then delegates.
    struct ConflictingStore {
        inner: MemoryStore,
        remaining: AtomicU32,
    }

    impl ConflictingStore {
        fn new(inner: MemoryStore, conflicts: u32) -> Self {
            Self {
                inner,
                remaining: AtomicU32::new(conflicts),
            }
        }
    }

    impl RatingStore for ConflictingStore {
        type Item = Item;

        fn get(&self, id: &str) -> Result<Option<Versioned<Item>>, EngineError> {
            self.inner.get(id)
        }

        fn count(&self, pool: Pool, exclude: Option<&str>) -> Result<usize, EngineError> {
            self.inner.count(pool, exclude)
        }

        fn nth(
            &self,
            pool: Pool,
            exclude: Option<&str>,
            index: usize,
        ) -> Result<Option<Item>, EngineError> {
            self.inner.nth(pool, exclude, index)
        }

        fn commit_match(
            &self,
            winner: RatingUpdate,
            loser: RatingUpdate,
            recorded_at: DateTime<Utc>,
        ) -> Result<(), EngineError> {
            if self.remaining.load(Ordering::SeqCst) > 0 {
                self.remaining.fetch_sub(1, Ordering::SeqCst);
                return Err(EngineError::Conflict);
            }
            self.inner.commit_match(winner, loser, recorded_at)
        }

        fn top(&self, limit: usize, offset: usize) -> Result<Vec<Item>, EngineError> {
            self.inner.top(limit, offset)
        }
    }

    #[test]
    fn test_conflict_retried_until_commit_lands() {
        let store = ConflictingStore::new(store_with_pair(), 2);
        let outcome = resolver().record_vote(&store, "a", "b").unwrap();
        assert_eq!(outcome.winner_rating, 1216);
        assert_eq!(store.inner.get("a").unwrap().unwrap().item.wins, 1);
    }

    #[test]
    fn test_conflicts_exhaust_retry_budget() {
        let store = ConflictingStore::new(store_with_pair(), 10);
        let result = resolver().record_vote(&store, "a", "b");
        assert!(matches!(result, Err(EngineError::StorageUnavailable(_))));

        // The conflicting commits left no partial state behind.
        assert_eq!(store.inner.get("a").unwrap().unwrap().item.wins, 0);
        assert_eq!(store.inner.get("b").unwrap().unwrap().item.losses, 0);
    }

    #[test]
    fn test_concurrent_votes_lose_no_updates() {
        const THREADS: u32 = 8;
        const VOTES_PER_THREAD: u32 = 25;

        let store = store_with_pair();
        // Contention on two items across 8 threads routinely needs more than
        // the default three commit attempts.
        let r = MatchResolver::new(RatingConfig {
            commit_retries: 10_000,
            ..RatingConfig::default()
        });

        std::thread::scope(|scope| {
            for thread in 0..THREADS {
                let store = &store;
                let r = &r;
                scope.spawn(move || {
                    for vote in 0..VOTES_PER_THREAD {
                        // Vary the winner so both directions interleave.
                        let (winner, loser) = if (thread + vote) % 2 == 0 {
                            ("a", "b")
                        } else {
                            ("b", "a")
                        };
                        r.record_vote(store, winner, loser).unwrap();
                    }
                });
            }
        });

        let a = store.get("a").unwrap().unwrap().item;
        let b = store.get("b").unwrap().unwrap().item;
        let total = a.wins + a.losses + b.wins + b.losses;
        assert_eq!(total, 2 * THREADS * VOTES_PER_THREAD);
        assert_eq!(store.history("a").len() as u32, a.wins + a.losses);
        assert_eq!(store.history("b").len() as u32, b.wins + b.losses);
    }
}
