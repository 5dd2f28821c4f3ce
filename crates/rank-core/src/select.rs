use rand::Rng;

use crate::config::RatingConfig;
use crate::error::EngineError;
use crate::item::Rated;
use crate::store::{Pool, RatingStore};

/// Chooses items to present for head-to-head comparison.
///
/// Each draw is weighted: with the configured probability the pool is
/// restricted to user-submitted ("promoted") items before sampling, so that
/// seeded content does not permanently dominate matchups. While the promoted
/// pool is empty the draw falls back to the full pool.
///
/// The selector holds no mutable state and is cheap to construct per
/// request; randomness is injected so tests can seed it.
pub struct PairSelector {
    config: RatingConfig,
}

impl PairSelector {
    /// Create a selector with the given engine configuration.
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    /// Draw one item uniformly from the weighted pool.
    ///
    /// `exclude` removes a single id from the pool first; used to refresh
    /// one side of an existing pair after a vote.
    pub fn select_one<S, R>(
        &self,
        store: &S,
        rng: &mut R,
        exclude: Option<&str>,
    ) -> Result<S::Item, EngineError>
    where
        S: RatingStore,
        R: Rng,
    {
        let mut pool = if rng.gen::<f64>() < self.config.promoted_bias {
            Pool::Promoted
        } else {
            Pool::All
        };

        let mut count = store.count(pool, exclude)?;
        if count == 0 && pool == Pool::Promoted {
            // Early stage: nothing user-submitted yet.
            pool = Pool::All;
            count = store.count(pool, exclude)?;
        }
        if count == 0 {
            return Err(EngineError::NotEnoughItems);
        }

        let index = rng.gen_range(0..count);
        store.nth(pool, exclude, index)?.ok_or(EngineError::NotEnoughItems)
    }

    /// Draw two distinct items for a comparison, optionally excluding an id
    /// from the whole draw.
    ///
    /// The second side is re-drawn up to the configured attempt budget until
    /// its id differs from the first; a tiny pool can therefore still fail
    /// with [`EngineError::NotEnoughItems`] instead of looping forever.
    pub fn select_pair<S, R>(
        &self,
        store: &S,
        rng: &mut R,
        exclude: Option<&str>,
    ) -> Result<(S::Item, S::Item), EngineError>
    where
        S: RatingStore,
        R: Rng,
    {
        if store.count(Pool::All, exclude)? < 2 {
            return Err(EngineError::NotEnoughItems);
        }

        let first = self.select_one(store, rng, exclude)?;
        for _ in 0..self.config.pair_attempts {
            let second = self.select_one(store, rng, exclude)?;
            if second.id() != first.id() {
                return Ok((first, second));
            }
        }
        Err(EngineError::NotEnoughItems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store_with(items: &[(&str, Option<&str>)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (second, (id, owner)) in items.iter().enumerate() {
            let created = Utc
                .with_ymd_and_hms(2025, 6, 1, 12, 0, second as u32)
                .unwrap();
            store.insert(Item::new(*id, owner.map(String::from), 1200, created));
        }
        store
    }

    fn selector(promoted_bias: f64) -> PairSelector {
        PairSelector::new(RatingConfig {
            promoted_bias,
            ..RatingConfig::default()
        })
    }

    #[test]
    fn test_select_one_empty_store() {
        let store = store_with(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        let result = selector(0.5).select_one(&store, &mut rng, None);
        assert!(matches!(result, Err(EngineError::NotEnoughItems)));
    }

    #[test]
    fn test_select_one_excluding_last_item() {
        let store = store_with(&[("a", None)]);
        let mut rng = StdRng::seed_from_u64(1);
        let result = selector(0.5).select_one(&store, &mut rng, Some("a"));
        assert!(matches!(result, Err(EngineError::NotEnoughItems)));
    }

    #[test]
    fn test_select_one_respects_exclude() {
        let store = store_with(&[("a", None), ("b", None)]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let picked = selector(0.0).select_one(&store, &mut rng, Some("a")).unwrap();
            assert_eq!(picked.id, "b");
        }
    }

    #[test]
    fn test_full_bias_only_draws_promoted() {
        let store = store_with(&[("seeded", None), ("owned", Some("user-1"))]);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let picked = selector(1.0).select_one(&store, &mut rng, None).unwrap();
            assert_eq!(picked.id, "owned");
        }
    }

    #[test]
    fn test_empty_promoted_pool_falls_back_to_all() {
        let store = store_with(&[("seeded-1", None), ("seeded-2", None)]);
        let mut rng = StdRng::seed_from_u64(3);
        let picked = selector(1.0).select_one(&store, &mut rng, None).unwrap();
        assert!(picked.owner_id.is_none());
    }

    #[test]
    fn test_zero_bias_reaches_every_item() {
        let store = store_with(&[("a", None), ("b", Some("user-1")), ("c", None)]);
        let mut rng = StdRng::seed_from_u64(4);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let picked = selector(0.0).select_one(&store, &mut rng, None).unwrap();
            seen.insert(picked.id);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_select_pair_members_always_distinct() {
        let store = store_with(&[("a", None), ("b", Some("u1")), ("c", None), ("d", Some("u2"))]);
        let mut rng = StdRng::seed_from_u64(5);
        let sel = selector(0.5);
        for _ in 0..200 {
            let (first, second) = sel.select_pair(&store, &mut rng, None).unwrap();
            assert_ne!(first.id, second.id);
        }
    }

    #[test]
    fn test_select_pair_single_item() {
        let store = store_with(&[("only", None)]);
        let mut rng = StdRng::seed_from_u64(6);
        let result = selector(0.5).select_pair(&store, &mut rng, None);
        assert!(matches!(result, Err(EngineError::NotEnoughItems)));
    }

    #[test]
    fn test_select_pair_empty_store() {
        let store = store_with(&[]);
        let mut rng = StdRng::seed_from_u64(7);
        let result = selector(0.5).select_pair(&store, &mut rng, None);
        assert!(matches!(result, Err(EngineError::NotEnoughItems)));
    }

    #[test]
    fn test_select_pair_never_contains_excluded_id() {
        let store = store_with(&[("a", None), ("b", None), ("c", None)]);
        let mut rng = StdRng::seed_from_u64(9);
        let sel = selector(0.0);
        for _ in 0..100 {
            let (first, second) = sel.select_pair(&store, &mut rng, Some("a")).unwrap();
            assert_ne!(first.id, "a");
            assert_ne!(second.id, "a");
        }
    }

    #[test]
    fn test_select_pair_exhausts_attempts_on_degenerate_pool() {
        // With full promoted bias and a single promoted item, every draw of
        // the second side lands on the first item again until the attempt
        // budget runs out.
        let store = store_with(&[("seeded", None), ("owned", Some("user-1"))]);
        let mut rng = StdRng::seed_from_u64(8);
        let result = selector(1.0).select_pair(&store, &mut rng, None);
        assert!(matches!(result, Err(EngineError::NotEnoughItems)));
    }
}
