//! Ranked, read-only projections over the rating store.
//!
//! The projector never mutates state and always reflects the latest
//! committed ratings at call time. Ordering is rating descending with ties
//! broken by earliest creation time, then id, so pages are deterministic.

use crate::error::EngineError;
use crate::store::RatingStore;

/// The top `n` items of the ranking.
pub fn top_n<S: RatingStore>(store: &S, n: usize) -> Result<Vec<S::Item>, EngineError> {
    store.top(n, 0)
}

/// One page of the ranking.
pub fn page<S: RatingStore>(
    store: &S,
    limit: usize,
    offset: usize,
) -> Result<Vec<S::Item>, EngineError> {
    store.top(limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn store_with_ratings(ratings: &[(&str, i32)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (second, (id, rating)) in ratings.iter().enumerate() {
            let created = Utc
                .with_ymd_and_hms(2025, 6, 1, 12, 0, second as u32)
                .unwrap();
            store.insert(Item::new(*id, None, *rating, created));
        }
        store
    }

    #[test]
    fn test_descending_with_created_at_tiebreak() {
        // Two 1300-rated items; "earlier" was created before "later".
        let store = store_with_ratings(&[
            ("top", 1500),
            ("earlier", 1300),
            ("later", 1300),
            ("bottom", 1100),
        ]);

        let board = top_n(&store, 4).unwrap();
        let ids: Vec<&str> = board.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["top", "earlier", "later", "bottom"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let store = store_with_ratings(&[("a", 1500), ("b", 1400), ("c", 1300)]);
        let board = top_n(&store, 2).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].id, "a");
    }

    #[test]
    fn test_page_offset() {
        let store = store_with_ratings(&[("a", 1500), ("b", 1400), ("c", 1300), ("d", 1200)]);
        let second_page = page(&store, 2, 2).unwrap();
        let ids: Vec<&str> = second_page.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "d"]);
    }

    #[test]
    fn test_empty_store_empty_board() {
        let store = store_with_ratings(&[]);
        assert!(top_n(&store, 10).unwrap().is_empty());
    }
}
