use thiserror::Error;

/// Errors surfaced by the rating engine and its storage contract.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fewer than two eligible items exist, so no pair can be formed.
    #[error("not enough items to form a pair")]
    NotEnoughItems,
    /// A vote referenced an item that does not exist (or vanished
    /// concurrently). Nothing was mutated.
    #[error("item not found: {0}")]
    ItemNotFound(String),
    /// A vote named the same item as winner and loser.
    #[error("winner and loser must be distinct")]
    SelfMatch,
    /// A commit raced with a concurrent update to one of its items.
    /// Retry signal only; the resolver never lets this escape to callers.
    #[error("concurrent update conflict")]
    Conflict,
    /// The storage backend failed, or a commit could not be applied within
    /// the retry budget. The whole operation may be retried; no partial
    /// state was committed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}
