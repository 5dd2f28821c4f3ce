//! Elo-style rating and matchmaking engine.
//!
//! This crate provides the core logic for head-to-head ranking of comparable
//! items:
//! - [`elo`] for the pairwise rating update
//! - [`PairSelector`] for weighted random pair selection
//! - [`MatchResolver`] for atomic vote resolution
//! - [`leaderboard`] for ranked read-only projections
//! - [`RatingStore`] as the storage contract, with [`MemoryStore`] as the
//!   in-memory reference implementation
//!
//! The engine itself holds no mutable state; all coordination between
//! concurrent callers happens through the store's per-item versioning.

mod config;
pub mod elo;
mod error;
mod item;
pub mod leaderboard;
mod resolve;
mod select;
mod store;

pub use config::RatingConfig;
pub use error::EngineError;
pub use item::{Item, ItemId, Rated, RatingPoint};
pub use resolve::{MatchResolver, VoteOutcome};
pub use select::PairSelector;
pub use store::{MemoryStore, Pool, RatingStore, RatingUpdate, Versioned};
