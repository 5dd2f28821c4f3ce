//! Shared library for the resume arena.
//!
//! Provides what both binaries need around the rating engine:
//! - [`config`] for the TOML configuration file
//! - [`db`] for the SQLite schema and connection handle
//! - [`models`] for the stored resume record types
//! - [`store`] for [`SqliteStore`], the durable rating store
//!
//! [`SqliteStore`]: store::SqliteStore

pub mod config;
pub mod db;
pub mod models;
pub mod store;
