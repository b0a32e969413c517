//! Durable key-value storage backed by `rusqlite` (bundled `SQLite`).
//!
//! Holds the serialized catalog collections so a browsing session can
//! resume without refetching.

mod connection;
/// Key-value entry operations.
pub mod entries;
mod migrations;

pub use connection::open_db;
pub use entries::{get_entry, remove_entry, set_entry};
