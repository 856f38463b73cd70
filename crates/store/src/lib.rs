//! History store backends for Textline.
//!
//! Two implementations of [`textline_core::HistoryStore`]:
//! - [`SqliteStore`] — the production backend, one append-only `turns` table
//! - [`InMemoryStore`] — for tests and ephemeral sessions

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;
