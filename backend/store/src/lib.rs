//! Glossary storage backends.
//!
//! `InMemoryGlossaryStore` for tests and throwaway runs, `SqliteGlossaryStore`
//! for durable single-table persistence.

pub mod sqlite_store;
pub mod store;

pub use sqlite_store::{SqliteGlossaryStore, SCAN_LIMIT, is_valid_table_name};
pub use store::InMemoryGlossaryStore;
