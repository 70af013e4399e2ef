//! Repository Module
//!
//! Provides CRUD and query operations for the SurrealDB tables.
//!
//! ID convention: the full stack uses "table:key" strings. Handlers pass
//! them through as-is; [`record_id`] parses either form ("table:key" or a
//! bare key) into a [`RecordId`].

// Catalog
pub mod component;
pub mod pack;
pub mod service;
pub mod variant;

// Lifecycle
pub mod daily_menu;
pub mod day_lock;
pub mod invoice;
pub mod order;
pub mod token;

// Re-exports
pub use component::ComponentRepository;
pub use daily_menu::DailyMenuRepository;
pub use day_lock::DayLockRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;
pub use pack::PackRepository;
pub use service::ServiceRepository;
pub use token::OrderTokenRepository;
pub use variant::VariantRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id into a RecordId for `table`, accepting "table:key" or "key"
pub fn record_id(table: &str, id: &str) -> RecordId {
    id.parse::<RecordId>()
        .unwrap_or_else(|_| RecordId::from_table_key(table, id))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
