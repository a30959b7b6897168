pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::DrugSafetyRecord;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Serialization error for column {column}: {reason}")]
    Serialization { column: String, reason: String },
}

/// Persisted name-keyed collection of drug safety records.
///
/// The ingestion driver is the only writer; writes are single-key idempotent
/// upserts. The matcher reads through `find_by_names`.
pub trait KnowledgeStore {
    /// Insert or overwrite the record stored under `record.name`.
    fn upsert_by_name(&self, record: &DrugSafetyRecord) -> Result<(), DatabaseError>;

    /// Fetch records for the given canonical names, keyed by name.
    /// Names absent from the store are simply missing from the map.
    fn find_by_names(
        &self,
        names: &[String],
    ) -> Result<HashMap<String, DrugSafetyRecord>, DatabaseError>;
}
