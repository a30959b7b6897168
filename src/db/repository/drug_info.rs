use std::collections::HashMap;

use rusqlite::{params, Connection};

use crate::db::{DatabaseError, KnowledgeStore};
use crate::models::DrugSafetyRecord;

/// Insert or overwrite the record stored under its canonical name.
pub fn upsert_drug_info(conn: &Connection, record: &DrugSafetyRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO drug_info (name, generic_name, interactions, allergy_triggers,
         banned_in, alternatives, notes, pregnancy_risk, source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(name) DO UPDATE SET
             generic_name = excluded.generic_name,
             interactions = excluded.interactions,
             allergy_triggers = excluded.allergy_triggers,
             banned_in = excluded.banned_in,
             alternatives = excluded.alternatives,
             notes = excluded.notes,
             pregnancy_risk = excluded.pregnancy_risk,
             source = excluded.source",
        params![
            record.name,
            record.generic_name,
            to_json_column(&record.interactions, "interactions")?,
            to_json_column(&record.allergy_triggers, "allergy_triggers")?,
            to_json_column(&record.banned_in, "banned_in")?,
            to_json_column(&record.alternatives, "alternatives")?,
            record.notes,
            record.pregnancy_risk,
            record.source,
        ],
    )?;
    Ok(())
}

/// Fetch one record by canonical name.
pub fn get_drug_info(
    conn: &Connection,
    name: &str,
) -> Result<Option<DrugSafetyRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT name, generic_name, interactions, allergy_triggers, banned_in,
         alternatives, notes, pregnancy_risk, source
         FROM drug_info WHERE name = ?1",
    )?;

    let mut rows = stmt.query_map(params![name], drug_info_row)?;
    match rows.next() {
        Some(row) => Ok(Some(record_from_row(row?)?)),
        None => Ok(None),
    }
}

/// Fetch records for a set of canonical names, keyed by name.
pub fn find_drug_info_by_names(
    conn: &Connection,
    names: &[String],
) -> Result<HashMap<String, DrugSafetyRecord>, DatabaseError> {
    let mut found = HashMap::new();
    // Per-request name counts are small (a patient's medication list), so a
    // prepared single-name query beats building a dynamic IN clause.
    let mut stmt = conn.prepare(
        "SELECT name, generic_name, interactions, allergy_triggers, banned_in,
         alternatives, notes, pregnancy_risk, source
         FROM drug_info WHERE name = ?1",
    )?;

    for name in names {
        let mut rows = stmt.query_map(params![name], drug_info_row)?;
        if let Some(row) = rows.next() {
            let record = record_from_row(row?)?;
            found.insert(record.name.clone(), record);
        }
    }
    Ok(found)
}

/// All stored records, for diagnostics and batch verification.
pub fn get_all_drug_info(conn: &Connection) -> Result<Vec<DrugSafetyRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT name, generic_name, interactions, allergy_triggers, banned_in,
         alternatives, notes, pregnancy_risk, source
         FROM drug_info ORDER BY name",
    )?;

    let rows = stmt.query_map([], drug_info_row)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?)?);
    }
    Ok(records)
}

// Internal row type for DrugSafetyRecord mapping
struct DrugInfoRow {
    name: String,
    generic_name: String,
    interactions: String,
    allergy_triggers: String,
    banned_in: String,
    alternatives: String,
    notes: String,
    pregnancy_risk: String,
    source: String,
}

fn drug_info_row(row: &rusqlite::Row<'_>) -> Result<DrugInfoRow, rusqlite::Error> {
    Ok(DrugInfoRow {
        name: row.get(0)?,
        generic_name: row.get(1)?,
        interactions: row.get(2)?,
        allergy_triggers: row.get(3)?,
        banned_in: row.get(4)?,
        alternatives: row.get(5)?,
        notes: row.get(6)?,
        pregnancy_risk: row.get(7)?,
        source: row.get(8)?,
    })
}

fn record_from_row(row: DrugInfoRow) -> Result<DrugSafetyRecord, DatabaseError> {
    Ok(DrugSafetyRecord {
        name: row.name,
        generic_name: row.generic_name,
        interactions: from_json_column(&row.interactions, "interactions")?,
        allergy_triggers: from_json_column(&row.allergy_triggers, "allergy_triggers")?,
        banned_in: from_json_column(&row.banned_in, "banned_in")?,
        alternatives: from_json_column(&row.alternatives, "alternatives")?,
        notes: row.notes,
        pregnancy_risk: row.pregnancy_risk,
        source: row.source,
    })
}

fn to_json_column(values: &[String], column: &str) -> Result<String, DatabaseError> {
    serde_json::to_string(values).map_err(|e| DatabaseError::Serialization {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

fn from_json_column(json: &str, column: &str) -> Result<Vec<String>, DatabaseError> {
    serde_json::from_str(json).map_err(|e| DatabaseError::Serialization {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

/// SQLite-backed knowledge store.
pub struct SqliteKnowledgeStore {
    conn: Connection,
}

impl SqliteKnowledgeStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KnowledgeStore for SqliteKnowledgeStore {
    fn upsert_by_name(&self, record: &DrugSafetyRecord) -> Result<(), DatabaseError> {
        upsert_drug_info(&self.conn, record)
    }

    fn find_by_names(
        &self,
        names: &[String],
    ) -> Result<HashMap<String, DrugSafetyRecord>, DatabaseError> {
        find_drug_info_by_names(&self.conn, names)
    }
}
