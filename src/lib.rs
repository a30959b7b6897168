//! Medication-safety advisory core: an offline ingestion pipeline that mines
//! regulatory drug labels into structured safety records, and a stateless
//! rule engine that cross-references a patient profile against them.

pub mod config;
pub mod db;
pub mod ingestion;
pub mod matcher;
pub mod models;
