use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MedSafe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/MedSafe/ on all platforms)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MedSafe")
}

/// Path of the knowledge store database
pub fn knowledge_db_path() -> PathBuf {
    app_data_dir().join("knowledge.db")
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog load failed ({0}): {1}")]
    Load(String, String),

    #[error("Catalog parse failed ({0}): {1}")]
    Parse(String, String),
}

/// One drug the ingestion batch should fetch: a canonical name (the store
/// key, as patients enter it) and the generic name used for label lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub generic_name: String,
}

/// Injected configuration for the ingestion driver: an ordered mapping from
/// canonical drug name to generic name. Enumeration order is the batch order.
#[derive(Debug, Clone)]
pub struct DrugCatalog {
    entries: Vec<CatalogEntry>,
}

impl DrugCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(path.display().to_string(), e.to_string()))?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&json)
            .map_err(|e| CatalogError::Parse(path.display().to_string(), e.to_string()))?;
        Ok(Self { entries })
    }

    /// Built-in catalog: common Indian-market brand and generic names mapped
    /// to the US generic names openFDA indexes.
    pub fn load_default() -> Self {
        let entries = [
            ("paracetamol", "paracetamol"),
            ("ibuprofen", "ibuprofen"),
            ("aspirin", "aspirin"),
            ("cetirizine", "cetirizine"),
            ("metformin", "metformin"),
            ("atorvastatin", "atorvastatin"),
            ("amoxicillin", "amoxicillin"),
            ("pantoprazole", "pantoprazole"),
            ("levothyroxine", "levothyroxine"),
            ("amlodipine", "amlodipine"),
            ("losartan", "losartan"),
            ("omeprazole", "omeprazole"),
            ("dolo 650", "paracetamol"),
            ("crocin", "paracetamol"),
            ("allegra", "fexofenadine"),
            ("azithromycin", "azithromycin"),
        ];
        Self {
            entries: entries
                .iter()
                .map(|(name, generic)| CatalogEntry {
                    name: name.to_string(),
                    generic_name: generic.to_string(),
                })
                .collect(),
        }
    }

    /// Create a small catalog for tests (no file I/O).
    pub fn load_test() -> Self {
        Self {
            entries: vec![
                CatalogEntry {
                    name: "ibuprofen".into(),
                    generic_name: "ibuprofen".into(),
                },
                CatalogEntry {
                    name: "crocin".into(),
                    generic_name: "paracetamol".into(),
                },
            ],
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up the generic name for a canonical drug name.
    pub fn resolve_generic(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == lower)
            .map(|e| e.generic_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
