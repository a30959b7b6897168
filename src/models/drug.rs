use serde::{Deserialize, Serialize};

/// Structured per-drug safety profile derived from regulatory label text.
///
/// `name` is the canonical (lowercase) identifier and the unique key in the
/// knowledge store. Set-valued fields are deduplicated, preserve first
/// occurrence, and never contain empty entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugSafetyRecord {
    pub name: String,
    pub generic_name: String,
    pub interactions: Vec<String>,
    pub allergy_triggers: Vec<String>,
    /// Jurisdiction codes where this drug is banned (e.g. "India").
    pub banned_in: Vec<String>,
    pub alternatives: Vec<String>,
    /// Full lowercased warnings corpus; condition checks search this text.
    pub notes: String,
    /// Pregnancy-related sentences from the label; empty when none found.
    pub pregnancy_risk: String,
    /// Provenance, e.g. "openFDA (active_ingredient)".
    pub source: String,
}
