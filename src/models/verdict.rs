use serde::{Deserialize, Serialize};

/// Per-medication result of a cross-reference match.
///
/// `issues` is ordered and deduplicated; an empty list means the medication
/// was checked against a known record and nothing fired — a positive
/// "no known problem" signal, distinct from an unknown drug (which is
/// omitted from the output entirely).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationVerdict {
    pub name: String,
    pub issues: Vec<String>,
    pub alternatives: Vec<String>,
    pub notes: String,
    pub pregnancy_risk: String,
    pub allergy_triggers: Vec<String>,
    pub interactions: Vec<String>,
}
