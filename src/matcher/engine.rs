//! The cross-reference rule engine.
//!
//! Pure evaluation: given a profile and the records matching its
//! medications, produce one verdict per recognized medication. Medications
//! with no stored record are omitted, not flagged.

use std::collections::HashMap;

use crate::db::{DatabaseError, KnowledgeStore};
use crate::models::{DrugSafetyRecord, MedicationVerdict, PatientMedicationEntry, PatientProfile};

/// Runs the four safety checks for each recognized medication, in a fixed
/// order: ban status, allergy triggers, drug-drug interactions, condition
/// risks. Verdicts preserve the profile's medication order.
pub struct CrossReferenceMatcher {
    /// Jurisdiction checked against each record's ban list.
    jurisdiction: String,
}

impl Default for CrossReferenceMatcher {
    fn default() -> Self {
        Self::new("India")
    }
}

impl CrossReferenceMatcher {
    pub fn new(jurisdiction: &str) -> Self {
        Self {
            jurisdiction: jurisdiction.to_string(),
        }
    }

    /// Evaluate a profile against pre-fetched records keyed by canonical
    /// (lowercase) drug name.
    pub fn evaluate(
        &self,
        profile: &PatientProfile,
        records: &HashMap<String, DrugSafetyRecord>,
    ) -> Vec<MedicationVerdict> {
        let mut verdicts = Vec::new();

        for medication in &profile.medications {
            let key = medication.name.to_lowercase();
            let Some(record) = records.get(&key) else {
                // Unknown drug: no record means no verdict, never a warning
                tracing::debug!(medication = %medication.name, "No record, omitting");
                continue;
            };

            let mut issues = Vec::new();

            if record
                .banned_in
                .iter()
                .any(|region| region == &self.jurisdiction)
            {
                issues.push(format!("Banned in {}", self.jurisdiction));
            }

            let allergy_hits: Vec<&str> = record
                .allergy_triggers
                .iter()
                .filter(|trigger| profile.allergies.contains(trigger))
                .map(String::as_str)
                .collect();
            if !allergy_hits.is_empty() {
                issues.push(format!(
                    "May cause reaction for {} allergy",
                    allergy_hits.join(", ")
                ));
            }

            let interaction_hits = interaction_hits(&key, &profile.medications, record);
            if !interaction_hits.is_empty() {
                issues.push(format!("Interacts with: {}", interaction_hits.join(", ")));
            }

            let notes_lower = record.notes.to_lowercase();
            for condition in &profile.conditions {
                if !condition.is_empty() && notes_lower.contains(&condition.to_lowercase()) {
                    issues.push(format!("Risk for condition: {condition}"));
                }
            }

            verdicts.push(MedicationVerdict {
                name: medication.name.clone(),
                issues: dedup_preserving_order(issues),
                alternatives: record.alternatives.clone(),
                notes: record.notes.clone(),
                pregnancy_risk: record.pregnancy_risk.clone(),
                allergy_triggers: record.allergy_triggers.clone(),
                interactions: record.interactions.clone(),
            });
        }

        verdicts
    }

    /// Fetch the needed records from the store, then evaluate.
    pub fn evaluate_from_store(
        &self,
        profile: &PatientProfile,
        store: &dyn KnowledgeStore,
    ) -> Result<Vec<MedicationVerdict>, DatabaseError> {
        let names: Vec<String> = profile
            .medications
            .iter()
            .map(|m| m.name.to_lowercase())
            .collect();
        let records = store.find_by_names(&names)?;
        Ok(self.evaluate(profile, &records))
    }

}

/// Other profile medications this record's interaction list names, matched
/// case-insensitively, the medication itself excluded.
fn interaction_hits(
    own_key: &str,
    medications: &[PatientMedicationEntry],
    record: &DrugSafetyRecord,
) -> Vec<String> {
    let interaction_terms: Vec<String> = record
        .interactions
        .iter()
        .map(|i| i.to_lowercase())
        .collect();

    let hits: Vec<String> = medications
        .iter()
        .map(|m| m.name.to_lowercase())
        .filter(|other| other != own_key)
        .filter(|other| interaction_terms.iter().any(|term| term == other))
        .collect();

    dedup_preserving_order(hits)
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
