//! Assembles a structured safety record from a raw label.

use crate::ingestion::extract;
use crate::ingestion::label::DrugLabel;
use crate::ingestion::openfda::SearchField;
use crate::models::DrugSafetyRecord;

/// Build the record stored for a catalog drug from its resolved label.
///
/// Interaction candidates matching the drug's own canonical or generic name
/// are dropped here so a stored record never claims to interact with itself.
pub fn build_record(
    name: &str,
    generic_name: &str,
    label: &DrugLabel,
    resolved_via: SearchField,
) -> DrugSafetyRecord {
    let corpus = label.corpus();

    let allergy_triggers = extract::extract_allergy_triggers(&corpus, generic_name);
    let interactions =
        extract::extract_interactions(&corpus, &label.drug_interactions.owned_pieces())
            .into_iter()
            .filter(|candidate| {
                let lowered = candidate.to_lowercase();
                lowered != name.to_lowercase() && lowered != generic_name.to_lowercase()
            })
            .collect();
    let pregnancy_risk = extract::extract_pregnancy_risk(&corpus);

    DrugSafetyRecord {
        name: name.to_string(),
        generic_name: generic_name.to_string(),
        interactions,
        allergy_triggers,
        banned_in: Vec::new(),
        alternatives: Vec::new(),
        notes: corpus,
        pregnancy_risk,
        source: format!("openFDA ({})", resolved_via.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_from(json: &str) -> DrugLabel {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_full_record_from_label() {
        let label = label_from(
            r#"{
                "warnings": ["Allergy alert: may cause hives. Do not use if allergic to aspirin."],
                "ask_doctor": ["Ask a doctor if you are taking warfarin."],
                "pregnancy_or_breast_feeding": ["If pregnant, ask a health professional before use."],
                "drug_interactions": ["Avoid use with blood thinners."]
            }"#,
        );

        let record = build_record("brufen", "ibuprofen", &label, SearchField::BrandName);

        assert_eq!(record.name, "brufen");
        assert_eq!(record.generic_name, "ibuprofen");
        assert!(record.allergy_triggers.contains(&"hives".to_string()));
        assert!(record.allergy_triggers.contains(&"aspirin".to_string()));
        assert!(record.interactions.contains(&"warfarin".to_string()));
        assert!(record
            .interactions
            .contains(&"Avoid use with blood thinners.".to_string()));
        assert_eq!(
            record.pregnancy_risk,
            "pregnant, ask a health professional before use."
        );
        assert_eq!(record.notes, label.corpus());
        assert_eq!(record.source, "openFDA (brand_name)");
        assert!(record.banned_in.is_empty());
        assert!(record.alternatives.is_empty());
    }

    #[test]
    fn own_names_filtered_from_interactions() {
        let label = label_from(
            r#"{"warnings": ["Do not take other drugs containing paracetamol or acetaminophen."]}"#,
        );

        let record = build_record("crocin", "paracetamol", &label, SearchField::ActiveIngredient);

        assert!(!record.interactions.contains(&"paracetamol".to_string()));
        assert!(record.interactions.contains(&"acetaminophen".to_string()));
    }

    #[test]
    fn self_filter_is_case_insensitive() {
        let label = label_from(r#"{"drug_interactions": ["Ibuprofen"]}"#);
        let record = build_record("ibuprofen", "ibuprofen", &label, SearchField::ActiveIngredient);
        assert!(record.interactions.is_empty());
    }

    #[test]
    fn empty_label_builds_empty_but_sourced_record() {
        let record = build_record(
            "metformin",
            "metformin",
            &DrugLabel::default(),
            SearchField::SubstanceName,
        );

        assert!(record.interactions.is_empty());
        assert!(record.allergy_triggers.is_empty());
        assert_eq!(record.notes, "");
        assert_eq!(record.pregnancy_risk, "");
        assert_eq!(record.source, "openFDA (substance_name)");
    }

    #[test]
    fn vague_allergy_warning_keeps_generic_as_trigger_not_interaction() {
        let label = label_from(
            r#"{"stop_use": ["Stop use if an allergic reaction to this product occurs."]}"#,
        );
        let record = build_record("allegra", "fexofenadine", &label, SearchField::BrandName);

        assert!(record
            .allergy_triggers
            .contains(&"fexofenadine".to_string()));
        assert!(record
            .allergy_triggers
            .contains(&"antihistamine".to_string()));
        assert!(!record.interactions.contains(&"fexofenadine".to_string()));
    }
}
