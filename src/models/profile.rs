use serde::{Deserialize, Serialize};

/// One medication a patient currently takes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientMedicationEntry {
    pub name: String,
    pub dosage: Option<String>,
}

impl PatientMedicationEntry {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dosage: None,
        }
    }
}

/// A patient's medications, allergies and conditions.
///
/// Owned and persisted by an external collaborator; this core only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientProfile {
    pub medications: Vec<PatientMedicationEntry>,
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_from_api_shape() {
        let json = r#"{
            "medications": [{"name": "ibuprofen", "dosage": "400mg"}, {"name": "aspirin", "dosage": null}],
            "allergies": ["nsaid"],
            "conditions": ["kidney disease"]
        }"#;
        let profile: PatientProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.medications.len(), 2);
        assert_eq!(profile.medications[0].dosage.as_deref(), Some("400mg"));
        assert_eq!(profile.allergies, vec!["nsaid"]);
    }
}
