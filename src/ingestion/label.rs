use serde::Deserialize;

/// A label section that may be absent, a single string, or a list of strings.
/// openFDA emits lists; other label feeds emit bare strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SectionText {
    One(String),
    Many(Vec<String>),
}

impl Default for SectionText {
    fn default() -> Self {
        SectionText::Many(Vec::new())
    }
}

impl SectionText {
    pub fn pieces(&self) -> Vec<&str> {
        match self {
            SectionText::One(s) => vec![s.as_str()],
            SectionText::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }

    pub fn owned_pieces(&self) -> Vec<String> {
        self.pieces().into_iter().map(str::to_string).collect()
    }
}

/// Raw regulatory label as returned by the lookup service.
///
/// Only the warning-bearing sections matter to extraction; everything else in
/// the payload is ignored during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrugLabel {
    #[serde(default)]
    pub warnings: SectionText,
    #[serde(default)]
    pub boxed_warning: SectionText,
    #[serde(default)]
    pub do_not_use: SectionText,
    #[serde(default)]
    pub ask_doctor: SectionText,
    #[serde(default)]
    pub ask_doctor_or_pharmacist: SectionText,
    #[serde(default)]
    pub stop_use: SectionText,
    #[serde(default)]
    pub pregnancy_or_breast_feeding: SectionText,
    /// Explicit interaction statements, included verbatim in extraction.
    #[serde(default)]
    pub drug_interactions: SectionText,
}

impl DrugLabel {
    /// Merge all warning sections into one lowercase searchable corpus.
    /// Missing sections contribute nothing; section order is fixed.
    pub fn corpus(&self) -> String {
        let sections = [
            &self.warnings,
            &self.boxed_warning,
            &self.do_not_use,
            &self.ask_doctor,
            &self.ask_doctor_or_pharmacist,
            &self.stop_use,
            &self.pregnancy_or_breast_feeding,
        ];

        sections
            .iter()
            .flat_map(|s| s.pieces())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
