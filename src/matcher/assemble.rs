//! Final report assembly around the raw verdict list.

use std::time::Instant;

use serde::Serialize;

use crate::db::{DatabaseError, KnowledgeStore};
use crate::matcher::engine::CrossReferenceMatcher;
use crate::models::{MedicationVerdict, PatientProfile};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerdictCounts {
    /// Medications with a stored record (flagged or clean).
    pub checked: usize,
    /// Medications with at least one issue.
    pub flagged: usize,
    pub total_issues: usize,
}

/// Everything a caller needs to present one cross-reference run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub verdicts: Vec<MedicationVerdict>,
    pub counts: VerdictCounts,
    pub processing_time_ms: u64,
}

impl MatchReport {
    pub fn from_verdicts(verdicts: Vec<MedicationVerdict>, processing_time_ms: u64) -> Self {
        let flagged = verdicts.iter().filter(|v| !v.issues.is_empty()).count();
        let total_issues = verdicts.iter().map(|v| v.issues.len()).sum();
        let counts = VerdictCounts {
            checked: verdicts.len(),
            flagged,
            total_issues,
        };
        Self {
            verdicts,
            counts,
            processing_time_ms,
        }
    }
}

/// Run a full timed cross-reference against the store.
pub fn run_cross_reference(
    matcher: &CrossReferenceMatcher,
    profile: &PatientProfile,
    store: &dyn KnowledgeStore,
) -> Result<MatchReport, DatabaseError> {
    let started = Instant::now();
    let verdicts = matcher.evaluate_from_store(profile, store)?;
    let report = MatchReport::from_verdicts(verdicts, started.elapsed().as_millis() as u64);

    tracing::info!(
        checked = report.counts.checked,
        flagged = report.counts.flagged,
        total_issues = report.counts.total_issues,
        processing_time_ms = report.processing_time_ms,
        "Cross-reference complete"
    );
    Ok(report)
}
