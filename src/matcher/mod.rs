//! Stateless cross-reference of a patient profile against stored drug
//! safety records.

pub mod assemble;
pub mod engine;

pub use assemble::{MatchReport, VerdictCounts};
pub use engine::CrossReferenceMatcher;
