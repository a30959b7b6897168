pub mod drug;
pub mod profile;
pub mod verdict;

pub use drug::DrugSafetyRecord;
pub use profile::{PatientMedicationEntry, PatientProfile};
pub use verdict::MedicationVerdict;
