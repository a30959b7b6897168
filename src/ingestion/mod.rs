//! Offline ingestion pipeline: fetch regulatory drug labels, mine them for
//! safety signals, and upsert structured records into the knowledge store.

pub mod builder;
pub mod driver;
pub mod extract;
pub mod label;
pub mod openfda;
pub mod retry;

pub use driver::{IngestionDriver, IngestionSummary};
pub use label::DrugLabel;
pub use openfda::{LabelLookup, LookupError, LookupOutcome, OpenFdaClient, SearchField};
pub use retry::RetryPolicy;
