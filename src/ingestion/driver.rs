//! Sequential ingestion of the drug catalog into the knowledge store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::DrugCatalog;
use crate::db::KnowledgeStore;
use crate::ingestion::builder::build_record;
use crate::ingestion::openfda::{LabelLookup, SearchField};
use crate::ingestion::retry::{resolve_with_retry, FieldResolution, RetryPolicy};

/// Outcome counts for one catalog run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSummary {
    pub ingested: usize,
    /// Drugs with no label under any search field, or whose lookups failed.
    pub skipped: usize,
    pub aborted: bool,
    pub duration_ms: u64,
}

/// Walks the catalog one drug at a time: each name is tried against the
/// search fields in order, the first label found wins, and the built record
/// is upserted. One drug failing never stops the batch.
pub struct IngestionDriver<'a> {
    client: &'a dyn LabelLookup,
    store: &'a dyn KnowledgeStore,
    policy: RetryPolicy,
    abort: Arc<AtomicBool>,
}

impl<'a> IngestionDriver<'a> {
    pub fn new(
        client: &'a dyn LabelLookup,
        store: &'a dyn KnowledgeStore,
        policy: RetryPolicy,
        abort: Arc<AtomicBool>,
    ) -> Self {
        Self {
            client,
            store,
            policy,
            abort,
        }
    }

    pub fn run(&self, catalog: &DrugCatalog) -> IngestionSummary {
        let started = Instant::now();
        let mut ingested = 0;
        let mut skipped = 0;
        let mut aborted = false;

        tracing::info!(drugs = catalog.len(), "Starting catalog ingestion");

        for entry in catalog.entries() {
            if self.abort.load(Ordering::SeqCst) {
                aborted = true;
                break;
            }

            match self.ingest_one(&entry.name, &entry.generic_name) {
                DrugOutcome::Ingested => ingested += 1,
                DrugOutcome::Skipped => skipped += 1,
                DrugOutcome::Aborted => {
                    aborted = true;
                    break;
                }
            }
        }

        let summary = IngestionSummary {
            ingested,
            skipped,
            aborted,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            ingested = summary.ingested,
            skipped = summary.skipped,
            aborted = summary.aborted,
            duration_ms = summary.duration_ms,
            "Catalog ingestion finished"
        );
        summary
    }

    fn ingest_one(&self, name: &str, generic_name: &str) -> DrugOutcome {
        for field in SearchField::ORDERED {
            // The label index knows generics, not local brand names; the
            // canonical name stays the store key.
            let resolution =
                resolve_with_retry(&self.policy, &self.abort, self.client, field, generic_name);
            match resolution {
                FieldResolution::Found(labels) => {
                    // limit=1 queries still answer with a list; take the first
                    let Some(label) = labels.first() else {
                        continue;
                    };
                    let record = build_record(name, generic_name, label, field);
                    if let Err(e) = self.store.upsert_by_name(&record) {
                        tracing::error!(drug = name, error = %e, "Failed to store record");
                        return DrugOutcome::Skipped;
                    }
                    tracing::info!(
                        drug = name,
                        field = field.as_str(),
                        interactions = record.interactions.len(),
                        allergy_triggers = record.allergy_triggers.len(),
                        "Ingested drug record"
                    );
                    return DrugOutcome::Ingested;
                }
                FieldResolution::NotFound => continue,
                FieldResolution::DefinitiveFailure(e) | FieldResolution::Exhausted(e) => {
                    tracing::warn!(
                        drug = name,
                        field = field.as_str(),
                        error = %e,
                        "Lookup failed, trying next field"
                    );
                    continue;
                }
                FieldResolution::Aborted => return DrugOutcome::Aborted,
            }
        }

        tracing::warn!(drug = name, "No label found under any search field, skipping");
        DrugOutcome::Skipped
    }
}

enum DrugOutcome {
    Ingested,
    Skipped,
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::db::open_memory_database;
    use crate::db::repository::SqliteKnowledgeStore;
    use crate::db::repository::drug_info::get_drug_info;
    use crate::ingestion::label::DrugLabel;
    use crate::ingestion::openfda::{LookupError, LookupOutcome};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::ZERO,
        }
    }

    fn warning_label(text: &str) -> DrugLabel {
        serde_json::from_str(&format!(r#"{{"warnings": ["{text}"]}}"#)).unwrap()
    }

    /// Answers only under the configured field; NotFound elsewhere.
    struct SingleFieldLookup {
        answers_under: SearchField,
        label_text: String,
        calls: AtomicUsize,
    }

    impl LabelLookup for SingleFieldLookup {
        fn lookup(&self, field: SearchField, _value: &str) -> Result<LookupOutcome, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if field == self.answers_under {
                Ok(LookupOutcome::Found(vec![warning_label(&self.label_text)]))
            } else {
                Ok(LookupOutcome::NotFound)
            }
        }
    }

    struct NeverFoundLookup;

    impl LabelLookup for NeverFoundLookup {
        fn lookup(&self, _field: SearchField, _value: &str) -> Result<LookupOutcome, LookupError> {
            Ok(LookupOutcome::NotFound)
        }
    }

    #[test]
    fn falls_through_fields_until_label_found() {
        let client = SingleFieldLookup {
            answers_under: SearchField::BrandName,
            label_text: "Allergy alert: hives.".into(),
            calls: AtomicUsize::new(0),
        };
        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(
            &client,
            &store,
            fast_policy(),
            Arc::new(AtomicBool::new(false)),
        );

        let summary = driver.run(&DrugCatalog::load_test());

        // load_test carries two entries; each walks all three fields
        assert_eq!(summary.ingested, 2);
        assert_eq!(summary.skipped, 0);
        assert!(!summary.aborted);
        assert_eq!(client.calls.load(Ordering::SeqCst), 6);

        let stored = get_drug_info(store.connection(), "crocin").unwrap().unwrap();
        assert_eq!(stored.generic_name, "paracetamol");
        assert_eq!(stored.source, "openFDA (brand_name)");
        assert!(stored.allergy_triggers.contains(&"hives".to_string()));
    }

    #[test]
    fn brand_entries_queried_by_generic_stored_by_canonical_name() {
        /// Records every value the driver queries.
        struct RecordingLookup {
            values: std::sync::Mutex<Vec<String>>,
        }

        impl LabelLookup for RecordingLookup {
            fn lookup(&self, field: SearchField, value: &str) -> Result<LookupOutcome, LookupError> {
                self.values.lock().unwrap().push(value.to_string());
                if field == SearchField::ActiveIngredient {
                    Ok(LookupOutcome::Found(vec![warning_label("Allergy alert.")]))
                } else {
                    Ok(LookupOutcome::NotFound)
                }
            }
        }

        let client = RecordingLookup {
            values: std::sync::Mutex::new(Vec::new()),
        };
        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(
            &client,
            &store,
            fast_policy(),
            Arc::new(AtomicBool::new(false)),
        );

        // load_test maps the brand name crocin to the generic paracetamol
        let summary = driver.run(&DrugCatalog::load_test());
        assert_eq!(summary.ingested, 2);

        let values = client.values.lock().unwrap();
        assert!(values.contains(&"paracetamol".to_string()));
        assert!(
            !values.iter().any(|v| v == "crocin"),
            "The label index is queried by generic name, never by brand name"
        );

        let stored = get_drug_info(store.connection(), "crocin").unwrap().unwrap();
        assert_eq!(stored.name, "crocin");
        assert_eq!(stored.generic_name, "paracetamol");
    }

    #[test]
    fn unresolvable_drugs_are_skipped_not_fatal() {
        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(
            &NeverFoundLookup,
            &store,
            fast_policy(),
            Arc::new(AtomicBool::new(false)),
        );

        let summary = driver.run(&DrugCatalog::load_test());

        assert_eq!(summary.ingested, 0);
        assert_eq!(summary.skipped, 2);
        assert!(!summary.aborted);
    }

    #[test]
    fn lookup_failure_on_one_field_tries_next_field() {
        struct FirstFieldFails;

        impl LabelLookup for FirstFieldFails {
            fn lookup(
                &self,
                field: SearchField,
                _value: &str,
            ) -> Result<LookupOutcome, LookupError> {
                match field {
                    SearchField::ActiveIngredient => Err(LookupError::Http {
                        status: 500,
                        body: "server error".into(),
                    }),
                    _ => Ok(LookupOutcome::Found(vec![warning_label(
                        "Do not use with sedatives.",
                    )])),
                }
            }
        }

        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(
            &FirstFieldFails,
            &store,
            fast_policy(),
            Arc::new(AtomicBool::new(false)),
        );

        let summary = driver.run(&DrugCatalog::load_test());

        assert_eq!(summary.ingested, 2);
        let stored = get_drug_info(store.connection(), "ibuprofen")
            .unwrap()
            .unwrap();
        assert_eq!(stored.source, "openFDA (substance_name)");
        assert!(stored.interactions.contains(&"sedatives".to_string()));
    }

    #[test]
    fn transient_failures_retried_then_ingested() {
        struct FlakyLookup {
            calls: AtomicUsize,
        }

        impl LabelLookup for FlakyLookup {
            fn lookup(
                &self,
                _field: SearchField,
                _value: &str,
            ) -> Result<LookupOutcome, LookupError> {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                if call == 0 {
                    Err(LookupError::Network("connection reset".into()))
                } else {
                    Ok(LookupOutcome::Found(vec![warning_label("Allergy alert.")]))
                }
            }
        }

        let client = FlakyLookup {
            calls: AtomicUsize::new(0),
        };
        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(
            &client,
            &store,
            fast_policy(),
            Arc::new(AtomicBool::new(false)),
        );

        let summary = driver.run(&DrugCatalog::load_test());
        assert_eq!(summary.ingested, 2);
    }

    #[test]
    fn abort_flag_stops_batch_between_drugs() {
        /// Trips the abort flag during the first drug's lookup.
        struct AbortingLookup {
            abort: Arc<AtomicBool>,
        }

        impl LabelLookup for AbortingLookup {
            fn lookup(
                &self,
                _field: SearchField,
                _value: &str,
            ) -> Result<LookupOutcome, LookupError> {
                self.abort.store(true, Ordering::SeqCst);
                Ok(LookupOutcome::Found(vec![warning_label("Allergy alert.")]))
            }
        }

        let abort = Arc::new(AtomicBool::new(false));
        let client = AbortingLookup {
            abort: Arc::clone(&abort),
        };
        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(&client, &store, fast_policy(), abort);

        let summary = driver.run(&DrugCatalog::load_test());

        assert!(summary.aborted);
        assert_eq!(summary.ingested, 1, "First drug completes, rest abandoned");
    }

    #[test]
    fn rerun_overwrites_rather_than_duplicates() {
        let client = SingleFieldLookup {
            answers_under: SearchField::ActiveIngredient,
            label_text: "Allergy alert.".into(),
            calls: AtomicUsize::new(0),
        };
        let store = SqliteKnowledgeStore::new(open_memory_database().unwrap());
        let driver = IngestionDriver::new(
            &client,
            &store,
            fast_policy(),
            Arc::new(AtomicBool::new(false)),
        );

        let catalog = DrugCatalog::load_test();
        driver.run(&catalog);
        driver.run(&catalog);

        let all = crate::db::repository::drug_info::get_all_drug_info(store.connection()).unwrap();
        assert_eq!(all.len(), 2);
    }
}
