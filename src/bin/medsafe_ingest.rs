//! Offline batch: fetch labels for the drug catalog and populate the
//! knowledge store. Run it again any time to refresh stored records.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medsafe_core::config::{self, DrugCatalog};
use medsafe_core::db::{open_database, repository::SqliteKnowledgeStore};
use medsafe_core::ingestion::{IngestionDriver, OpenFdaClient, RetryPolicy};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        tracing::error!(error = %e, "Ingestion failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        app = config::APP_NAME,
        version = config::APP_VERSION,
        "Starting label ingestion"
    );

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let db_path = config::knowledge_db_path();
    tracing::info!(db = %db_path.display(), "Opening knowledge store");
    let store = SqliteKnowledgeStore::new(open_database(&db_path)?);

    let catalog = match std::env::args().nth(1) {
        Some(path) => DrugCatalog::load(std::path::Path::new(&path))?,
        None => DrugCatalog::load_default(),
    };

    let client = OpenFdaClient::new();
    let driver = IngestionDriver::new(
        &client,
        &store,
        RetryPolicy::default(),
        Arc::new(AtomicBool::new(false)),
    );

    let summary = driver.run(&catalog);
    if summary.ingested == 0 {
        return Err("No drugs ingested".into());
    }
    Ok(())
}
