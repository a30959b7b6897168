//! Blocking client for the openFDA drug-label endpoint.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::ingestion::label::DrugLabel;

const DEFAULT_BASE_URL: &str = "https://api.fda.gov";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Label index fields a drug name can be searched under, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    ActiveIngredient,
    SubstanceName,
    BrandName,
}

impl SearchField {
    /// Query order: most specific field first.
    pub const ORDERED: [SearchField; 3] = [
        SearchField::ActiveIngredient,
        SearchField::SubstanceName,
        SearchField::BrandName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::ActiveIngredient => "active_ingredient",
            SearchField::SubstanceName => "substance_name",
            SearchField::BrandName => "brand_name",
        }
    }
}

/// A lookup that completed without a transport or protocol failure.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(Vec<DrugLabel>),
    /// The index has no label under this field. Definitive, not retryable.
    NotFound,
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Network error reaching label service: {0}")]
    Network(String),

    #[error("Label service timed out after {0}s")]
    Timeout(u64),

    #[error("Label service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse label response: {0}")]
    ResponseParsing(String),
}

impl LookupError {
    /// Transient failures are worth retrying; the rest are definitive.
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Network(_) | LookupError::Timeout(_))
    }
}

/// Seam between the ingestion driver and the label source, so tests can
/// substitute scripted responses.
pub trait LabelLookup {
    fn lookup(&self, field: SearchField, value: &str) -> Result<LookupOutcome, LookupError>;
}

#[derive(Deserialize)]
struct LabelSearchResponse {
    #[serde(default)]
    results: Vec<DrugLabel>,
}

pub struct OpenFdaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout_secs: u64,
}

impl OpenFdaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for OpenFdaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelLookup for OpenFdaClient {
    fn lookup(&self, field: SearchField, value: &str) -> Result<LookupOutcome, LookupError> {
        let url = format!("{}/drug/label.json", self.base_url);
        let search = format!("{}:{}", field.as_str(), value);

        tracing::debug!(field = field.as_str(), value, "Querying label service");

        let response = self
            .client
            .get(&url)
            .query(&[("search", search.as_str()), ("limit", "1")])
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout(self.timeout_secs)
                } else {
                    LookupError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        // The label index answers misses with 404 rather than an empty set
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LookupError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: LabelSearchResponse = response
            .json()
            .map_err(|e| LookupError::ResponseParsing(e.to_string()))?;

        if parsed.results.is_empty() {
            Ok(LookupOutcome::NotFound)
        } else {
            Ok(LookupOutcome::Found(parsed.results))
        }
    }
}
