//! Bounded retry with exponential backoff for label lookups.
//!
//! The retry control flow is an explicit state machine rather than a loop
//! condition: each attempt's outcome advances `RetryState`, and only the
//! policy decides whether a transient failure earns another attempt. Only
//! transient failures (network, timeout) are retried; a definitive answer
//! from the service, positive or negative, is terminal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ingestion::label::DrugLabel;
use crate::ingestion::openfda::{LabelLookup, LookupError, LookupOutcome, SearchField};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Progression of one (drug, field) resolution. Starts at `Attempting(1)`;
/// every other variant is terminal.
#[derive(Debug)]
pub enum RetryState {
    Attempting(u32),
    Success(Vec<DrugLabel>),
    /// The service definitively has no label under this field.
    NotFound,
    /// A failure retrying cannot fix (HTTP error, unparseable response).
    DefinitiveFailure(LookupError),
    /// Transient failures used up the attempt budget; carries the last error.
    Exhausted(LookupError),
}

impl RetryPolicy {
    /// Delay before retrying after the given failed attempt (1-based):
    /// base, 2x base, 4x base, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Advance the state machine with the outcome of attempt `attempt`.
    pub fn advance(
        &self,
        attempt: u32,
        outcome: Result<LookupOutcome, LookupError>,
    ) -> RetryState {
        match outcome {
            Ok(LookupOutcome::Found(labels)) => RetryState::Success(labels),
            Ok(LookupOutcome::NotFound) => RetryState::NotFound,
            Err(e) if !e.is_transient() => RetryState::DefinitiveFailure(e),
            Err(e) if attempt >= self.max_attempts => RetryState::Exhausted(e),
            Err(_) => RetryState::Attempting(attempt + 1),
        }
    }
}

/// Terminal outcome of resolving one (drug, field) pair under retry.
#[derive(Debug)]
pub enum FieldResolution {
    Found(Vec<DrugLabel>),
    NotFound,
    DefinitiveFailure(LookupError),
    Exhausted(LookupError),
    Aborted,
}

/// Drive the state machine to a terminal state, sleeping between transient
/// failures and honoring the abort flag between attempts.
pub fn resolve_with_retry(
    policy: &RetryPolicy,
    abort: &AtomicBool,
    client: &dyn LabelLookup,
    field: SearchField,
    value: &str,
) -> FieldResolution {
    let mut state = RetryState::Attempting(1);
    loop {
        let attempt = match state {
            RetryState::Attempting(n) => n,
            RetryState::Success(labels) => return FieldResolution::Found(labels),
            RetryState::NotFound => return FieldResolution::NotFound,
            RetryState::DefinitiveFailure(e) => return FieldResolution::DefinitiveFailure(e),
            RetryState::Exhausted(e) => return FieldResolution::Exhausted(e),
        };

        if abort.load(Ordering::SeqCst) {
            return FieldResolution::Aborted;
        }

        state = policy.advance(attempt, client.lookup(field, value));

        if let RetryState::Attempting(next) = state {
            let delay = policy.backoff(attempt);
            tracing::warn!(
                field = field.as_str(),
                value,
                attempt,
                next_attempt = next,
                delay_ms = delay.as_millis() as u64,
                "Transient lookup failure, retrying"
            );
            std::thread::sleep(delay);
        }
    }
}
