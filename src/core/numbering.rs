use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::{CORRELATIVE_WIDTH, ComprobanteConfig};
use super::error::ComprobanteError;

/// Largest sequential part that still fits the fixed width.
const MAX_CORRELATIVE: u64 = 99_999_999;

/// Format the correlative that follows `last_number` in a series.
///
/// The result is `{prefix}-{last_number + 1}` with the sequential part
/// zero-padded to 8 digits, e.g. `F001-00000100`. Numbers that would need
/// a ninth digit are rejected instead of widening the field.
///
/// ```
/// use comprobante::core::next_correlative;
///
/// assert_eq!(next_correlative("F001", 99).unwrap(), "F001-00000100");
/// assert_eq!(next_correlative("B001", 0).unwrap(), "B001-00000001");
/// ```
pub fn next_correlative(prefix: &str, last_number: u64) -> Result<String, ComprobanteError> {
    if last_number >= MAX_CORRELATIVE {
        return Err(ComprobanteError::Numbering(format!(
            "series {prefix} is exhausted at {last_number}"
        )));
    }
    Ok(format_correlative(prefix, last_number + 1))
}

fn format_correlative(prefix: &str, number: u64) -> String {
    format!("{prefix}-{number:0>width$}", width = CORRELATIVE_WIDTH)
}

/// Last issued number of one document series.
///
/// The counter is the only durable state behind document numbering. This
/// value type is what a persistence layer loads and stores; concurrent
/// issuance goes through a [`CounterStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelativeCounter {
    prefix: String,
    last_number: u64,
}

impl CorrelativeCounter {
    /// A series with nothing issued yet.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_number: 0,
        }
    }

    /// A series continuing after `last_number`.
    pub fn resuming(prefix: impl Into<String>, last_number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            last_number,
        }
    }

    /// Issue the next number, advancing the counter.
    pub fn advance(&mut self) -> Result<String, ComprobanteError> {
        let number = next_correlative(&self.prefix, self.last_number)?;
        self.last_number += 1;
        Ok(number)
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> Result<String, ComprobanteError> {
        next_correlative(&self.prefix, self.last_number)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn last_number(&self) -> u64 {
        self.last_number
    }
}

/// Port to the persistence layer's transactional primitive for counters.
///
/// `with_counter` must run `f` with the current last number of `prefix`
/// and, in the same atomic commit, store `last + 1` if and only if `f`
/// returns `Ok`. When `f` fails nothing is written. Stores using
/// optimistic concurrency return [`ComprobanteError::CounterConflict`]
/// when another writer got there first; [`CorrelativeIssuer`] retries those.
pub trait CounterStore {
    fn with_counter<T, F>(&self, prefix: &str, f: F) -> Result<T, ComprobanteError>
    where
        F: FnOnce(u64) -> Result<T, ComprobanteError>;
}

/// A number issued together with whatever the caller committed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued<T> {
    pub number: String,
    pub value: T,
}

/// Mints correlatives through a [`CounterStore`], retrying on write conflicts.
#[derive(Debug, Clone)]
pub struct CorrelativeIssuer<S> {
    store: S,
    max_attempts: u32,
}

impl<S: CounterStore> CorrelativeIssuer<S> {
    /// Issuer making up to 5 attempts per number.
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_attempts: 5,
        }
    }

    /// Issuer using the attempt budget from `config`.
    pub fn from_config(store: S, config: &ComprobanteConfig) -> Self {
        Self::new(store).with_max_attempts(config.max_issue_attempts)
    }

    /// Set the attempt budget (minimum 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue the next number of `prefix` and commit it through `commit`.
    ///
    /// `commit` receives the formatted number and performs the caller's
    /// document write. The counter advances only if it returns `Ok`; an
    /// error from `commit` is returned untouched and consumes no number.
    /// On a write conflict the whole step, `commit` included, is retried.
    pub fn issue<T, F>(&self, prefix: &str, mut commit: F) -> Result<Issued<T>, ComprobanteError>
    where
        F: FnMut(&str) -> Result<T, ComprobanteError>,
    {
        let mut attempt = 1;
        loop {
            let result = self.store.with_counter(prefix, |last| {
                let number = next_correlative(prefix, last)?;
                let value = commit(&number)?;
                Ok(Issued { number, value })
            });

            match result {
                Ok(issued) => {
                    debug!(prefix, number = %issued.number, attempt, "correlative issued");
                    return Ok(issued);
                }
                Err(ComprobanteError::CounterConflict { .. }) if attempt < self.max_attempts => {
                    warn!(prefix, attempt, "correlative counter write conflict, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Issue the next number with nothing else to commit.
    pub fn next(&self, prefix: &str) -> Result<String, ComprobanteError> {
        self.issue(prefix, |_| Ok(())).map(|issued| issued.number)
    }
}

/// Process-local [`CounterStore`] with one lock per series.
///
/// Issuance on a prefix is fully serialized: the lock is held while the
/// caller's commit runs, so conflicts never happen. Different prefixes do
/// not block each other. A commit that panics leaves its series usable,
/// since the counter only moves after the commit has returned.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCounterStore {
    series: Arc<Mutex<HashMap<String, Arc<Mutex<u64>>>>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a series with its last issued number.
    pub fn with_series(self, prefix: impl Into<String>, last_number: u64) -> Self {
        lock(&self.series).insert(prefix.into(), Arc::new(Mutex::new(last_number)));
        self
    }

    /// Snapshot of a series, if it has been used or seeded.
    pub fn counter(&self, prefix: &str) -> Option<CorrelativeCounter> {
        let cell = lock(&self.series).get(prefix).cloned()?;
        let last = *lock(&cell);
        Some(CorrelativeCounter::resuming(prefix, last))
    }

    fn cell(&self, prefix: &str) -> Arc<Mutex<u64>> {
        lock(&self.series)
            .entry(prefix.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(0)))
            .clone()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn with_counter<T, F>(&self, prefix: &str, f: F) -> Result<T, ComprobanteError>
    where
        F: FnOnce(u64) -> Result<T, ComprobanteError>,
    {
        let cell = self.cell(prefix);
        let mut last = lock(&cell);
        let value = f(*last)?;
        *last += 1;
        Ok(value)
    }
}

/// Lock ignoring poison: every guarded value here is written in one step.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
