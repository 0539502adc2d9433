//! The compute-then-record flow shared by the interactive screen and the
//! one-shot CLI commands. It owns the injected store so neither front-end
//! talks to SQLite directly.

use anyhow::Result;
use tracing::debug;

use crate::calculator::{compute, should_record};
use crate::db::RecordStore;
use crate::models::{BmiRecord, Outcome};

/// Everything a front-end needs to refresh after one compute action.
#[derive(Debug, Clone)]
pub struct Submission {
    pub outcome: Outcome,
    /// `None` when the outcome was invalid and invalid results are not kept.
    pub record: Option<BmiRecord>,
    /// Fresh listing read after the append.
    pub history: Vec<BmiRecord>,
}

pub struct Tracker {
    store: Box<dyn RecordStore>,
    record_invalid: bool,
}

impl Tracker {
    pub fn new(store: Box<dyn RecordStore>, record_invalid: bool) -> Self {
        Self {
            store,
            record_invalid,
        }
    }

    /// Calculator step only; empty fields yield `None`.
    pub fn compute(&self, weight: &str, height: &str) -> Option<Outcome> {
        compute(weight, height)
    }

    /// Persist an outcome for the given raw inputs if the policy allows it.
    pub fn record(
        &self,
        outcome: &Outcome,
        weight: &str,
        height: &str,
    ) -> Result<Option<BmiRecord>> {
        if !should_record(outcome, self.record_invalid) {
            debug!(bmi = %outcome.formatted, "skipping invalid BMI result");
            return Ok(None);
        }
        self.store
            .append(&outcome.formatted, weight, height)
            .map(Some)
    }

    pub fn history(&self) -> Result<Vec<BmiRecord>> {
        self.store.list_all()
    }

    /// Compute, record, and re-read history in one go. Returns `Ok(None)` for
    /// the empty-field no-op.
    pub fn submit(&self, weight: &str, height: &str) -> Result<Option<Submission>> {
        let Some(outcome) = self.compute(weight, height) else {
            return Ok(None);
        };

        let record = self.record(&outcome, weight, height)?;
        let history = self.history()?;
        Ok(Some(Submission {
            outcome,
            record,
            history,
        }))
    }

    pub fn storage_enabled(&self) -> bool {
        self.store.is_persistent()
    }
}
