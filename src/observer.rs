//! Per-iteration progress reporting.

use serde::Serialize;

/// One pass of the fixed-point loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IterationRecord {
    /// One-based iteration counter.
    pub iteration: usize,
    /// Sup-norm distance between the new and previous value functions.
    pub norm: f64,
}

/// Receives an [`IterationRecord`] after every Bellman update, in iteration order.
pub trait IterationObserver {
    fn on_iteration(&mut self, record: &IterationRecord);
}

impl<F> IterationObserver for F
where
    F: FnMut(&IterationRecord),
{
    fn on_iteration(&mut self, record: &IterationRecord) {
        self(record)
    }
}

/// Forwards every record to the `log` facade at `info` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl IterationObserver for LogObserver {
    fn on_iteration(&mut self, record: &IterationRecord) {
        log::info!("iteration: {} norm: {}", record.iteration, record.norm);
    }
}

/// Keeps every record so the norm sequence can be inspected after solving.
#[derive(Clone, Debug, Default)]
pub struct NormHistory {
    records: Vec<IterationRecord>,
}

impl NormHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    /// Norms in iteration order.
    pub fn norms(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.norm).collect()
    }
}

impl IterationObserver for NormHistory {
    fn on_iteration(&mut self, record: &IterationRecord) {
        self.records.push(*record);
    }
}
