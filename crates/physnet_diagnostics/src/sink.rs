//! Collects diagnostics from designs lowered in parallel.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Shared destination for every diagnostic of a lowering run.
///
/// `physnet run` hands one sink to all designs it lowers on the rayon pool.
/// Per-severity totals are kept outside the lock and survive draining, so the
/// closing summary line can be printed after the diagnostics were rendered.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    totals: [AtomicUsize; 3],
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // Pushes are single calls, so a poisoned vector is still whole.
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.totals[diag.severity.rank()].fetch_add(1, Ordering::Relaxed);
        self.lock().push(diag);
    }

    /// Number of diagnostics of `severity` emitted so far, drained or not.
    pub fn count(&self, severity: Severity) -> usize {
        self.totals[severity.rank()].load(Ordering::Relaxed)
    }

    /// Returns `true` once any design reported an error.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Drains the sink, keeping only diagnostics at or above `threshold`.
    pub fn take_at_least(&self, threshold: Severity) -> Vec<Diagnostic> {
        let mut drained = std::mem::take(&mut *self.lock());
        drained.retain(|d| d.severity >= threshold);
        drained
    }

    /// Drains every diagnostic.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        self.take_at_least(Severity::Note)
    }

    /// Copies the diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}
