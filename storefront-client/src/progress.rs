//! Request progress signalling
//!
//! Drives a global loading indicator. Purely cosmetic: nothing in the
//! gateway's contract depends on it.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::trace;

/// Receives start/stop notifications around every gateway call
pub trait ProgressListener: Send + Sync {
    fn start(&self);
    fn done(&self);
}

/// Logs request activity at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressListener for TracingProgress {
    fn start(&self) {
        trace!("request started");
    }

    fn done(&self) {
        trace!("request finished");
    }
}

/// Counts in-flight requests; a spinner is shown while `is_active`
#[derive(Debug, Default)]
pub struct LoadingIndicator {
    active: AtomicUsize,
    started: AtomicU64,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    /// Requests currently in flight
    pub fn in_flight(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Requests started since creation
    pub fn total_started(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }
}

impl ProgressListener for LoadingIndicator {
    fn start(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    fn done(&self) {
        // Saturate so an unmatched done() cannot wrap the counter
        let _ = self
            .active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

/// Brackets a request; `done` fires on drop, including when the request
/// future is abandoned mid-flight
pub(crate) struct ProgressGuard<'a> {
    listener: &'a dyn ProgressListener,
}

impl<'a> ProgressGuard<'a> {
    pub(crate) fn start(listener: &'a dyn ProgressListener) -> Self {
        listener.start();
        Self { listener }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.listener.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_brackets_activity() {
        let indicator = LoadingIndicator::new();
        {
            let _outer = ProgressGuard::start(&indicator);
            let _inner = ProgressGuard::start(&indicator);
            assert_eq!(indicator.in_flight(), 2);
        }
        assert!(!indicator.is_active());
        assert_eq!(indicator.total_started(), 2);
    }

    #[test]
    fn test_unmatched_done_saturates() {
        let indicator = LoadingIndicator::new();
        indicator.done();
        assert_eq!(indicator.in_flight(), 0);
    }
}
