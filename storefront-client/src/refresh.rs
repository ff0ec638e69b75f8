//! Single-flight token refresh
//!
//! Concurrent 401s share one refresh call: the first caller becomes the
//! leader and runs the refresh, everyone arriving while it is in flight
//! subscribes to its outcome. Refresh-token rotation schemes invalidate the
//! credential after first use, so a second concurrent refresh would fail
//! spuriously.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// New access token, or `None` when the refresh failed
pub type RefreshOutcome = Option<String>;

/// Coalesces concurrent refresh attempts behind one in-flight future
#[derive(Debug, Default)]
pub struct RefreshFlight {
    in_flight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
}

enum Role {
    Leader,
    Follower(broadcast::Receiver<RefreshOutcome>),
}

impl RefreshFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.slot().is_some()
    }

    /// Run `refresh`, or wait for the one already running
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let role = {
            let mut slot = self.slot();
            match slot.as_ref() {
                Some(sender) => Role::Follower(sender.subscribe()),
                None => {
                    let (sender, _) = broadcast::channel(1);
                    *slot = Some(sender);
                    Role::Leader
                }
            }
        };

        match role {
            Role::Follower(mut receiver) => {
                debug!("Joining in-flight token refresh");
                // Closed means the leader was abandoned; treat as failure
                receiver.recv().await.ok().flatten()
            }
            Role::Leader => {
                let guard = LeaderGuard {
                    flight: self,
                    completed: false,
                };
                let outcome = refresh().await;
                guard.complete(outcome.clone());
                outcome
            }
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<broadcast::Sender<RefreshOutcome>>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases the in-flight slot even if the leader's future is dropped
struct LeaderGuard<'a> {
    flight: &'a RefreshFlight,
    completed: bool,
}

impl LeaderGuard<'_> {
    fn complete(mut self, outcome: RefreshOutcome) {
        let sender = self.flight.slot().take();
        if let Some(sender) = sender {
            debug!(
                waiting = sender.receiver_count(),
                success = outcome.is_some(),
                "Completing token refresh"
            );
            // No receivers is fine
            let _ = sender.send(outcome);
        }
        self.completed = true;
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.flight.slot().take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let flight = RefreshFlight::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let refresh = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Some("fresh".to_string())
        };

        let (a, b, c) = tokio::join!(flight.run(refresh), flight.run(refresh), flight.run(refresh));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.as_deref(), Some("fresh"));
        assert_eq!(b.as_deref(), Some("fresh"));
        assert_eq!(c.as_deref(), Some("fresh"));
        assert!(!flight.is_in_flight());
    }

    #[tokio::test]
    async fn test_sequential_callers_refresh_again() {
        let flight = RefreshFlight::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..2 {
            let outcome = flight
                .run(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    None
                })
                .await;
            assert_eq!(outcome, None);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_abandoned_leader_releases_slot() {
        let flight = RefreshFlight::new();

        let leader = flight.run(|| std::future::pending::<RefreshOutcome>());
        let result = tokio::time::timeout(Duration::from_millis(10), leader).await;
        assert!(result.is_err());

        assert!(!flight.is_in_flight());
    }
}
