//! Authentication events emitted by the gateway
//!
//! The gateway never navigates on its own. It reports what happened to the
//! session and the host decides what to do about it (see
//! [`crate::navigation::LoginRedirect`]).

use std::sync::Mutex;

/// Session-level outcome observed while dispatching a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A silent refresh produced a new access token
    TokenRefreshed,
    /// A silent refresh did not produce a token; `status` is absent for
    /// transport failures
    RefreshFailed { status: Option<u16> },
    /// The refresh credential itself was refused (refresh endpoint answered
    /// 403); only a fresh login can recover
    SessionExpired,
}

/// Subscriber for [`AuthEvent`]s
///
/// Handlers run inline, before the `send` that triggered the event returns,
/// so they must not block.
pub trait AuthEventHandler: Send + Sync {
    fn on_event(&self, event: &AuthEvent);
}

impl<F> AuthEventHandler for F
where
    F: Fn(&AuthEvent) + Send + Sync,
{
    fn on_event(&self, event: &AuthEvent) {
        self(event)
    }
}

/// Handler that keeps every event it sees
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<AuthEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first
    pub fn events(&self) -> Vec<AuthEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self, event: &AuthEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

impl AuthEventHandler for EventLog {
    fn on_event(&self, event: &AuthEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
