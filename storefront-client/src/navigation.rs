//! Login redirect on unrecoverable authentication failure
//!
//! Hosts plug a [`LoginRedirect`] into the gateway's event handlers. When the
//! refresh credential is refused it sends the user to the login route, unless
//! the current route is public.

use serde::Deserialize;
use tracing::info;

use crate::events::{AuthEvent, AuthEventHandler};

/// Host navigation primitive
pub trait Navigator: Send + Sync {
    /// Path of the route currently shown, e.g. `/cart`
    fn current_path(&self) -> String;

    /// Navigate to `path`
    fn redirect(&self, path: &str);
}

/// Allow-list of routes exempt from the forced login redirect
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteGuard {
    /// Route to send the user to
    pub login_path: String,
    /// Routes matched exactly
    pub public_routes: Vec<String>,
    /// Routes matched by prefix
    pub public_prefixes: Vec<String>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            public_routes: vec!["/".to_string(), "/login".to_string()],
            public_prefixes: vec!["/product".to_string()],
        }
    }
}

impl RouteGuard {
    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.iter().any(|route| route == path)
            || self
                .public_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Where to send a user whose session expired on `current_path`
    pub fn redirect_target(&self, current_path: &str) -> Option<&str> {
        if self.is_public(current_path) {
            None
        } else {
            Some(&self.login_path)
        }
    }
}

/// [`AuthEventHandler`] that redirects to login when the session expires
pub struct LoginRedirect<N> {
    guard: RouteGuard,
    navigator: N,
}

impl<N: Navigator> LoginRedirect<N> {
    pub fn new(navigator: N) -> Self {
        Self::with_guard(RouteGuard::default(), navigator)
    }

    pub fn with_guard(guard: RouteGuard, navigator: N) -> Self {
        Self { guard, navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}

impl<N: Navigator> AuthEventHandler for LoginRedirect<N> {
    fn on_event(&self, event: &AuthEvent) {
        if *event != AuthEvent::SessionExpired {
            return;
        }

        let current = self.navigator.current_path();
        if let Some(target) = self.guard.redirect_target(&current) {
            info!(from = %current, to = %target, "Session expired, redirecting to login");
            self.navigator.redirect(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeNavigator {
        path: String,
        redirects: Mutex<Vec<String>>,
    }

    impl FakeNavigator {
        fn at(path: &str) -> Self {
            Self {
                path: path.to_string(),
                redirects: Mutex::new(Vec::new()),
            }
        }

        fn redirects(&self) -> Vec<String> {
            self.redirects.lock().unwrap().clone()
        }
    }

    impl Navigator for FakeNavigator {
        fn current_path(&self) -> String {
            self.path.clone()
        }

        fn redirect(&self, path: &str) {
            self.redirects.lock().unwrap().push(path.to_string());
        }
    }

    #[test]
    fn test_default_allow_list() {
        let guard = RouteGuard::default();
        assert!(guard.is_public("/"));
        assert!(guard.is_public("/login"));
        assert!(guard.is_public("/product"));
        assert!(guard.is_public("/product?id=42"));
        assert!(!guard.is_public("/cart"));
        assert!(!guard.is_public("/history"));
        assert!(!guard.is_public("/admin/user"));
        assert!(!guard.is_public("/login/extra"));
    }

    #[test]
    fn test_redirects_from_protected_route() {
        let redirect = LoginRedirect::new(FakeNavigator::at("/cart"));
        redirect.on_event(&AuthEvent::SessionExpired);
        assert_eq!(redirect.navigator().redirects(), vec!["/login".to_string()]);
    }

    #[test]
    fn test_stays_on_public_route() {
        let redirect = LoginRedirect::new(FakeNavigator::at("/"));
        redirect.on_event(&AuthEvent::SessionExpired);
        assert!(redirect.navigator().redirects().is_empty());
    }

    #[test]
    fn test_ignores_other_events() {
        let redirect = LoginRedirect::new(FakeNavigator::at("/cart"));
        redirect.on_event(&AuthEvent::TokenRefreshed);
        redirect.on_event(&AuthEvent::RefreshFailed { status: Some(500) });
        assert!(redirect.navigator().redirects().is_empty());
    }
}
