//! Authenticated request gateway
//!
//! Single chokepoint for every API call:
//! - attaches `Authorization: Bearer <token>` from the session store
//! - normalizes every outcome into an [`Envelope`]
//! - recovers from an expired access token with one refresh and one retry
//! - drops the session and reports [`AuthEvent::SessionExpired`] when the
//!   refresh credential is refused
//!
//! ```text
//! Idle ──401──▶ Unauthorized ──▶ Refreshing ──token──▶ Retried (result returned as-is)
//!                                    │
//!                                    └──no token──▶ RefreshFailed (original 401 returned)
//! ```

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::envelope::{ApiFailure, Envelope};
use crate::error::{GatewayError, Result};
use crate::events::{AuthEvent, AuthEventHandler};
use crate::progress::{ProgressGuard, ProgressListener, TracingProgress};
use crate::refresh::RefreshFlight;
use crate::request::{bearer_value, RequestBody, RequestDescriptor};
use crate::session::{MemorySession, SessionStore};

/// Error label for a request the gateway could not even build
const INVALID_REQUEST: &str = "Invalid Request";

/// Authenticated request gateway
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use storefront_client::{Gateway, GatewayConfig, MemorySession, RequestDescriptor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = Gateway::new(
///     GatewayConfig::new("http://localhost:8080"),
///     Arc::new(MemorySession::new()),
/// )?;
///
/// let envelope = gateway.send(RequestDescriptor::get("/api/v1/auth/account")).await;
/// if let Some(account) = envelope.data() {
///     println!("{}", account);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Gateway {
    config: GatewayConfig,
    base_url: String,
    client: Client,
    session: Arc<dyn SessionStore>,
    progress: Arc<dyn ProgressListener>,
    handlers: Vec<Arc<dyn AuthEventHandler>>,
    refresh: RefreshFlight,
}

/// Builder for [`Gateway`]
pub struct GatewayBuilder {
    config: GatewayConfig,
    session: Option<Arc<dyn SessionStore>>,
    progress: Option<Arc<dyn ProgressListener>>,
    handlers: Vec<Arc<dyn AuthEventHandler>>,
}

impl GatewayBuilder {
    /// Session store shared with the rest of the application
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressListener>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Subscribe a handler to authentication events
    pub fn on_auth_event(mut self, handler: Arc<dyn AuthEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> Result<Gateway> {
        let config = self.config;

        reqwest::Url::parse(&config.base_url).map_err(|e| GatewayError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut client = Client::builder().cookie_store(config.with_credentials);
        // Zero disables the timeout
        if config.timeout_secs > 0 {
            client = client.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = client.build()?;

        info!(
            base_url = %config.base_url,
            with_credentials = config.with_credentials,
            coalesce_refresh = config.coalesce_refresh,
            "Gateway initialized"
        );

        Ok(Gateway {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
            client,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(MemorySession::new())),
            progress: self.progress.unwrap_or_else(|| Arc::new(TracingProgress)),
            handlers: self.handlers,
            refresh: RefreshFlight::new(),
        })
    }
}

impl Gateway {
    /// Create a gateway with default progress reporting and no event handlers
    pub fn new(config: GatewayConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
        Self::builder(config).session(session).build()
    }

    pub fn builder(config: GatewayConfig) -> GatewayBuilder {
        GatewayBuilder {
            config,
            session: None,
            progress: None,
            handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Issue one API call
    ///
    /// Always resolves to an envelope. An `Authorization` header set by the
    /// caller is discarded; the gateway owns it.
    pub async fn send(&self, mut request: RequestDescriptor) -> Envelope {
        if request.take_authorization().is_some() {
            warn!(path = %request.path, "Dropping caller-supplied Authorization header");
        }

        let _progress = ProgressGuard::start(self.progress.as_ref());
        self.execute(&mut request).await
    }

    /// [`Gateway::send`] with the success payload decoded into `T`
    pub async fn send_as<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Envelope<T> {
        self.send(request).await.decode()
    }

    // ==================== Refresh-and-retry ====================

    async fn execute(&self, request: &mut RequestDescriptor) -> Envelope {
        let sent_with = self.session.access_token();
        let first = self.dispatch(request, true).await;

        if !first.failure().is_some_and(ApiFailure::is_unauthorized) {
            return first;
        }
        if request.has_retry_marker() {
            debug!(path = %request.path, "Retried request unauthorized again, giving up");
            return first;
        }
        if request.path == self.config.refresh_path {
            return first;
        }

        let token = if self.config.coalesce_refresh {
            match self.session.access_token() {
                // Another caller already refreshed after this request went out
                Some(current) if sent_with.as_ref() != Some(&current) => {
                    debug!(path = %request.path, "Access token rotated concurrently, reusing it");
                    Some(current)
                }
                _ => self.refresh.run(|| self.perform_refresh()).await,
            }
        } else {
            self.perform_refresh().await
        };

        let token = match token {
            Some(token) => token,
            None => return first,
        };

        request.mark_retry();
        if let Err(e) = request.set_bearer(&token) {
            warn!(error = %e, "Refreshed token is not a valid header value");
            return first;
        }

        let retried = self.dispatch(request, true).await;
        debug!(
            path = %request.path,
            success = retried.is_success(),
            status = ?retried.status(),
            "Retried request after token refresh"
        );
        retried
    }

    async fn perform_refresh(&self) -> Option<String> {
        let request = RequestDescriptor::get(self.config.refresh_path.clone());

        match self.dispatch(&request, false).await {
            Envelope::Success { data, .. } => {
                match data.get("access_token").and_then(Value::as_str) {
                    Some(token) => {
                        self.session.set_access_token(token.to_string());
                        info!("Access token refreshed");
                        self.emit(AuthEvent::TokenRefreshed);
                        Some(token.to_string())
                    }
                    None => {
                        warn!("Refresh response carried no access token");
                        self.emit(AuthEvent::RefreshFailed { status: None });
                        None
                    }
                }
            }
            Envelope::Failure(failure) => {
                warn!(status = ?failure.status, error = %failure.error, "Token refresh failed");
                self.emit(AuthEvent::RefreshFailed {
                    status: failure.status,
                });
                None
            }
        }
    }

    // ==================== Transport ====================

    /// One HTTP exchange, normalized
    ///
    /// `attach_session` adds the session's bearer token unless the request
    /// already carries a gateway-set `Authorization` header.
    async fn dispatch(&self, request: &RequestDescriptor, attach_session: bool) -> Envelope {
        let url = format!("{}{}", self.base_url, request.target());

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());

        if attach_session && request.authorization().is_none() {
            if let Some(token) = self.session.access_token() {
                match bearer_value(&token) {
                    Ok(value) => builder = builder.header(AUTHORIZATION, value),
                    Err(e) => warn!(error = %e, "Stored access token is not a valid header value"),
                }
            }
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(ref body) => builder.json(body),
            RequestBody::Multipart(ref files) => match RequestDescriptor::multipart_form(files) {
                Ok(form) => builder.multipart(form),
                Err(e) => {
                    return Envelope::Failure(ApiFailure {
                        status: None,
                        error: INVALID_REQUEST.to_string(),
                        message: Some(e.to_string()),
                    })
                }
            },
        };

        debug!(
            method = %request.method,
            url = %url,
            retry = request.has_retry_marker(),
            "Dispatching request"
        );

        let envelope = match builder.send().await {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(body) => Envelope::from_response(status, &body),
                    Err(e) => Envelope::from_transport_error(&e),
                }
            }
            Err(e) => {
                warn!(method = %request.method, url = %url, error = %e, "Request failed without response");
                Envelope::from_transport_error(&e)
            }
        };

        if request.path == self.config.refresh_path
            && envelope.failure().is_some_and(ApiFailure::is_forbidden)
        {
            warn!("Refresh credential rejected, session expired");
            self.session.clear();
            self.emit(AuthEvent::SessionExpired);
        }

        envelope
    }

    fn emit(&self, event: AuthEvent) {
        for handler in &self.handlers {
            handler.on_event(&event);
        }
    }
}
