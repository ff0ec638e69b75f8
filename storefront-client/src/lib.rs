//! Rust client for the phone storefront REST API
//!
//! Every call goes through one [`Gateway`], which:
//! - attaches the session's bearer token
//! - resolves every outcome to an [`Envelope`] (`Success` or `Failure`)
//! - silently refreshes an expired access token and retries once
//! - reports an expired refresh credential as an [`AuthEvent`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ StorefrontClient (auth, users, brands,       │
//! │ phones, orders, dashboard, files)            │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │ Gateway ── RefreshFlight (single-flight)     │
//! │    │    ── AuthEventHandler (LoginRedirect)  │
//! │    │    ── ProgressListener                  │
//! └────┼─────────────────────────────────────────┘
//!      ▼
//! SessionStore (access token)   reqwest + cookie store (refresh credential)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_client::{Credentials, GatewayConfig, MemorySession, StorefrontClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StorefrontClient::connect(
//!     GatewayConfig::new("http://localhost:8080"),
//!     Arc::new(MemorySession::new()),
//! )?;
//!
//! let login = client.auth().login(&Credentials::new("user@shop.vn", "secret")).await?;
//! if login.is_success() {
//!     let account = client.auth().account().await;
//!     println!("admin: {}", account.data().is_some_and(|a| a.is_admin()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod gateway;
pub mod navigation;
pub mod progress;
pub mod query;
pub mod refresh;
pub mod request;
pub mod session;
pub mod types;

// Re-export main types
pub use api::StorefrontClient;
pub use config::GatewayConfig;
pub use envelope::{ApiFailure, Envelope};
pub use error::{GatewayError, Result};
pub use events::{AuthEvent, AuthEventHandler, EventLog};
pub use gateway::{Gateway, GatewayBuilder};
pub use navigation::{LoginRedirect, Navigator, RouteGuard};
pub use progress::{LoadingIndicator, ProgressListener, TracingProgress};
pub use query::{ListQuery, Sort, SortOrder};
pub use request::{FilePart, RequestBody, RequestDescriptor, NO_RETRY_HEADER};
pub use session::{FileSession, MemorySession, SessionStore};
pub use types::*;
