//! Storefront REST API, one wrapper per resource
//!
//! Each wrapper only builds a path and a body and forwards to the
//! [`Gateway`]. Methods that serialize a body return `Result` for local
//! serialization failures; every wire outcome is in the envelope.

mod auth;
mod brands;
mod dashboard;
mod files;
mod orders;
mod phones;
mod users;

pub use auth::AuthApi;
pub use brands::BrandsApi;
pub use dashboard::DashboardApi;
pub use files::FilesApi;
pub use orders::OrdersApi;
pub use phones::PhonesApi;
pub use users::UsersApi;

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::session::SessionStore;

/// Entry point to every storefront endpoint
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use storefront_client::{Credentials, GatewayConfig, ListQuery, MemorySession, Sort, StorefrontClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StorefrontClient::connect(
///     GatewayConfig::new("http://localhost:8080"),
///     Arc::new(MemorySession::new()),
/// )?;
///
/// client.auth().login(&Credentials::new("user@shop.vn", "secret")).await?;
///
/// let page = client
///     .phones()
///     .list(&ListQuery::page(1, 16).sort(Sort::desc("sold")).matching("name", "iphone"))
///     .await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StorefrontClient {
    gateway: Arc<Gateway>,
}

impl StorefrontClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Build a gateway with default settings and wrap it
    pub fn connect(config: GatewayConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
        Ok(Self::new(Arc::new(Gateway::new(config, session)?)))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.gateway)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(&self.gateway)
    }

    pub fn brands(&self) -> BrandsApi<'_> {
        BrandsApi::new(&self.gateway)
    }

    pub fn phones(&self) -> PhonesApi<'_> {
        PhonesApi::new(&self.gateway)
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(&self.gateway)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(&self.gateway)
    }

    pub fn files(&self) -> FilesApi<'_> {
        FilesApi::new(&self.gateway)
    }
}

/// `{prefix}/{id}` with the id percent-encoded
fn resource_path(prefix: &str, id: &str) -> String {
    format!("{}/{}", prefix, urlencoding::encode(id))
}
