//! Admin dashboard endpoint

use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::RequestDescriptor;

const DASHBOARD: &str = "/api/v1/dashboard";

pub struct DashboardApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Aggregate counts and chart series
    pub async fn summary(&self) -> Envelope {
        self.gateway.send(RequestDescriptor::get(DASHBOARD)).await
    }
}
