//! Product (phone) catalog endpoints

use serde_json::Value;

use super::resource_path;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::query::ListQuery;
use crate::request::RequestDescriptor;
use crate::types::Paginated;

const PHONES: &str = "/api/v1/phones";

pub struct PhonesApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> PhonesApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &ListQuery) -> Envelope<Paginated> {
        let request = RequestDescriptor::get(PHONES).with_query(query.to_query_string());
        self.gateway.send_as(request).await
    }

    /// Product names only, for search suggestions
    pub async fn names(&self) -> Envelope {
        self.gateway
            .send(RequestDescriptor::get(format!("{}/name", PHONES)))
            .await
    }

    pub async fn get(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::get(resource_path(PHONES, id)))
            .await
    }

    pub async fn create(&self, phone: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::post(PHONES).with_json(phone)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn update(&self, phone: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::patch(PHONES).with_json(phone)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn delete(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::delete(resource_path(PHONES, id)))
            .await
    }
}
