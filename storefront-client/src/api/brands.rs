//! Brand endpoints

use serde_json::Value;

use super::resource_path;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::query::ListQuery;
use crate::request::RequestDescriptor;
use crate::types::Paginated;

const BRANDS: &str = "/api/v1/brands";

pub struct BrandsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> BrandsApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &ListQuery) -> Envelope<Paginated> {
        let request = RequestDescriptor::get(BRANDS).with_query(query.to_query_string());
        self.gateway.send_as(request).await
    }

    /// Every brand, unpaginated (used to fill filter pickers)
    pub async fn all(&self) -> Envelope<Vec<Value>> {
        self.gateway
            .send_as(RequestDescriptor::get(format!("{}/all", BRANDS)))
            .await
    }

    pub async fn create(&self, brand: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::post(BRANDS).with_json(brand)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn update(&self, brand: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::patch(BRANDS).with_json(brand)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn delete(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::delete(resource_path(BRANDS, id)))
            .await
    }
}
