//! Order endpoints

use serde_json::Value;

use super::resource_path;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::query::ListQuery;
use crate::request::RequestDescriptor;
use crate::types::Paginated;

const ORDERS: &str = "/api/v1/orders";

pub struct OrdersApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// All orders (admin)
    pub async fn list(&self, query: &ListQuery) -> Envelope<Paginated> {
        let request = RequestDescriptor::get(ORDERS).with_query(query.to_query_string());
        self.gateway.send_as(request).await
    }

    pub async fn get(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::get(resource_path(ORDERS, id)))
            .await
    }

    /// Place an order from the cart contents
    pub async fn create(&self, order: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::post(ORDERS).with_json(order)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn update(&self, order: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::patch(ORDERS).with_json(order)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn cancel(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::delete(resource_path(ORDERS, id)))
            .await
    }

    /// Order history of the signed-in user
    ///
    /// The backend exposes this as a POST carrying the page in the query.
    pub async fn history(&self, query: &ListQuery) -> Envelope<Paginated> {
        let request =
            RequestDescriptor::post(format!("{}/user", ORDERS)).with_query(query.to_query_string());
        self.gateway.send_as(request).await
    }
}
