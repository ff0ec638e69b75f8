//! User administration endpoints

use serde_json::Value;

use super::resource_path;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::query::ListQuery;
use crate::request::RequestDescriptor;
use crate::types::Paginated;

const USERS: &str = "/api/v1/users";

pub struct UsersApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &ListQuery) -> Envelope<Paginated> {
        let request = RequestDescriptor::get(USERS).with_query(query.to_query_string());
        self.gateway.send_as(request).await
    }

    pub async fn create(&self, user: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::post(USERS).with_json(user)?;
        Ok(self.gateway.send(request).await)
    }

    /// Import many users at once
    pub async fn create_bulk(&self, users: &[Value]) -> Result<Envelope> {
        let request = RequestDescriptor::post(format!("{}/bulk", USERS)).with_json(&users)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn update(&self, user: &Value) -> Result<Envelope> {
        let request = RequestDescriptor::patch(USERS).with_json(user)?;
        Ok(self.gateway.send(request).await)
    }

    pub async fn delete(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::delete(resource_path(USERS, id)))
            .await
    }

    /// Re-enable a deactivated user
    pub async fn activate(&self, id: &str) -> Envelope {
        self.gateway
            .send(RequestDescriptor::post(resource_path(USERS, id)))
            .await
    }

    pub async fn change_password(&self, change: &Value) -> Result<Envelope> {
        let request =
            RequestDescriptor::post(format!("{}/change-password", USERS)).with_json(change)?;
        Ok(self.gateway.send(request).await)
    }
}
