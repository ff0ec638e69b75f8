//! Authentication endpoints
//!
//! Login and logout also maintain the session store, so the gateway picks up
//! (or drops) the access token for every later call.

use serde_json::Value;
use tracing::info;

use crate::envelope::Envelope;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::request::RequestDescriptor;
use crate::types::{Account, Credentials, LoginData, Registration};

const REGISTER: &str = "/api/v1/auth/register";
const LOGIN: &str = "/api/v1/auth/login";
const ACCOUNT: &str = "/api/v1/auth/account";
const LOGOUT: &str = "/api/v1/auth/logout";

pub struct AuthApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn register(&self, registration: &Registration) -> Result<Envelope> {
        let request = RequestDescriptor::post(REGISTER).with_json(registration)?;
        Ok(self.gateway.send(request).await)
    }

    /// Sign in; on success the returned access token becomes the session token
    pub async fn login(&self, credentials: &Credentials) -> Result<Envelope<LoginData>> {
        let request = RequestDescriptor::post(LOGIN).with_json(credentials)?;
        let envelope: Envelope<LoginData> = self.gateway.send_as(request).await;

        if let Some(login) = envelope.data() {
            self.gateway
                .session()
                .set_access_token(login.access_token.clone());
            info!(user = ?login.user.email, "Logged in");
        }
        Ok(envelope)
    }

    /// Current account; the payload may be the user or `{ "user": ... }`
    pub async fn account(&self) -> Envelope<Account> {
        self.gateway
            .send(RequestDescriptor::get(ACCOUNT))
            .await
            .map(unwrap_user)
            .decode()
    }

    /// Sign out; the session token is dropped once the backend confirms
    pub async fn logout(&self) -> Envelope {
        let envelope = self.gateway.send(RequestDescriptor::post(LOGOUT)).await;
        if envelope.is_success() {
            self.gateway.session().clear();
            info!("Logged out");
        }
        envelope
    }

    /// Explicit refresh; a returned access token replaces the session token
    pub async fn refresh(&self) -> Envelope {
        let path = self.gateway.config().refresh_path.clone();
        let envelope = self.gateway.send(RequestDescriptor::get(path)).await;

        if let Some(token) = envelope
            .data()
            .and_then(|data| data.get("access_token"))
            .and_then(Value::as_str)
        {
            self.gateway.session().set_access_token(token.to_string());
        }
        envelope
    }
}

fn unwrap_user(data: Value) -> Value {
    match data {
        Value::Object(mut map) if map.contains_key("user") => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    }
}
