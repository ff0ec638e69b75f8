//! Payload shapes the client relies on
//!
//! Catalog, user and order records stay opaque JSON; only what the client
//! itself acts on is typed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role value that unlocks the admin console
pub const ADMIN_ROLE: &str = "ADMIN";

/// Pagination metadata of a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current: u32,
    pub page_size: u32,
    #[serde(default)]
    pub pages: u32,
    pub total: u64,
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T = Value> {
    pub meta: PageMeta,
    pub result: Vec<T>,
}

/// The signed-in user, as returned by login and account endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Fields the client does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Account {
    /// Admin console gate
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Payload of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub user: Account,
}

/// Credentials for `POST /api/v1/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Sign-up form for `POST /api/v1/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
