//! Normalized response envelope
//!
//! Every dispatch through the gateway resolves to an [`Envelope`], whatever
//! the transport outcome was. The normalization happens once, here, so that
//! callers pattern-match instead of probing the payload for a `data` field.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{GatewayError, Result};

/// Error string used when no response was received at all
pub const NETWORK_ERROR: &str = "Network Error";

/// Error string used when a success payload does not match the expected shape
pub const INVALID_RESPONSE: &str = "Invalid Response";

/// Failure half of the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// Short error label (backend `error` field or the status reason)
    pub error: String,
    /// Backend-supplied message, meant to be shown verbatim
    pub message: Option<String>,
}

impl ApiFailure {
    /// Failure for a request that never produced a response
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            error: NETWORK_ERROR.to_string(),
            message: Some(message.into()),
        }
    }

    /// True when the backend rejected the access token
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// True when the backend refused the credential outright
    pub fn is_forbidden(&self) -> bool {
        self.status == Some(StatusCode::FORBIDDEN.as_u16())
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {} {}", status, self.error)?,
            None => write!(f, "{}", self.error)?,
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Discriminated result of one gateway call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Envelope<T = Value> {
    /// The backend accepted the request
    Success {
        data: T,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Transport failure or non-2xx response
    Failure(ApiFailure),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// HTTP status of a failure; `None` for successes and transport failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Failure(failure) => failure.status,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success { data, .. } => Some(data),
            Envelope::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Failure(failure) => Some(failure),
        }
    }

    /// Message attached to either variant
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Success { message, .. } => message.as_deref(),
            Envelope::Failure(failure) => failure.message.as_deref(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Success { data, message } => Envelope::Success {
                data: f(data),
                message,
            },
            Envelope::Failure(failure) => Envelope::Failure(failure),
        }
    }

    /// Convert into a `Result`, turning a failure into `GatewayError::Api`
    pub fn into_result(self) -> Result<T> {
        match self {
            Envelope::Success { data, .. } => Ok(data),
            Envelope::Failure(failure) => Err(GatewayError::Api(failure)),
        }
    }
}

impl Envelope<Value> {
    /// Typed view of the success payload
    ///
    /// A payload that does not match `T` becomes a failure envelope labelled
    /// [`INVALID_RESPONSE`], so callers still handle exactly two shapes.
    pub fn decode<T: DeserializeOwned>(self) -> Envelope<T> {
        match self {
            Envelope::Success { data, message } => match serde_json::from_value(data) {
                Ok(data) => Envelope::Success { data, message },
                Err(e) => Envelope::Failure(ApiFailure {
                    status: None,
                    error: INVALID_RESPONSE.to_string(),
                    message: Some(e.to_string()),
                }),
            },
            Envelope::Failure(failure) => Envelope::Failure(failure),
        }
    }

    /// Build the envelope for a completed HTTP exchange
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let payload = parse_body(body);
        let message = extract_message(&payload);

        if status.is_success() {
            let data = match payload {
                Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
                    map.remove("data").unwrap_or(Value::Null)
                }
                other => other,
            };
            return Envelope::Success { data, message };
        }

        let error = payload
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Error".to_string());

        let message = message.or_else(|| match payload {
            Value::String(text) if !text.is_empty() => Some(text),
            _ => None,
        });

        Envelope::Failure(ApiFailure {
            status: Some(status.as_u16()),
            error,
            message,
        })
    }

    /// Build the envelope for a request that produced no response
    pub(crate) fn from_transport_error(err: &reqwest::Error) -> Self {
        Envelope::Failure(ApiFailure::network(err.to_string()))
    }
}

fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Validation backends send `message` as an array of strings
fn extract_message(payload: &Value) -> Option<String> {
    match payload.get("message")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}
