//! Outbound request descriptor

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// One-shot retry marker set on a request re-issued after a token refresh
pub const NO_RETRY_HEADER: &str = "x-no-retry";

/// A file attached to a multipart request
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name (e.g. `file`, `files`)
    pub field: String,
    /// File name reported to the backend
    pub file_name: String,
    /// MIME type, if known
    pub mime_type: Option<String>,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Request body
///
/// Kept as plain data rather than a `reqwest::Body` so a retried request can
/// be rebuilt with the exact same body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FilePart>),
}

/// Everything needed to issue (and re-issue) one API call
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/api/v1/phones`
    pub path: String,
    /// Caller-assembled query string, including the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a query string; a missing leading `?` is added
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.is_empty() {
            None
        } else if query.starts_with('?') {
            Some(query)
        } else {
            Some(format!("?{}", query))
        };
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_files(mut self, files: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(files);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| GatewayError::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| GatewayError::InvalidHeader(format!("{}: {}", name, e)))?;
        self.headers.insert(header, value);
        Ok(self)
    }

    /// Path plus query, as sent on the wire
    pub fn target(&self) -> String {
        match self.query {
            Some(ref query) => format!("{}{}", self.path, query),
            None => self.path.clone(),
        }
    }

    pub fn has_retry_marker(&self) -> bool {
        self.headers.contains_key(NO_RETRY_HEADER)
    }

    pub(crate) fn mark_retry(&mut self) {
        self.headers
            .insert(NO_RETRY_HEADER, HeaderValue::from_static("true"));
    }

    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.headers.get(AUTHORIZATION)
    }

    pub(crate) fn set_bearer(&mut self, token: &str) -> Result<()> {
        self.headers.insert(AUTHORIZATION, bearer_value(token)?);
        Ok(())
    }

    pub(crate) fn take_authorization(&mut self) -> Option<HeaderValue> {
        self.headers.remove(AUTHORIZATION)
    }

    pub(crate) fn multipart_form(files: &[FilePart]) -> Result<Form> {
        let mut form = Form::new();
        for file in files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(ref mime) = file.mime_type {
                part = part.mime_str(mime)?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

/// `Bearer <token>` header value, marked sensitive so it stays out of debug output
pub(crate) fn bearer_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| GatewayError::InvalidHeader(format!("authorization: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}
