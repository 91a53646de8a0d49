//! services/app/src/adapters/http.rs
//!
//! Shared plumbing for the REST adapters: one context carrying the base
//! endpoint, project scoping and the current session secret, plus the error
//! and document mapping every adapter uses.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use mimea_core::ports::{PortError, PortResult, RawDocument};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

/// Shared HTTP state for all collaborator adapters. Construct once at
/// startup and hand out behind an `Arc`.
pub struct HttpContext {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
    session_secret: RwLock<Option<String>>,
}

impl HttpContext {
    pub fn new(
        http: reqwest::Client,
        endpoint: String,
        project_id: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id,
            api_key,
            session_secret: RwLock::new(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Builds a request with the project header, the API key when
    /// configured, and the session secret when one is active.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.project_id);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-Appwrite-Key", key);
        }
        let secret = self
            .session_secret
            .read()
            .expect("session secret lock poisoned")
            .clone();
        if let Some(secret) = secret {
            builder = builder.header("X-Appwrite-Session", secret);
        }
        builder
    }

    pub fn set_session_secret(&self, secret: Option<String>) {
        *self
            .session_secret
            .write()
            .expect("session secret lock poisoned") = secret;
    }
}

/// Maps a transport-level failure.
pub fn transport_error(e: reqwest::Error) -> PortError {
    PortError::Network(e.to_string())
}

/// Drains a non-success response into the port error taxonomy, using the
/// collaborator's own message when one is present.
pub async fn response_error(response: reqwest::Response) -> PortError {
    let status = response.status();
    let message = match response.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_string(),
        Err(_) => "no message".to_string(),
    };
    match status {
        StatusCode::UNAUTHORIZED => PortError::Unauthorized,
        StatusCode::FORBIDDEN => PortError::PermissionDenied(message),
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        StatusCode::CONFLICT => PortError::Conflict(message),
        StatusCode::BAD_REQUEST => PortError::Validation(message),
        _ => PortError::Unexpected(format!("{status}: {message}")),
    }
}

/// Splits a document response into server metadata (`$id`, `$createdAt`,
/// `$updatedAt`) and the attribute payload.
pub fn parse_document(body: Value) -> PortResult<RawDocument> {
    let Value::Object(mut map) = body else {
        return Err(PortError::BadResponse("document is not an object".into()));
    };
    let id = map
        .remove("$id")
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| PortError::BadResponse("document is missing $id".into()))?;
    let created_at = take_timestamp(&mut map, "$createdAt")?;
    let updated_at = take_timestamp(&mut map, "$updatedAt")?;
    // Remaining server bookkeeping is not part of the payload.
    map.remove("$permissions");
    map.remove("$collectionId");
    map.remove("$databaseId");
    map.remove("$sequence");
    Ok(RawDocument {
        id,
        created_at,
        updated_at,
        data: Value::Object(map),
    })
}

fn take_timestamp(
    map: &mut serde_json::Map<String, Value>,
    key: &str,
) -> PortResult<DateTime<Utc>> {
    let raw = map
        .remove(key)
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| PortError::BadResponse(format!("document is missing {key}")))?;
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| PortError::BadResponse(format!("bad {key} timestamp: {e}")))
}
