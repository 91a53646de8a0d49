//! crates/mimea_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the remote collaborators this
//! client depends on but does not implement: the document database, the
//! file-blob store, the identity provider and the ML classification endpoint,
//! plus the one piece of local persistence (the UI language code).
//!
//! These traits form the boundary of the architecture. Resource clients and
//! state containers hold `Arc<dyn …>` handles, so concrete HTTP adapters are
//! injected at startup and in-memory fakes are injected in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{Identity, Prediction, StoredFile};

//=========================================================================================
// Generic port error and result types
//=========================================================================================

/// Error taxonomy for all port operations, by origin rather than by the
/// collaborator's own type names.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation rejected: {0}")]
    Validation(String),
    #[error("Network failure: {0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    BadResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Document store types
//=========================================================================================

/// Principal class a grant applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Any,
    User(String),
}

/// Per-document access grant, assigned at creation time and enforced by the
/// remote collaborator, not by this code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    Read(Scope),
    Update(Scope),
    Delete(Scope),
}

#[derive(Debug, Clone)]
pub enum Filter {
    /// Field equals the given value.
    Equal(String, Value),
    /// Array field contains the given element.
    Contains(String, String),
}

/// Full-text search over one or more indexed fields (matched as OR).
#[derive(Debug, Clone)]
pub struct Search {
    pub fields: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub field: String,
    pub descending: bool,
}

/// Query shape for `list`. There is no cursor: callers always see only the
/// most recent page, up to `limit`.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub search: Option<Search>,
    pub order: Option<Order>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equal(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Equal(field.into(), value.into()));
        self
    }

    pub fn contains(mut self, field: &str, element: &str) -> Self {
        self.filters
            .push(Filter::Contains(field.into(), element.into()));
        self
    }

    pub fn search(mut self, fields: &[&str], text: &str) -> Self {
        self.search = Some(Search {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            text: text.into(),
        });
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order = Some(Order {
            field: field.into(),
            descending: false,
        });
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order = Some(Order {
            field: field.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A document as the collaborator returns it: server-assigned id and
/// timestamps, plus the attribute payload.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Value,
}

//=========================================================================================
// Service ports (traits)
//=========================================================================================

/// Collection-scoped CRUD + query against the remote document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document. `id` of `None` asks the collaborator to assign a
    /// unique id; a fixed id fails with [`PortError::Conflict`] when a
    /// document with that id already exists.
    async fn create(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Value,
        grants: &[Grant],
    ) -> PortResult<RawDocument>;

    async fn get(&self, collection: &str, id: &str) -> PortResult<RawDocument>;

    /// Partial update; unmentioned fields are left as they are. No
    /// optimistic-concurrency token, so overlapping concurrent updates are
    /// last-write-wins.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> PortResult<RawDocument>;

    /// Hard delete, irreversible.
    async fn delete(&self, collection: &str, id: &str) -> PortResult<()>;

    async fn list(&self, collection: &str, query: ListQuery) -> PortResult<Vec<RawDocument>>;

    /// Atomically adds `delta` to a numeric attribute on the server side.
    /// Increments commute, so concurrent callers cannot lose adjustments the
    /// way a read-modify-write counter does.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> PortResult<RawDocument>;
}

/// Upload/download-by-id blob storage.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PortResult<StoredFile>;

    async fn delete(&self, file_id: &str) -> PortResult<()>;

    /// Permanent public view link, templated from the store's endpoint.
    fn view_url(&self, file_id: &str) -> String;

    /// Permanent public download link.
    fn download_url(&self, file_id: &str) -> String;
}

/// Session-based identity provider.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn signup(&self, email: &str, password: &str, name: &str) -> PortResult<Identity>;

    async fn create_session(&self, email: &str, password: &str) -> PortResult<()>;

    /// Returns the current identity, or [`PortError::Unauthorized`] when no
    /// session exists.
    async fn current(&self) -> PortResult<Identity>;

    async fn delete_session(&self) -> PortResult<()>;

    async fn update_name(&self, name: &str) -> PortResult<Identity>;

    async fn update_email(&self, email: &str, password: &str) -> PortResult<Identity>;

    async fn update_phone(&self, phone: &str, password: &str) -> PortResult<Identity>;

    /// Merges the given fields into the preference bag and returns the
    /// updated identity.
    async fn update_prefs(&self, patch: Value) -> PortResult<Identity>;
}

/// The hosted image-classification endpoint.
#[async_trait]
pub trait PlantClassifier: Send + Sync {
    /// Classifies one image. A non-2xx status or a malformed body is a hard
    /// failure; there is no retry.
    async fn classify(&self, image: Vec<u8>, filename: &str) -> PortResult<Prediction>;
}

/// Local key-value persistence. The only entry this client keeps is the
/// selected UI language code; all domain data is refetched from the remote
/// collaborator.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
}
