//! crates/mimea_core/tests/common/mod.rs
//!
//! In-memory fakes for every collaborator port, injected into resource
//! clients and containers under test in place of the HTTP adapters.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use mimea_core::containers::{ProfileContainer, SessionContainer};
use mimea_core::domain::{Identity, Prediction, StoredFile, UserProfileDraft, UserRole};
use mimea_core::ports::{
    DocumentStore, FileStore, Filter, Grant, IdentityService, ListQuery, PlantClassifier,
    PortError, PortResult, PreferenceStore, RawDocument,
};
use mimea_core::resources::ProfileClient;

//=========================================================================================
// Document store fake
//=========================================================================================

#[derive(Clone)]
struct StoredDoc {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    data: Value,
}

/// In-memory document database honoring the same contract as the remote
/// collaborator: fixed-id creates conflict, increments are atomic, and the
/// query shape (filters, search, order, limit) is applied on read.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<(String, StoredDoc)>>>,
    failing: Mutex<bool>,
    calls: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of port calls received so far, for asserting that local
    /// preconditions short-circuit without touching the store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// When set, every subsequent call fails with a network error.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Number of documents currently in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Reads one attribute of a stored document, bypassing the port.
    pub fn field(&self, collection: &str, id: &str, field: &str) -> Option<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)?
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .and_then(|(_, doc)| doc.data.get(field).cloned())
    }

    /// Inserts a document directly, bypassing the port. Used to seed
    /// malformed rows a well-behaved client would never write.
    pub fn seed(&self, collection: &str, id: &str, data: Value) {
        let now = Utc::now();
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push((
                id.to_string(),
                StoredDoc {
                    created_at: now,
                    updated_at: now,
                    data,
                },
            ));
    }

    fn enter(&self) -> PortResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(PortError::Network("connection refused".into()));
        }
        Ok(())
    }
}

fn raw(id: &str, doc: &StoredDoc) -> RawDocument {
    RawDocument {
        id: id.to_string(),
        created_at: doc.created_at,
        updated_at: doc.updated_at,
        data: doc.data.clone(),
    }
}

fn matches(data: &Value, query: &ListQuery) -> bool {
    for filter in &query.filters {
        match filter {
            Filter::Equal(field, value) => {
                if data.get(field) != Some(value) {
                    return false;
                }
            }
            Filter::Contains(field, element) => {
                let found = data
                    .get(field)
                    .and_then(Value::as_array)
                    .map(|items| items.iter().any(|i| i.as_str() == Some(element)))
                    .unwrap_or(false);
                if !found {
                    return false;
                }
            }
        }
    }
    if let Some(search) = &query.search {
        let needle = search.text.to_lowercase();
        let hit = search.fields.iter().any(|field| {
            data.get(field)
                .and_then(Value::as_str)
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
        if !hit {
            return false;
        }
    }
    true
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering::Equal;
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Equal),
        _ => Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Value,
        _grants: &[Grant],
    ) -> PortResult<RawDocument> {
        self.enter()?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let id = match id {
            Some(fixed) => {
                if docs.iter().any(|(doc_id, _)| doc_id == fixed) {
                    return Err(PortError::Conflict(format!(
                        "document {fixed} already exists"
                    )));
                }
                fixed.to_string()
            }
            None => Uuid::new_v4().to_string(),
        };
        let now = Utc::now();
        let doc = StoredDoc {
            created_at: now,
            updated_at: now,
            data,
        };
        let result = raw(&id, &doc);
        docs.push((id, doc));
        Ok(result)
    }

    async fn get(&self, collection: &str, id: &str) -> PortResult<RawDocument> {
        self.enter()?;
        let collections = self.collections.lock().unwrap();
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(doc_id, doc)| raw(doc_id, doc))
            .ok_or_else(|| PortError::NotFound(format!("document {id}")))
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> PortResult<RawDocument> {
        self.enter()?;
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .ok_or_else(|| PortError::NotFound(format!("document {id}")))?;
        if let (Some(target), Some(fields)) = (doc.1.data.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        doc.1.updated_at = Utc::now();
        Ok(raw(&doc.0, &doc.1))
    }

    async fn delete(&self, collection: &str, id: &str) -> PortResult<()> {
        self.enter()?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| PortError::NotFound(format!("document {id}")))?;
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        if docs.len() == before {
            return Err(PortError::NotFound(format!("document {id}")));
        }
        Ok(())
    }

    async fn list(&self, collection: &str, query: ListQuery) -> PortResult<Vec<RawDocument>> {
        self.enter()?;
        let collections = self.collections.lock().unwrap();
        let mut hits: Vec<RawDocument> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| matches(&doc.data, &query))
                    .map(|(doc_id, doc)| raw(doc_id, doc))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = &query.order {
            hits.sort_by(|a, b| {
                let ordering = compare_values(a.data.get(&order.field), b.data.get(&order.field));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        if let Some(limit) = query.limit {
            hits.truncate(limit as usize);
        }
        Ok(hits)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> PortResult<RawDocument> {
        self.enter()?;
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .ok_or_else(|| PortError::NotFound(format!("document {id}")))?;
        let current = doc
            .1
            .data
            .get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| PortError::Validation(format!("{field} is not numeric")))?;
        if let Some(map) = doc.1.data.as_object_mut() {
            map.insert(field.to_string(), Value::from(current + delta));
        }
        doc.1.updated_at = Utc::now();
        Ok(raw(&doc.0, &doc.1))
    }
}

//=========================================================================================
// Identity fake
//=========================================================================================

#[derive(Clone)]
struct Account {
    id: String,
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
    prefs: Value,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            email_verified: false,
            prefs: self.prefs.clone(),
        }
    }
}

#[derive(Default)]
pub struct InMemoryIdentityService {
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl InMemoryIdentityService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn current_account(&self) -> PortResult<Account> {
        let session = self.session.lock().unwrap();
        let email = session.as_ref().ok_or(PortError::Unauthorized)?;
        let accounts = self.accounts.lock().unwrap();
        accounts
            .get(email)
            .cloned()
            .ok_or(PortError::Unauthorized)
    }

    fn mutate_current(&self, f: impl FnOnce(&mut Account)) -> PortResult<Identity> {
        let session = self.session.lock().unwrap();
        let email = session.as_ref().ok_or(PortError::Unauthorized)?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(email).ok_or(PortError::Unauthorized)?;
        f(account);
        Ok(account.identity())
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentityService {
    async fn signup(&self, email: &str, password: &str, name: &str) -> PortResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(PortError::Conflict(format!("account {email} exists")));
        }
        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone: None,
            prefs: Value::Object(Default::default()),
        };
        let identity = account.identity();
        accounts.insert(email.to_string(), account);
        Ok(identity)
    }

    async fn create_session(&self, email: &str, password: &str) -> PortResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => {
                *self.session.lock().unwrap() = Some(email.to_string());
                Ok(())
            }
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn current(&self) -> PortResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.current_account().map(|a| a.identity())
    }

    async fn delete_session(&self) -> PortResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn update_name(&self, name: &str) -> PortResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutate_current(|a| a.name = name.to_string())
    }

    async fn update_email(&self, email: &str, _password: &str) -> PortResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutate_current(|a| a.email = email.to_string())
    }

    async fn update_phone(&self, phone: &str, _password: &str) -> PortResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutate_current(|a| a.phone = Some(phone.to_string()))
    }

    async fn update_prefs(&self, patch: Value) -> PortResult<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutate_current(|a| {
            if let (Some(prefs), Some(fields)) = (a.prefs.as_object_mut(), patch.as_object()) {
                for (key, value) in fields {
                    prefs.insert(key.clone(), value.clone());
                }
            }
        })
    }
}

//=========================================================================================
// File store, classifier, preference fakes
//=========================================================================================

#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<String, StoredFile>>,
}

impl InMemoryFileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PortResult<StoredFile> {
        let file = StoredFile {
            id: Uuid::new_v4().to_string(),
            name: filename.to_string(),
            mime_type: content_type.to_string(),
            size: bytes.len() as u64,
        };
        self.files
            .lock()
            .unwrap()
            .insert(file.id.clone(), file.clone());
        Ok(file)
    }

    async fn delete(&self, file_id: &str) -> PortResult<()> {
        self.files
            .lock()
            .unwrap()
            .remove(file_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("file {file_id}")))
    }

    fn view_url(&self, file_id: &str) -> String {
        format!("memory://files/{file_id}/view")
    }

    fn download_url(&self, file_id: &str) -> String {
        format!("memory://files/{file_id}/download")
    }
}

/// Classifier returning a canned outcome.
pub struct StubClassifier {
    response: Mutex<Result<Prediction, String>>,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub fn predicting(class_name: &str, confidence: f64) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Ok(Prediction {
                class_name: class_name.to_string(),
                confidence,
            })),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Err(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlantClassifier for StubClassifier {
    async fn classify(&self, _image: Vec<u8>, _filename: &str) -> PortResult<Prediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .clone()
            .map_err(PortError::Unexpected)
    }
}

#[derive(Default)]
pub struct InMemoryPreferenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//=========================================================================================
// Scenario helpers
//=========================================================================================

pub const TEST_PASSWORD: &str = "password123";

/// Signs up a fresh account and returns its authenticated session container.
pub async fn signed_in_session(
    identity: &Arc<InMemoryIdentityService>,
    email: &str,
    name: &str,
) -> Arc<SessionContainer> {
    let session = Arc::new(SessionContainer::new(identity.clone() as Arc<dyn IdentityService>));
    session.signup(email, TEST_PASSWORD, name).await;
    assert!(session.is_authenticated(), "signup should authenticate");
    session
}

pub fn profile_draft(user_id: &str, name: &str, role: UserRole) -> UserProfileDraft {
    UserProfileDraft {
        user_id: user_id.to_string(),
        user_type: role,
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: None,
        location: None,
        bio: None,
        experience_years: None,
        specializations: Vec::new(),
        certifications: Vec::new(),
    }
}

/// Creates and loads a profile with the given role for the session's user.
pub async fn profile_with_role(
    store: &Arc<InMemoryDocumentStore>,
    session: &Arc<SessionContainer>,
    role: UserRole,
) -> Arc<ProfileContainer> {
    let identity = session.current_identity().expect("session must be live");
    let profiles = Arc::new(ProfileContainer::new(ProfileClient::new(
        store.clone() as Arc<dyn DocumentStore>
    )));
    profiles
        .create_profile(&profile_draft(&identity.id, &identity.name, role))
        .await;
    assert!(profiles.current_profile().is_some(), "profile should load");
    profiles
}
