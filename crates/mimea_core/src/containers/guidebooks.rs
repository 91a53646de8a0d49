//! crates/mimea_core/src/containers/guidebooks.rs
//!
//! Guidebook container. Uploads carry a separate `is_uploading` flag so
//! screens can distinguish a long multipart upload from an ordinary fetch.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};

use tracing::warn;

use crate::containers::{ContainerState, SessionContainer, StateCell};
use crate::domain::{GuidebookDocument, GuidebookDraft};
use crate::resources::GuidebookClient;

pub struct GuidebookContainer {
    client: GuidebookClient,
    session: Arc<SessionContainer>,
    state: StateCell<GuidebookDocument>,
    is_uploading: AtomicBool,
    search_query: RwLock<String>,
}

impl GuidebookContainer {
    pub fn new(client: GuidebookClient, session: Arc<SessionContainer>) -> Self {
        Self {
            client,
            session,
            state: StateCell::new(),
            is_uploading: AtomicBool::new(false),
            search_query: RwLock::new(String::new()),
        }
    }

    pub fn snapshot(&self) -> ContainerState<GuidebookDocument> {
        self.state.snapshot()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading.load(Ordering::Relaxed)
    }

    pub fn search_query(&self) -> String {
        self.search_query
            .read()
            .expect("search query lock poisoned")
            .clone()
    }

    pub async fn fetch(&self) {
        self.state.begin();
        match self.client.list().await {
            Ok(guidebooks) => self.state.finish(guidebooks),
            Err(e) => self.fail(format!("Failed to fetch guidebooks: {e}")),
        }
    }

    pub async fn search(&self, query: &str) {
        *self
            .search_query
            .write()
            .expect("search query lock poisoned") = query.to_string();
        self.state.begin();
        match self.client.search(query).await {
            Ok(guidebooks) => self.state.finish(guidebooks),
            Err(e) => self.fail(format!("Failed to search guidebooks: {e}")),
        }
    }

    /// Uploads the file, records the metadata, then refetches.
    pub async fn upload(
        &self,
        draft: &GuidebookDraft,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        if bytes.is_empty() {
            self.fail("Selected file is empty".into());
            return;
        }
        self.is_uploading.store(true, Ordering::Relaxed);
        self.state.clear_error();
        let result = self
            .client
            .upload(
                draft,
                file_name,
                bytes,
                content_type,
                &identity.id,
                &identity.name,
            )
            .await;
        self.is_uploading.store(false, Ordering::Relaxed);
        match result {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to upload guidebook: {e}")),
        }
    }

    /// Registers a download, refetches for the new count, and returns the
    /// permanent download link.
    pub async fn download(&self, guidebook_id: &str, file_id: &str) -> Option<String> {
        match self.client.record_download(guidebook_id).await {
            Ok(()) => {
                let url = self.client.download_url(file_id);
                self.fetch().await;
                Some(url)
            }
            Err(e) => {
                self.fail(format!("Failed to download guidebook: {e}"));
                None
            }
        }
    }

    pub async fn delete(&self, guidebook_id: &str, file_id: &str) {
        self.state.begin();
        match self.client.delete(guidebook_id, file_id).await {
            Ok(()) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to delete guidebook: {e}")),
        }
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn fail(&self, message: String) {
        warn!(%message, "guidebook action failed");
        self.state.fail(message);
    }
}
