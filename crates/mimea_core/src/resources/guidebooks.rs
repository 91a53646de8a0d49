//! crates/mimea_core/src/resources/guidebooks.rs
//!
//! Resource client for uploaded guidebooks: document metadata in the
//! document store, the binary itself in the file-blob store.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::{GuidebookDocument, GuidebookDraft};
use crate::ports::{DocumentStore, FileStore, Grant, ListQuery, PortResult, Scope};

pub const GUIDEBOOK_COLLECTION: &str = "guidebooks";

pub const GUIDEBOOK_PAGE_SIZE: u32 = 50;

#[derive(Clone)]
pub struct GuidebookClient {
    store: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
}

impl GuidebookClient {
    pub fn new(store: Arc<dyn DocumentStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Uploads the file first, then records its metadata. A crash between
    /// the two calls leaves an orphaned blob, never a dangling document.
    pub async fn upload(
        &self,
        draft: &GuidebookDraft,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        uploader_id: &str,
        uploader_name: &str,
    ) -> PortResult<GuidebookDocument> {
        let stored = self.files.upload(file_name, bytes, content_type).await?;
        let file_url = self.files.view_url(&stored.id);
        let now = Utc::now();
        let data = json!({
            "title": draft.title,
            "description": draft.description,
            "fileName": file_name,
            "fileId": stored.id,
            "fileUrl": file_url,
            "fileSize": stored.size,
            "fileType": stored.mime_type,
            "uploadedBy": uploader_id,
            "uploaderName": uploader_name,
            "category": draft.category,
            "tags": draft.tags,
            "downloadCount": 0,
            "createdAt": now,
            "updatedAt": now,
        });
        let grants = [
            Grant::Read(Scope::Any),
            Grant::Update(Scope::Any),
            Grant::Update(Scope::User(uploader_id.into())),
            Grant::Delete(Scope::User(uploader_id.into())),
        ];
        let raw = self
            .store
            .create(GUIDEBOOK_COLLECTION, None, data, &grants)
            .await?;
        debug!(guidebook = %raw.id, file = %stored.id, "guidebook uploaded");
        super::decode(raw)
    }

    pub async fn list(&self) -> PortResult<Vec<GuidebookDocument>> {
        let raws = self
            .store
            .list(
                GUIDEBOOK_COLLECTION,
                ListQuery::new()
                    .order_desc("createdAt")
                    .limit(GUIDEBOOK_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    /// Search across title, description and category; an empty query is
    /// equivalent to `list`.
    pub async fn search(&self, query: &str) -> PortResult<Vec<GuidebookDocument>> {
        if query.trim().is_empty() {
            return self.list().await;
        }
        let raws = self
            .store
            .list(
                GUIDEBOOK_COLLECTION,
                ListQuery::new()
                    .search(&["title", "description", "category"], query)
                    .order_desc("createdAt")
                    .limit(GUIDEBOOK_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    /// Bumps the download counter atomically on the server side.
    pub async fn record_download(&self, guidebook_id: &str) -> PortResult<()> {
        self.store
            .increment(GUIDEBOOK_COLLECTION, guidebook_id, "downloadCount", 1)
            .await?;
        Ok(())
    }

    pub fn download_url(&self, file_id: &str) -> String {
        self.files.download_url(file_id)
    }

    /// Deletes the blob first, then the metadata document.
    pub async fn delete(&self, guidebook_id: &str, file_id: &str) -> PortResult<()> {
        self.files.delete(file_id).await?;
        self.store.delete(GUIDEBOOK_COLLECTION, guidebook_id).await?;
        debug!(guidebook = %guidebook_id, "guidebook deleted");
        Ok(())
    }
}
