//! crates/mimea_core/src/resources/remedies.rs
//!
//! Resource client for community-submitted remedies, including the
//! verification sub-record transitions.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::{RemedyDocument, RemedyDraft};
use crate::ports::{DocumentStore, ListQuery, PortError, PortResult, RawDocument};

pub const REMEDY_COLLECTION: &str = "remedies";

/// Fixed page size; callers always see only the most recent page.
pub const REMEDY_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct RemedyClient {
    store: Arc<dyn DocumentStore>,
}

impl RemedyClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a remedy for the given author. Optional fields are stored as
    /// empty strings rather than rejected. Every remedy starts unverified
    /// with the whole verification sub-record null.
    pub async fn create(
        &self,
        draft: &RemedyDraft,
        author_id: &str,
        author_name: &str,
    ) -> PortResult<RemedyDocument> {
        let data = json!({
            "title": draft.title,
            "common_name": draft.common_name,
            "plant_name": draft.plant_name,
            "scientific_name": draft.scientific_name,
            "local_name": draft.local_name,
            "preparation_method": draft.preparation_method,
            "usage_instructions": draft.usage_instructions,
            "ailments_treated": draft.ailments_treated.clone().unwrap_or_default(),
            "cautions": draft.cautions.clone().unwrap_or_default(),
            "image_url": draft.image_url,
            "author_id": author_id,
            "author_name": author_name,
            "created_at": Utc::now(),
            "verified": false,
            "verified_by_id": null,
            "verified_by_name": null,
            "verified_at": null,
        });
        let raw = self
            .store
            .create(REMEDY_COLLECTION, None, data, &[])
            .await?;
        debug!(remedy = %raw.id, "remedy created");
        decode_remedy(raw)
    }

    pub async fn list(&self) -> PortResult<Vec<RemedyDocument>> {
        self.query(
            ListQuery::new()
                .order_desc("created_at")
                .limit(REMEDY_PAGE_SIZE),
        )
        .await
    }

    pub async fn by_plant(&self, plant_name: &str) -> PortResult<Vec<RemedyDocument>> {
        self.query(
            ListQuery::new()
                .equal("plant_name", plant_name)
                .order_desc("created_at"),
        )
        .await
    }

    pub async fn by_author(&self, author_id: &str) -> PortResult<Vec<RemedyDocument>> {
        self.query(
            ListQuery::new()
                .equal("author_id", author_id)
                .order_desc("created_at"),
        )
        .await
    }

    pub async fn verified(&self) -> PortResult<Vec<RemedyDocument>> {
        self.query(
            ListQuery::new()
                .equal("verified", true)
                .order_desc("verified_at")
                .limit(REMEDY_PAGE_SIZE),
        )
        .await
    }

    pub async fn unverified(&self) -> PortResult<Vec<RemedyDocument>> {
        self.query(
            ListQuery::new()
                .equal("verified", false)
                .order_desc("created_at")
                .limit(REMEDY_PAGE_SIZE),
        )
        .await
    }

    /// Hard delete; permitted for the author, enforced by the collaborator.
    pub async fn delete(&self, remedy_id: &str) -> PortResult<()> {
        self.store.delete(REMEDY_COLLECTION, remedy_id).await
    }

    /// Unverified → Verified: sets all four verification fields in a single
    /// update call.
    pub async fn verify(
        &self,
        remedy_id: &str,
        verifier_id: &str,
        verifier_name: &str,
    ) -> PortResult<RemedyDocument> {
        let patch = json!({
            "verified": true,
            "verified_by_id": verifier_id,
            "verified_by_name": verifier_name,
            "verified_at": Utc::now(),
        });
        let raw = self.store.update(REMEDY_COLLECTION, remedy_id, patch).await?;
        debug!(remedy = %remedy_id, verifier = %verifier_id, "remedy verified");
        decode_remedy(raw)
    }

    /// Verified → Unverified: resets all four fields to null. Idempotent on
    /// an already-unverified remedy.
    pub async fn unverify(&self, remedy_id: &str) -> PortResult<RemedyDocument> {
        let patch = json!({
            "verified": false,
            "verified_by_id": null,
            "verified_by_name": null,
            "verified_at": null,
        });
        let raw = self.store.update(REMEDY_COLLECTION, remedy_id, patch).await?;
        debug!(remedy = %remedy_id, "remedy unverified");
        decode_remedy(raw)
    }

    async fn query(&self, query: ListQuery) -> PortResult<Vec<RemedyDocument>> {
        let raws = self.store.list(REMEDY_COLLECTION, query).await?;
        raws.into_iter().map(decode_remedy).collect()
    }
}

/// Decodes a remedy and rejects documents whose verification sub-record is
/// partially populated.
fn decode_remedy(raw: RawDocument) -> PortResult<RemedyDocument> {
    let doc: RemedyDocument = super::decode(raw)?;
    if !doc.verification.is_consistent() {
        return Err(PortError::BadResponse(format!(
            "remedy {} has a partially-populated verification record",
            doc.id
        )));
    }
    Ok(doc)
}
