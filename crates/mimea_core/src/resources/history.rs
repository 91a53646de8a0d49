//! crates/mimea_core/src/resources/history.rs
//!
//! Resource client for per-user identification history. Every entry is
//! created with owner-only grants, so the collaborator enforces that only
//! the owner can read, update or delete it.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde_json::json;
use tracing::debug;

use crate::domain::HistoryDocument;
use crate::ports::{DocumentStore, Grant, ListQuery, PortResult, Scope};

pub const HISTORY_COLLECTION: &str = "plant_history";

#[derive(Clone)]
pub struct HistoryClient {
    store: Arc<dyn DocumentStore>,
}

impl HistoryClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn save(
        &self,
        user_id: &str,
        plant_name: &str,
        confidence: f64,
        image_url: &str,
    ) -> PortResult<HistoryDocument> {
        let data = json!({
            "user_id": user_id,
            "plant_name": plant_name,
            "confidence": confidence,
            "image_url": image_url,
            "created_at": Utc::now(),
        });
        let grants = [
            Grant::Read(Scope::User(user_id.into())),
            Grant::Update(Scope::User(user_id.into())),
            Grant::Delete(Scope::User(user_id.into())),
        ];
        let raw = self
            .store
            .create(HISTORY_COLLECTION, None, data, &grants)
            .await?;
        debug!(user = %user_id, plant = %plant_name, "history entry saved");
        super::decode(raw)
    }

    pub async fn for_user(&self, user_id: &str) -> PortResult<Vec<HistoryDocument>> {
        let raws = self
            .store
            .list(
                HISTORY_COLLECTION,
                ListQuery::new()
                    .equal("user_id", user_id)
                    .order_desc("created_at"),
            )
            .await?;
        super::decode_all(raws)
    }

    pub async fn delete(&self, entry_id: &str) -> PortResult<()> {
        self.store.delete(HISTORY_COLLECTION, entry_id).await
    }

    /// Deletes every entry belonging to the user. One delete per entry; a
    /// failure part-way leaves the remainder in place.
    pub async fn clear(&self, user_id: &str) -> PortResult<()> {
        let entries = self.for_user(user_id).await?;
        try_join_all(
            entries
                .iter()
                .map(|entry| self.store.delete(HISTORY_COLLECTION, &entry.id)),
        )
        .await?;
        debug!(user = %user_id, "history cleared");
        Ok(())
    }
}
