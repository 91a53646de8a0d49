//! crates/mimea_core/src/resources/plant_info.rs
//!
//! Resource client for plant reference data, keyed by the classifier's
//! class-name string. Read-only from the app's perspective; the mutation
//! calls exist for administrative upkeep.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::{PlantInfoDocument, PlantInfoDraft};
use crate::ports::{DocumentStore, ListQuery, PortResult};

pub const PLANT_INFO_COLLECTION: &str = "plant_info";

#[derive(Clone)]
pub struct PlantInfoClient {
    store: Arc<dyn DocumentStore>,
}

impl PlantInfoClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Looks up the reference entry for a classifier class name, if any.
    pub async fn by_class_name(&self, class_name: &str) -> PortResult<Option<PlantInfoDocument>> {
        let raws = self
            .store
            .list(
                PLANT_INFO_COLLECTION,
                ListQuery::new().equal("class_names", class_name).limit(1),
            )
            .await?;
        raws.into_iter().next().map(super::decode).transpose()
    }

    pub async fn list(&self) -> PortResult<Vec<PlantInfoDocument>> {
        let raws = self
            .store
            .list(
                PLANT_INFO_COLLECTION,
                ListQuery::new().order_asc("common_name"),
            )
            .await?;
        super::decode_all(raws)
    }

    /// Search by common name; an empty query is equivalent to `list`.
    pub async fn search(&self, query: &str) -> PortResult<Vec<PlantInfoDocument>> {
        if query.trim().is_empty() {
            return self.list().await;
        }
        let raws = self
            .store
            .list(
                PLANT_INFO_COLLECTION,
                ListQuery::new()
                    .search(&["common_name"], query)
                    .order_asc("common_name"),
            )
            .await?;
        super::decode_all(raws)
    }

    pub async fn add(&self, draft: &PlantInfoDraft) -> PortResult<PlantInfoDocument> {
        let now = Utc::now();
        let data = json!({
            "class_names": draft.class_name,
            "common_name": draft.common_name,
            "scientific_name": draft.scientific_name,
            "luhya_name": draft.luhya_name,
            "ailment_treated": draft.ailment_treated,
            "preparation_method": draft.preparation_method,
            "dosage": draft.dosage,
            "created_at": now,
            "updated_at": now,
        });
        let raw = self
            .store
            .create(PLANT_INFO_COLLECTION, None, data, &[])
            .await?;
        super::decode(raw)
    }

    pub async fn update(
        &self,
        plant_id: &str,
        mut patch: serde_json::Value,
    ) -> PortResult<PlantInfoDocument> {
        if let Some(map) = patch.as_object_mut() {
            map.insert("updated_at".into(), json!(Utc::now()));
        }
        let raw = self.store.update(PLANT_INFO_COLLECTION, plant_id, patch).await?;
        super::decode(raw)
    }

    pub async fn delete(&self, plant_id: &str) -> PortResult<()> {
        self.store.delete(PLANT_INFO_COLLECTION, plant_id).await
    }
}
