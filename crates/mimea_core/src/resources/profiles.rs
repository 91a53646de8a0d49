//! crates/mimea_core/src/resources/profiles.rs
//!
//! Resource client for user profiles and the herbalist directory.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::{UserProfileDocument, UserProfileDraft, UserRole};
use crate::ports::{DocumentStore, ListQuery, PortResult};

pub const PROFILE_COLLECTION: &str = "user_profiles";

pub const HERBALIST_PAGE_SIZE: u32 = 50;
pub const SPECIALIZATION_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct ProfileClient {
    store: Arc<dyn DocumentStore>,
}

impl ProfileClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates the one profile a user gets at signup time. The role is
    /// immutable afterwards and new profiles always start unverified.
    pub async fn create(&self, draft: &UserProfileDraft) -> PortResult<UserProfileDocument> {
        let now = Utc::now();
        let mut data = serde_json::to_value(draft)
            .map_err(|e| crate::ports::PortError::Unexpected(e.to_string()))?;
        if let Some(map) = data.as_object_mut() {
            map.insert("verified".into(), json!(false));
            map.insert("created_at".into(), json!(now));
            map.insert("updated_at".into(), json!(now));
        }
        let raw = self.store.create(PROFILE_COLLECTION, None, data, &[]).await?;
        debug!(user = %draft.user_id, "user profile created");
        super::decode(raw)
    }

    pub async fn by_user(&self, user_id: &str) -> PortResult<Option<UserProfileDocument>> {
        let raws = self
            .store
            .list(
                PROFILE_COLLECTION,
                ListQuery::new().equal("user_id", user_id).limit(1),
            )
            .await?;
        raws.into_iter().next().map(super::decode).transpose()
    }

    /// Partial update by the owning user; bumps `updated_at`.
    pub async fn update(
        &self,
        profile_id: &str,
        mut patch: serde_json::Value,
    ) -> PortResult<UserProfileDocument> {
        if let Some(map) = patch.as_object_mut() {
            map.insert("updated_at".into(), json!(Utc::now()));
        }
        let raw = self.store.update(PROFILE_COLLECTION, profile_id, patch).await?;
        super::decode(raw)
    }

    pub async fn delete(&self, profile_id: &str) -> PortResult<()> {
        self.store.delete(PROFILE_COLLECTION, profile_id).await
    }

    pub async fn herbalists(&self) -> PortResult<Vec<UserProfileDocument>> {
        let raws = self
            .store
            .list(
                PROFILE_COLLECTION,
                ListQuery::new()
                    .equal("user_type", json!(UserRole::Herbalist))
                    .order_desc("created_at")
                    .limit(HERBALIST_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    pub async fn verified_herbalists(&self) -> PortResult<Vec<UserProfileDocument>> {
        let raws = self
            .store
            .list(
                PROFILE_COLLECTION,
                ListQuery::new()
                    .equal("user_type", json!(UserRole::Herbalist))
                    .equal("verified", true)
                    .order_desc("created_at")
                    .limit(HERBALIST_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    pub async fn by_specialization(
        &self,
        specialization: &str,
    ) -> PortResult<Vec<UserProfileDocument>> {
        let raws = self
            .store
            .list(
                PROFILE_COLLECTION,
                ListQuery::new()
                    .equal("user_type", json!(UserRole::Herbalist))
                    .contains("specializations", specialization)
                    .order_desc("created_at")
                    .limit(SPECIALIZATION_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }
}
