//! crates/mimea_core/src/resources/feedback.rs
//!
//! Resource client for user-submitted prediction feedback. Status
//! transitions (`pending → reviewed → resolved`) are administrative; the
//! update call exists but is not driven by any screen in this client.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::{FeedbackDocument, FeedbackDraft, FeedbackStatus};
use crate::ports::{DocumentStore, Grant, ListQuery, PortResult, Scope};

pub const FEEDBACK_COLLECTION: &str = "prediction_feedback";

pub const FEEDBACK_PAGE_SIZE: u32 = 50;
pub const PENDING_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct FeedbackClient {
    store: Arc<dyn DocumentStore>,
}

impl FeedbackClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn submit(
        &self,
        draft: &FeedbackDraft,
        user_id: &str,
        user_name: &str,
    ) -> PortResult<FeedbackDocument> {
        let now = Utc::now();
        let data = json!({
            "user_id": user_id,
            "user_name": user_name,
            "predicted_class": draft.predicted_class,
            "confidence_score": draft.confidence_score,
            "image_uri": draft.image_uri,
            "feedback_type": draft.feedback_type,
            "suggested_correct_name": draft.suggested_correct_name,
            "additional_comments": draft.additional_comments,
            "status": FeedbackStatus::Pending,
            "created_at": now,
            "updated_at": now,
        });
        let grants = [
            Grant::Read(Scope::Any),
            Grant::Update(Scope::User(user_id.into())),
            Grant::Delete(Scope::User(user_id.into())),
        ];
        let raw = self
            .store
            .create(FEEDBACK_COLLECTION, None, data, &grants)
            .await?;
        debug!(user = %user_id, class = %draft.predicted_class, "feedback submitted");
        super::decode(raw)
    }

    pub async fn for_user(&self, user_id: &str) -> PortResult<Vec<FeedbackDocument>> {
        let raws = self
            .store
            .list(
                FEEDBACK_COLLECTION,
                ListQuery::new()
                    .equal("user_id", user_id)
                    .order_desc("created_at")
                    .limit(FEEDBACK_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    pub async fn pending(&self) -> PortResult<Vec<FeedbackDocument>> {
        let raws = self
            .store
            .list(
                FEEDBACK_COLLECTION,
                ListQuery::new()
                    .equal("status", json!(FeedbackStatus::Pending))
                    .order_desc("created_at")
                    .limit(PENDING_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    pub async fn update_status(
        &self,
        feedback_id: &str,
        status: FeedbackStatus,
    ) -> PortResult<FeedbackDocument> {
        let patch = json!({
            "status": status,
            "updated_at": Utc::now(),
        });
        let raw = self.store.update(FEEDBACK_COLLECTION, feedback_id, patch).await?;
        super::decode(raw)
    }
}
