//! crates/mimea_core/src/containers/feedback.rs
//!
//! Prediction-feedback container.

use std::sync::Arc;

use tracing::warn;

use crate::containers::{ContainerState, SessionContainer, StateCell};
use crate::domain::{FeedbackDocument, FeedbackDraft, FeedbackStatus};
use crate::resources::FeedbackClient;

pub struct FeedbackContainer {
    client: FeedbackClient,
    session: Arc<SessionContainer>,
    state: StateCell<FeedbackDocument>,
}

impl FeedbackContainer {
    pub fn new(client: FeedbackClient, session: Arc<SessionContainer>) -> Self {
        Self {
            client,
            session,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> ContainerState<FeedbackDocument> {
        self.state.snapshot()
    }

    /// Submits a correction/report for the current user, then refetches
    /// their feedback history.
    pub async fn submit(&self, draft: &FeedbackDraft) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self.client.submit(draft, &identity.id, &identity.name).await {
            Ok(_) => self.fetch_mine().await,
            Err(e) => self.fail(format!("Failed to submit feedback: {e}")),
        }
    }

    pub async fn fetch_mine(&self) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self.client.for_user(&identity.id).await {
            Ok(entries) => self.state.finish(entries),
            Err(e) => self.fail(format!("Failed to fetch feedback: {e}")),
        }
    }

    /// Administrative view of unreviewed feedback.
    pub async fn fetch_pending(&self) {
        self.state.begin();
        match self.client.pending().await {
            Ok(entries) => self.state.finish(entries),
            Err(e) => self.fail(format!("Failed to fetch pending feedback: {e}")),
        }
    }

    /// Administrative status transition, then refetch of the pending queue.
    pub async fn set_status(&self, feedback_id: &str, status: FeedbackStatus) {
        self.state.begin();
        match self.client.update_status(feedback_id, status).await {
            Ok(_) => self.fetch_pending().await,
            Err(e) => self.fail(format!("Failed to update feedback status: {e}")),
        }
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn fail(&self, message: String) {
        warn!(%message, "feedback action failed");
        self.state.fail(message);
    }
}
