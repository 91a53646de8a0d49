//! crates/mimea_core/src/containers/history.rs
//!
//! Identification-history container, scoped to the current user.

use std::sync::Arc;

use tracing::warn;

use crate::containers::{ContainerState, SessionContainer, StateCell};
use crate::domain::HistoryDocument;
use crate::resources::HistoryClient;

pub struct HistoryContainer {
    client: HistoryClient,
    session: Arc<SessionContainer>,
    state: StateCell<HistoryDocument>,
}

impl HistoryContainer {
    pub fn new(client: HistoryClient, session: Arc<SessionContainer>) -> Self {
        Self {
            client,
            session,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> ContainerState<HistoryDocument> {
        self.state.snapshot()
    }

    pub async fn fetch(&self) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self.client.for_user(&identity.id).await {
            Ok(entries) => self.state.finish(entries),
            Err(e) => self.fail(format!("Failed to fetch history: {e}")),
        }
    }

    /// Records one identification, then refetches the list.
    pub async fn save(&self, plant_name: &str, confidence: f64, image_url: &str) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self
            .client
            .save(&identity.id, plant_name, confidence, image_url)
            .await
        {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to save history: {e}")),
        }
    }

    pub async fn delete_entry(&self, entry_id: &str) {
        self.state.begin();
        match self.client.delete(entry_id).await {
            Ok(()) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to delete history item: {e}")),
        }
    }

    /// Deletes every entry for the current user.
    pub async fn clear(&self) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self.client.clear(&identity.id).await {
            Ok(()) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to clear history: {e}")),
        }
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn fail(&self, message: String) {
        warn!(%message, "history action failed");
        self.state.fail(message);
    }
}
