//! crates/mimea_core/src/containers/remedies.rs
//!
//! Remedy container, including the verification workflow:
//! `Unverified → Verified → Unverified`, guarded by the caller's profile
//! role being herbalist. Self-verification is permitted.

use std::sync::Arc;

use tracing::warn;

use crate::containers::{ContainerState, ProfileContainer, SessionContainer, StateCell};
use crate::domain::{RemedyDocument, RemedyDraft};
use crate::resources::RemedyClient;

pub struct RemedyContainer {
    client: RemedyClient,
    session: Arc<SessionContainer>,
    profiles: Arc<ProfileContainer>,
    state: StateCell<RemedyDocument>,
}

impl RemedyContainer {
    pub fn new(
        client: RemedyClient,
        session: Arc<SessionContainer>,
        profiles: Arc<ProfileContainer>,
    ) -> Self {
        Self {
            client,
            session,
            profiles,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> ContainerState<RemedyDocument> {
        self.state.snapshot()
    }

    pub async fn fetch(&self) {
        self.state.begin();
        match self.client.list().await {
            Ok(remedies) => self.state.finish(remedies),
            Err(e) => self.fail(format!("Failed to fetch remedies: {e}")),
        }
    }

    pub async fn fetch_verified(&self) {
        self.state.begin();
        match self.client.verified().await {
            Ok(remedies) => self.state.finish(remedies),
            Err(e) => self.fail(format!("Failed to fetch verified remedies: {e}")),
        }
    }

    pub async fn fetch_unverified(&self) {
        self.state.begin();
        match self.client.unverified().await {
            Ok(remedies) => self.state.finish(remedies),
            Err(e) => self.fail(format!("Failed to fetch unverified remedies: {e}")),
        }
    }

    pub async fn fetch_by_plant(&self, plant_name: &str) {
        self.state.begin();
        match self.client.by_plant(plant_name).await {
            Ok(remedies) => self.state.finish(remedies),
            Err(e) => self.fail(format!("Failed to fetch plant remedies: {e}")),
        }
    }

    pub async fn fetch_mine(&self) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self.client.by_author(&identity.id).await {
            Ok(remedies) => self.state.finish(remedies),
            Err(e) => self.fail(format!("Failed to fetch your remedies: {e}")),
        }
    }

    /// Submits a remedy for the current user, then refetches to reconcile.
    pub async fn add(&self, draft: &RemedyDraft) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self
            .client
            .create(draft, &identity.id, &identity.name)
            .await
        {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to add remedy: {e}")),
        }
    }

    pub async fn delete(&self, remedy_id: &str) {
        self.state.begin();
        match self.client.delete(remedy_id).await {
            Ok(()) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to delete remedy: {e}")),
        }
    }

    /// Marks a remedy verified by the current herbalist. The role guard is a
    /// local precondition; nothing is sent when it fails.
    pub async fn verify(&self, remedy_id: &str) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        if !self.profiles.is_herbalist() {
            self.fail("Only herbalists can verify remedies".into());
            return;
        }
        self.state.begin();
        match self
            .client
            .verify(remedy_id, &identity.id, &identity.name)
            .await
        {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to verify remedy: {e}")),
        }
    }

    /// Resets a remedy to unverified. Idempotent: unverifying an
    /// already-unverified remedy changes nothing and does not error.
    pub async fn unverify(&self, remedy_id: &str) {
        if self.session.current_identity().is_none() {
            self.fail("User not authenticated".into());
            return;
        }
        if !self.profiles.is_herbalist() {
            self.fail("Only herbalists can verify remedies".into());
            return;
        }
        self.state.begin();
        match self.client.unverify(remedy_id).await {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to unverify remedy: {e}")),
        }
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn fail(&self, message: String) {
        warn!(%message, "remedy action failed");
        self.state.fail(message);
    }
}
