//! crates/mimea_core/src/containers/profiles.rs
//!
//! User-profile container: the caller's own profile plus the herbalist
//! directory. The remedy container reads this one to check the caller's
//! role before a verification call.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::domain::{UserProfileDocument, UserProfileDraft, UserRole};
use crate::resources::ProfileClient;

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub current_profile: Option<UserProfileDocument>,
    pub herbalists: Vec<UserProfileDocument>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct ProfileContainer {
    client: ProfileClient,
    state: RwLock<ProfileState>,
}

impl ProfileContainer {
    pub fn new(client: ProfileClient) -> Self {
        Self {
            client,
            state: RwLock::new(ProfileState::default()),
        }
    }

    pub fn snapshot(&self) -> ProfileState {
        self.read().clone()
    }

    pub fn current_profile(&self) -> Option<UserProfileDocument> {
        self.read().current_profile.clone()
    }

    pub fn is_herbalist(&self) -> bool {
        self.read()
            .current_profile
            .as_ref()
            .map(|p| p.user_type == UserRole::Herbalist)
            .unwrap_or(false)
    }

    pub fn is_verified_herbalist(&self) -> bool {
        self.read()
            .current_profile
            .as_ref()
            .map(|p| p.user_type == UserRole::Herbalist && p.verified)
            .unwrap_or(false)
    }

    pub async fn fetch_profile(&self, user_id: &str) {
        self.begin();
        match self.client.by_user(user_id).await {
            Ok(profile) => {
                let mut state = self.write();
                state.current_profile = profile;
                state.is_loading = false;
            }
            Err(e) => self.fail(format!("Failed to fetch profile: {e}")),
        }
    }

    pub async fn create_profile(&self, draft: &UserProfileDraft) {
        self.begin();
        match self.client.create(draft).await {
            Ok(_) => self.fetch_profile(&draft.user_id).await,
            Err(e) => self.fail(format!("Failed to create profile: {e}")),
        }
    }

    pub async fn update_profile(&self, profile_id: &str, patch: serde_json::Value) {
        let user_id = match self.read().current_profile.as_ref() {
            Some(profile) => profile.user_id.clone(),
            None => {
                self.fail("No profile loaded".into());
                return;
            }
        };
        self.begin();
        match self.client.update(profile_id, patch).await {
            Ok(_) => self.fetch_profile(&user_id).await,
            Err(e) => self.fail(format!("Failed to update profile: {e}")),
        }
    }

    pub async fn delete_profile(&self, profile_id: &str) {
        self.begin();
        match self.client.delete(profile_id).await {
            Ok(()) => {
                let mut state = self.write();
                state.current_profile = None;
                state.is_loading = false;
            }
            Err(e) => self.fail(format!("Failed to delete profile: {e}")),
        }
    }

    pub async fn fetch_herbalists(&self) {
        self.begin();
        match self.client.herbalists().await {
            Ok(herbalists) => self.finish_herbalists(herbalists),
            Err(e) => self.fail(format!("Failed to fetch herbalists: {e}")),
        }
    }

    pub async fn fetch_verified_herbalists(&self) {
        self.begin();
        match self.client.verified_herbalists().await {
            Ok(herbalists) => self.finish_herbalists(herbalists),
            Err(e) => self.fail(format!("Failed to fetch verified herbalists: {e}")),
        }
    }

    pub async fn search_by_specialization(&self, specialization: &str) {
        self.begin();
        match self.client.by_specialization(specialization).await {
            Ok(herbalists) => self.finish_herbalists(herbalists),
            Err(e) => self.fail(format!("Failed to search herbalists: {e}")),
        }
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    fn finish_herbalists(&self, herbalists: Vec<UserProfileDocument>) {
        let mut state = self.write();
        state.herbalists = herbalists;
        state.is_loading = false;
    }

    fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    fn fail(&self, message: String) {
        warn!(%message, "profile action failed");
        let mut state = self.write();
        state.error = Some(message);
        state.is_loading = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, ProfileState> {
        self.state.read().expect("profile state lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProfileState> {
        self.state.write().expect("profile state lock poisoned")
    }
}
