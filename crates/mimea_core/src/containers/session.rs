//! crates/mimea_core/src/containers/session.rs
//!
//! Authentication container. Other containers read (never write) this one to
//! determine the caller's identity before issuing a remote call.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::Identity;
use crate::ports::IdentityService;

/// Minimum accepted password length, checked locally before any remote call.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_initialized: bool,
    pub error: Option<String>,
}

pub struct SessionContainer {
    account: Arc<dyn IdentityService>,
    state: RwLock<SessionState>,
}

impl SessionContainer {
    pub fn new(account: Arc<dyn IdentityService>) -> Self {
        Self {
            account,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    /// Resumes an existing session, if any. A missing session is a normal
    /// outcome, not an error.
    pub async fn initialize(&self) {
        {
            let mut state = self.write();
            state.is_loading = true;
            state.error = None;
        }
        match self.account.current().await {
            Ok(identity) => {
                debug!(user = %identity.id, "session resumed");
                let mut state = self.write();
                state.identity = Some(identity);
                state.is_authenticated = true;
                state.is_loading = false;
                state.is_initialized = true;
            }
            Err(e) => {
                debug!(error = %e, "no session to resume");
                let mut state = self.write();
                state.identity = None;
                state.is_authenticated = false;
                state.is_loading = false;
                state.is_initialized = true;
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) {
        if email.trim().is_empty() || password.is_empty() {
            self.fail("Email and password are required".into());
            return;
        }
        self.begin();
        let result = async {
            self.account.create_session(email, password).await?;
            self.account.current().await
        }
        .await;
        match result {
            Ok(identity) => self.authenticate(identity),
            Err(e) => self.fail(format!("Failed to log in: {e}")),
        }
    }

    /// Creates the account, opens a session, and fetches the new identity.
    pub async fn signup(&self, email: &str, password: &str, name: &str) {
        if email.trim().is_empty() || name.trim().is_empty() {
            self.fail("Name and email are required".into());
            return;
        }
        if password.len() < MIN_PASSWORD_LEN {
            self.fail(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ));
            return;
        }
        self.begin();
        let result = async {
            self.account.signup(email, password, name).await?;
            self.account.create_session(email, password).await?;
            self.account.current().await
        }
        .await;
        match result {
            Ok(identity) => self.authenticate(identity),
            Err(e) => self.fail(format!("Failed to sign up: {e}")),
        }
    }

    pub async fn logout(&self) {
        self.begin();
        match self.account.delete_session().await {
            Ok(()) => {
                let mut state = self.write();
                state.identity = None;
                state.is_authenticated = false;
                state.is_loading = false;
            }
            Err(e) => self.fail(format!("Failed to log out: {e}")),
        }
    }

    /// Records terms acceptance in the identity's preference bag.
    pub async fn accept_terms(&self) {
        if !self.is_authenticated() {
            self.fail("User not authenticated".into());
            return;
        }
        self.begin();
        let patch = json!({
            "terms_accepted": true,
            "terms_accepted_at": Utc::now(),
        });
        match self.account.update_prefs(patch).await {
            Ok(identity) => self.authenticate(identity),
            Err(e) => self.fail(format!("Failed to record terms acceptance: {e}")),
        }
    }

    pub async fn update_name(&self, name: &str) {
        if name.trim().is_empty() {
            self.fail("Name is required".into());
            return;
        }
        self.begin();
        match self.account.update_name(name).await {
            Ok(identity) => self.authenticate(identity),
            Err(e) => self.fail(format!("Failed to update name: {e}")),
        }
    }

    pub async fn update_email(&self, email: &str, password: &str) {
        self.begin();
        match self.account.update_email(email, password).await {
            Ok(identity) => self.authenticate(identity),
            Err(e) => self.fail(format!("Failed to update email: {e}")),
        }
    }

    pub async fn update_phone(&self, phone: &str, password: &str) {
        self.begin();
        match self.account.update_phone(phone, password).await {
            Ok(identity) => self.authenticate(identity),
            Err(e) => self.fail(format!("Failed to update phone: {e}")),
        }
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    fn authenticate(&self, identity: Identity) {
        let mut state = self.write();
        state.identity = Some(identity);
        state.is_authenticated = true;
        state.is_loading = false;
    }

    fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    fn fail(&self, message: String) {
        warn!(%message, "session action failed");
        let mut state = self.write();
        state.error = Some(message);
        state.is_loading = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().expect("session state lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().expect("session state lock poisoned")
    }
}
