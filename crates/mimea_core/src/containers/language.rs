//! crates/mimea_core/src/containers/language.rs
//!
//! UI-language container. The selected language code is the only piece of
//! client-side persisted state; everything else is refetched remotely.

use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::ports::PreferenceStore;

pub const LANGUAGE_KEY: &str = "language";
pub const DEFAULT_LANGUAGE: &str = "en";

pub struct LanguageContainer {
    prefs: Arc<dyn PreferenceStore>,
    current: RwLock<String>,
}

impl LanguageContainer {
    /// Loads the persisted language, falling back to the default when none
    /// was stored or the store cannot be read.
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let current = match prefs.get(LANGUAGE_KEY) {
            Ok(Some(code)) => code,
            Ok(None) => DEFAULT_LANGUAGE.to_string(),
            Err(e) => {
                warn!(error = %e, "failed to load persisted language");
                DEFAULT_LANGUAGE.to_string()
            }
        };
        Self {
            prefs,
            current: RwLock::new(current),
        }
    }

    pub fn current(&self) -> String {
        self.current
            .read()
            .expect("language lock poisoned")
            .clone()
    }

    /// Switches the language and persists the choice. The in-memory value
    /// changes even when persistence fails; the error is only logged.
    pub fn set(&self, code: &str) {
        *self.current.write().expect("language lock poisoned") = code.to_string();
        if let Err(e) = self.prefs.set(LANGUAGE_KEY, code) {
            warn!(error = %e, "failed to persist language selection");
        }
    }
}
