//! crates/mimea_core/src/containers/identify.rs
//!
//! Identification container: sends one image to the ML inference endpoint
//! and, on request, records the result in the user's history with exactly
//! the class name and confidence the endpoint returned.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::containers::HistoryContainer;
use crate::domain::Prediction;
use crate::ports::PlantClassifier;

#[derive(Debug, Clone, Default)]
pub struct IdentifyState {
    pub last_prediction: Option<Prediction>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct IdentifyContainer {
    classifier: Arc<dyn PlantClassifier>,
    history: Arc<HistoryContainer>,
    state: RwLock<IdentifyState>,
}

impl IdentifyContainer {
    pub fn new(classifier: Arc<dyn PlantClassifier>, history: Arc<HistoryContainer>) -> Self {
        Self {
            classifier,
            history,
            state: RwLock::new(IdentifyState::default()),
        }
    }

    pub fn snapshot(&self) -> IdentifyState {
        self.read().clone()
    }

    pub fn last_prediction(&self) -> Option<Prediction> {
        self.read().last_prediction.clone()
    }

    /// Classifies one image. Any endpoint failure surfaces as a single
    /// generic message; there is no retry.
    pub async fn classify(&self, image: Vec<u8>, filename: &str) {
        if image.is_empty() {
            self.fail("No image selected".into());
            return;
        }
        {
            let mut state = self.write();
            state.is_loading = true;
            state.error = None;
        }
        match self.classifier.classify(image, filename).await {
            Ok(prediction) => {
                let mut state = self.write();
                state.last_prediction = Some(prediction);
                state.is_loading = false;
            }
            Err(e) => {
                warn!(error = %e, "classification failed");
                self.fail("Could not identify the plant. Please try again.".into());
            }
        }
    }

    /// Classifies, then saves the prediction to history together with the
    /// local image reference.
    pub async fn classify_and_record(&self, image: Vec<u8>, filename: &str, image_url: &str) {
        self.classify(image, filename).await;
        let snapshot = self.snapshot();
        // A stale prediction from an earlier call must not be recorded when
        // this classification failed.
        let prediction = match (snapshot.error.is_none(), snapshot.last_prediction) {
            (true, Some(p)) => p,
            _ => return,
        };
        self.history
            .save(&prediction.class_name, prediction.confidence, image_url)
            .await;
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    fn fail(&self, message: String) {
        let mut state = self.write();
        state.error = Some(message);
        state.is_loading = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, IdentifyState> {
        self.state.read().expect("identify state lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, IdentifyState> {
        self.state.write().expect("identify state lock poisoned")
    }
}
