//! crates/mimea_core/src/containers/plant_info.rs
//!
//! Plant reference-data container.

use tracing::warn;

use crate::containers::{ContainerState, StateCell};
use crate::domain::PlantInfoDocument;
use crate::resources::PlantInfoClient;

pub struct PlantInfoContainer {
    client: PlantInfoClient,
    state: StateCell<PlantInfoDocument>,
}

impl PlantInfoContainer {
    pub fn new(client: PlantInfoClient) -> Self {
        Self {
            client,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> ContainerState<PlantInfoDocument> {
        self.state.snapshot()
    }

    pub async fn fetch(&self) {
        self.state.begin();
        match self.client.list().await {
            Ok(plants) => self.state.finish(plants),
            Err(e) => self.fail(format!("Failed to fetch plants: {e}")),
        }
    }

    pub async fn search(&self, query: &str) {
        self.state.begin();
        match self.client.search(query).await {
            Ok(plants) => self.state.finish(plants),
            Err(e) => self.fail(format!("Failed to search plants: {e}")),
        }
    }

    /// Direct lookup for a prediction result; does not touch `items`.
    pub async fn lookup(&self, class_name: &str) -> Option<PlantInfoDocument> {
        match self.client.by_class_name(class_name).await {
            Ok(plant) => plant,
            Err(e) => {
                self.fail(format!("Failed to fetch plant info: {e}"));
                None
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn fail(&self, message: String) {
        warn!(%message, "plant info action failed");
        self.state.fail(message);
    }
}
