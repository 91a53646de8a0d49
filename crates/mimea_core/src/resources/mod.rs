//! crates/mimea_core/src/resources/mod.rs
//!
//! Thin per-resource clients mapping domain operations onto the remote
//! collaborator ports. No business logic beyond request shaping and response
//! typing lives here; consistency decisions belong to the state containers.

pub mod blogs;
pub mod feedback;
pub mod guidebooks;
pub mod history;
pub mod plant_info;
pub mod profiles;
pub mod remedies;

pub use blogs::{BlogClient, LikeToggle};
pub use feedback::FeedbackClient;
pub use guidebooks::GuidebookClient;
pub use history::HistoryClient;
pub use plant_info::PlantInfoClient;
pub use profiles::ProfileClient;
pub use remedies::RemedyClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ports::{PortError, PortResult, RawDocument};

/// Decodes a raw document into a typed one, injecting the server-assigned id
/// into the payload before deserializing.
pub(crate) fn decode<T: DeserializeOwned>(raw: RawDocument) -> PortResult<T> {
    let RawDocument { id, mut data, .. } = raw;
    match &mut data {
        Value::Object(map) => {
            map.insert("id".into(), Value::String(id));
        }
        _ => {
            return Err(PortError::BadResponse(
                "document payload is not an object".into(),
            ))
        }
    }
    serde_json::from_value(data)
        .map_err(|e| PortError::BadResponse(format!("failed to decode document: {e}")))
}

pub(crate) fn decode_all<T: DeserializeOwned>(raws: Vec<RawDocument>) -> PortResult<Vec<T>> {
    raws.into_iter().map(decode).collect()
}
