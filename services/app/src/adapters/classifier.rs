//! services/app/src/adapters/classifier.rs
//!
//! Concrete implementation of the `PlantClassifier` port against the hosted
//! inference endpoint: one multipart POST, one JSON body back. No auth, no
//! versioning, no retry.

use async_trait::async_trait;
use mimea_core::domain::Prediction;
use mimea_core::ports::{PlantClassifier, PortError, PortResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::http::transport_error;

pub struct HttpPlantClassifier {
    http: reqwest::Client,
    predict_url: String,
}

impl HttpPlantClassifier {
    pub fn new(http: reqwest::Client, predict_url: String) -> Self {
        Self {
            http,
            predict_url: format!("{}/predict", predict_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl PlantClassifier for HttpPlantClassifier {
    async fn classify(&self, image: Vec<u8>, filename: &str) -> PortResult<Prediction> {
        let part = Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "prediction service returned {status}"
            )));
        }
        parse_prediction(&body)
    }
}

/// The endpoint returns a string body that must parse as
/// `{ "class": ..., "confidence": ... }`; anything else is a distinct
/// malformed-response failure.
fn parse_prediction(body: &str) -> PortResult<Prediction> {
    #[derive(Deserialize)]
    struct PredictionResponse {
        class: String,
        confidence: f64,
    }

    let parsed: PredictionResponse = serde_json::from_str(body)
        .map_err(|e| PortError::BadResponse(format!("prediction body is not valid JSON: {e}")))?;
    Ok(Prediction {
        class_name: parsed.class,
        confidence: parsed.confidence,
    })
}
