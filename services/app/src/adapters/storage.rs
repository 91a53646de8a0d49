//! services/app/src/adapters/storage.rs
//!
//! Concrete implementation of the `FileStore` port against the blob-store
//! REST API. View/download links are deterministic templated URLs with no
//! signed expiry: once uploaded, a file is permanently reachable.

use std::sync::Arc;

use async_trait::async_trait;
use mimea_core::domain::StoredFile;
use mimea_core::ports::{FileStore, PortError, PortResult};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use super::http::{response_error, transport_error, HttpContext};

pub struct HttpFileStore {
    ctx: Arc<HttpContext>,
    bucket_id: String,
}

impl HttpFileStore {
    pub fn new(ctx: Arc<HttpContext>, bucket_id: String) -> Self {
        Self { ctx, bucket_id }
    }

    fn files_path(&self) -> String {
        format!("/storage/buckets/{}/files", self.bucket_id)
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PortResult<StoredFile> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| PortError::Validation(format!("bad content type: {e}")))?;
        let form = Form::new().text("fileId", "unique()").part("file", part);
        let response = self
            .ctx
            .request(Method::POST, &self.files_path())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::BadResponse(e.to_string()))?;
        parse_file(body)
    }

    async fn delete(&self, file_id: &str) -> PortResult<()> {
        let response = self
            .ctx
            .request(Method::DELETE, &format!("{}/{}", self.files_path(), file_id))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }

    fn view_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.ctx.endpoint(),
            self.bucket_id,
            file_id,
            self.ctx.project_id()
        )
    }

    fn download_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/download?project={}",
            self.ctx.endpoint(),
            self.bucket_id,
            file_id,
            self.ctx.project_id()
        )
    }
}

fn parse_file(body: Value) -> PortResult<StoredFile> {
    let id = body
        .get("$id")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::BadResponse("file response is missing $id".into()))?;
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mime_type = body
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or("application/octet-stream");
    let size = body
        .get("sizeOriginal")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    Ok(StoredFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpFileStore {
        let ctx = Arc::new(HttpContext::new(
            reqwest::Client::new(),
            "https://backend.example.com/v1".into(),
            "mimea".into(),
            None,
        ));
        HttpFileStore::new(ctx, "guidebooks".into())
    }

    #[test]
    fn view_url_is_templated_from_endpoint_bucket_and_project() {
        assert_eq!(
            store().view_url("f123"),
            "https://backend.example.com/v1/storage/buckets/guidebooks/files/f123/view?project=mimea"
        );
    }

    #[test]
    fn download_url_is_templated_from_endpoint_bucket_and_project() {
        assert_eq!(
            store().download_url("f123"),
            "https://backend.example.com/v1/storage/buckets/guidebooks/files/f123/download?project=mimea"
        );
    }

    #[test]
    fn parse_file_extracts_metadata() {
        let file = parse_file(serde_json::json!({
            "$id": "f1",
            "name": "guide.pdf",
            "mimeType": "application/pdf",
            "sizeOriginal": 2048,
        }))
        .unwrap();
        assert_eq!(file.id, "f1");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size, 2048);
    }
}
