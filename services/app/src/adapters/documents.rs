//! services/app/src/adapters/documents.rs
//!
//! Concrete implementation of the `DocumentStore` port against the
//! backend-as-a-service document REST API. Handles request shaping (query
//! strings, permission grants) and response typing; nothing else.

use std::sync::Arc;

use async_trait::async_trait;
use mimea_core::ports::{
    DocumentStore, Filter, Grant, ListQuery, PortResult, RawDocument, Scope,
};
use reqwest::Method;
use serde_json::{json, Value};

use super::http::{parse_document, response_error, transport_error, HttpContext};

pub struct HttpDocumentStore {
    ctx: Arc<HttpContext>,
    database_id: String,
}

impl HttpDocumentStore {
    pub fn new(ctx: Arc<HttpContext>, database_id: String) -> Self {
        Self { ctx, database_id }
    }

    fn collection_path(&self, collection: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection
        )
    }

    fn document_path(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_path(collection), id)
    }

    async fn send_for_document(&self, builder: reqwest::RequestBuilder) -> PortResult<RawDocument> {
        let response = builder.send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| mimea_core::ports::PortError::BadResponse(e.to_string()))?;
        parse_document(body)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Value,
        grants: &[Grant],
    ) -> PortResult<RawDocument> {
        let body = json!({
            "documentId": id.unwrap_or("unique()"),
            "data": data,
            "permissions": grants.iter().map(grant_string).collect::<Vec<_>>(),
        });
        let builder = self
            .ctx
            .request(Method::POST, &self.collection_path(collection))
            .json(&body);
        self.send_for_document(builder).await
    }

    async fn get(&self, collection: &str, id: &str) -> PortResult<RawDocument> {
        let builder = self
            .ctx
            .request(Method::GET, &self.document_path(collection, id));
        self.send_for_document(builder).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> PortResult<RawDocument> {
        let builder = self
            .ctx
            .request(Method::PATCH, &self.document_path(collection, id))
            .json(&json!({ "data": patch }));
        self.send_for_document(builder).await
    }

    async fn delete(&self, collection: &str, id: &str) -> PortResult<()> {
        let response = self
            .ctx
            .request(Method::DELETE, &self.document_path(collection, id))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }

    async fn list(&self, collection: &str, query: ListQuery) -> PortResult<Vec<RawDocument>> {
        let queries: Vec<(String, String)> = query_strings(&query)
            .into_iter()
            .map(|q| ("queries[]".to_string(), q))
            .collect();
        let response = self
            .ctx
            .request(Method::GET, &self.collection_path(collection))
            .query(&queries)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| mimea_core::ports::PortError::BadResponse(e.to_string()))?;
        let documents = body
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                mimea_core::ports::PortError::BadResponse(
                    "list response is missing documents".into(),
                )
            })?;
        documents.into_iter().map(parse_document).collect()
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> PortResult<RawDocument> {
        // The collaborator applies the adjustment server-side, so concurrent
        // callers cannot lose updates to a read-modify-write cycle.
        let verb = if delta >= 0 { "increment" } else { "decrement" };
        let path = format!("{}/{}/{}", self.document_path(collection, id), field, verb);
        let builder = self
            .ctx
            .request(Method::PATCH, &path)
            .json(&json!({ "value": delta.abs() }));
        self.send_for_document(builder).await
    }
}

/// Serializes a grant the way the collaborator's permission strings expect.
fn grant_string(grant: &Grant) -> String {
    let (verb, scope) = match grant {
        Grant::Read(scope) => ("read", scope),
        Grant::Update(scope) => ("update", scope),
        Grant::Delete(scope) => ("delete", scope),
    };
    match scope {
        Scope::Any => format!("{verb}(\"any\")"),
        Scope::User(id) => format!("{verb}(\"user:{id}\")"),
    }
}

/// Renders a [`ListQuery`] into the collaborator's query-string syntax.
fn query_strings(query: &ListQuery) -> Vec<String> {
    let mut out = Vec::new();
    for filter in &query.filters {
        match filter {
            Filter::Equal(field, value) => {
                out.push(format!("equal(\"{field}\", [{value}])"));
            }
            Filter::Contains(field, element) => {
                out.push(format!("contains(\"{field}\", [{element:?}])"));
            }
        }
    }
    if let Some(search) = &query.search {
        let clauses: Vec<String> = search
            .fields
            .iter()
            .map(|field| format!("search(\"{field}\", {:?})", search.text))
            .collect();
        if clauses.len() == 1 {
            out.push(clauses.into_iter().next().expect("one clause"));
        } else {
            out.push(format!("or({})", clauses.join(", ")));
        }
    }
    if let Some(order) = &query.order {
        if order.descending {
            out.push(format!("orderDesc(\"{}\")", order.field));
        } else {
            out.push(format!("orderAsc(\"{}\")", order.field));
        }
    }
    if let Some(limit) = query.limit {
        out.push(format!("limit({limit})"));
    }
    out
}
