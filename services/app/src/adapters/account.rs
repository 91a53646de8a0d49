//! services/app/src/adapters/account.rs
//!
//! Concrete implementation of the `IdentityService` port against the
//! session-based identity REST API. The session secret returned at login is
//! stored in the shared [`HttpContext`], where every adapter picks it up.

use std::sync::Arc;

use async_trait::async_trait;
use mimea_core::domain::Identity;
use mimea_core::ports::{IdentityService, PortError, PortResult};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use super::http::{response_error, transport_error, HttpContext};

pub struct HttpIdentityService {
    ctx: Arc<HttpContext>,
}

impl HttpIdentityService {
    pub fn new(ctx: Arc<HttpContext>) -> Self {
        Self { ctx }
    }

    async fn send_for_identity(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> PortResult<Identity> {
        let response = builder.send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::BadResponse(e.to_string()))?;
        parse_identity(body)
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn signup(&self, email: &str, password: &str, name: &str) -> PortResult<Identity> {
        let body = json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        });
        let identity = self
            .send_for_identity(self.ctx.request(Method::POST, "/account").json(&body))
            .await?;
        debug!(user = %identity.id, "account created");
        Ok(identity)
    }

    async fn create_session(&self, email: &str, password: &str) -> PortResult<()> {
        let body = json!({ "email": email, "password": password });
        let response = self
            .ctx
            .request(Method::POST, "/account/sessions/email")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        let session: Value = response
            .json()
            .await
            .map_err(|e| PortError::BadResponse(e.to_string()))?;
        let secret = session
            .get("secret")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.ctx.set_session_secret(secret);
        Ok(())
    }

    async fn current(&self) -> PortResult<Identity> {
        self.send_for_identity(self.ctx.request(Method::GET, "/account"))
            .await
    }

    async fn delete_session(&self) -> PortResult<()> {
        let response = self
            .ctx
            .request(Method::DELETE, "/account/sessions/current")
            .send()
            .await
            .map_err(transport_error)?;
        // The local secret is dropped regardless; a dead session is gone
        // either way.
        self.ctx.set_session_secret(None);
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }

    async fn update_name(&self, name: &str) -> PortResult<Identity> {
        self.send_for_identity(
            self.ctx
                .request(Method::PATCH, "/account/name")
                .json(&json!({ "name": name })),
        )
        .await
    }

    async fn update_email(&self, email: &str, password: &str) -> PortResult<Identity> {
        self.send_for_identity(
            self.ctx
                .request(Method::PATCH, "/account/email")
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    async fn update_phone(&self, phone: &str, password: &str) -> PortResult<Identity> {
        self.send_for_identity(
            self.ctx
                .request(Method::PATCH, "/account/phone")
                .json(&json!({ "phone": phone, "password": password })),
        )
        .await
    }

    async fn update_prefs(&self, patch: Value) -> PortResult<Identity> {
        // The collaborator replaces the bag wholesale, so merge on this side
        // to give callers merge semantics.
        let current = self.current().await?;
        let mut merged = match current.prefs {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        if let Value::Object(fields) = patch {
            for (key, value) in fields {
                merged.insert(key, value);
            }
        }
        self.send_for_identity(
            self.ctx
                .request(Method::PATCH, "/account/prefs")
                .json(&json!({ "prefs": Value::Object(merged) })),
        )
        .await
    }
}

fn parse_identity(body: Value) -> PortResult<Identity> {
    let id = body
        .get("$id")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::BadResponse("identity is missing $id".into()))?;
    Ok(Identity {
        id: id.to_string(),
        name: body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        email: body
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        phone: body
            .get("phone")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        email_verified: body
            .get("emailVerification")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        prefs: body.get("prefs").cloned().unwrap_or_else(|| json!({})),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identity_maps_account_fields() {
        let identity = parse_identity(json!({
            "$id": "u1",
            "name": "Asha",
            "email": "a@x.com",
            "phone": "",
            "emailVerification": true,
            "prefs": { "terms_accepted": true },
        }))
        .unwrap();
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.phone, None);
        assert!(identity.email_verified);
        assert!(identity.terms_accepted());
    }

    #[test]
    fn parse_identity_requires_an_id() {
        assert!(matches!(
            parse_identity(json!({ "name": "Asha" })),
            Err(PortError::BadResponse(_))
        ));
    }
}
