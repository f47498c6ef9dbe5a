//! Auth backend adapter for the hosted auth/database service.
//!
//! Sessions are checked against `GET /auth/v1/user`, roles are read from the
//! `profiles` table through the REST interface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use pricing_types::{AuthBackend, AuthError, Role, Session};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    role: Option<String>,
}

pub struct HostedAuth {
    base_url: String,
    api_key: String,
    http: Client,
}

impl HostedAuth {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }
}

#[async_trait]
impl AuthBackend for HostedAuth {
    #[tracing::instrument(skip_all)]
    async fn session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let resp = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => return Err(AuthError::Status(status.as_u16())),
            _ => {}
        }

        let user = resp
            .json::<AuthUser>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        Ok(Some(Session {
            user_id: user.id,
            email: user.email,
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn role(&self, user_id: Uuid) -> Result<Option<Role>, AuthError> {
        let resp = self
            .http
            .get(format!("{}/rest/v1/profiles", self.base_url))
            .query(&[("id", format!("eq.{user_id}")), ("select", "role".into())])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let rows = resp
            .json::<Vec<ProfileRow>>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        Ok(rows
            .into_iter()
            .next()
            .map(|row| Role::from_profile_str(row.role.as_deref().unwrap_or_default())))
    }
}
