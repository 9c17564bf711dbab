//! REST client for the hosted identity provider.

use crate::auth::session::Session;
use crate::error::{ForgeError, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Operations the application consumes from the identity provider.
///
/// [`AuthClient`] is the real implementation; tests substitute mocks so the
/// sign-in/sign-up flows can be exercised without a network.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a new account. A confirmation email may be sent; no session
    /// is returned until the address is confirmed.
    async fn sign_up(&self, email: &str, password: &str, redirect_to: Option<&str>)
        -> Result<()>;

    /// Exchanges email/password credentials for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

/// Builder for [`AuthClient`].
#[derive(Debug, Clone, Default)]
pub struct AuthClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
}

impl AuthClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project base URL. Falls back to `SUPABASE_URL` env var.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the publishable API key. Falls back to `SUPABASE_ANON_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the client, resolving URL and key.
    pub fn build(self) -> Result<AuthClient> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("SUPABASE_URL").ok())
            .ok_or_else(|| ForgeError::Auth("SUPABASE_URL not set and no base URL provided".into()))?;
        let api_key = self
            .api_key
            .or_else(|| std::env::var("SUPABASE_ANON_KEY").ok())
            .ok_or_else(|| {
                ForgeError::Auth("SUPABASE_ANON_KEY not set and no API key provided".into())
            })?;

        Ok(AuthClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

/// Email/password client for a Supabase-hosted identity provider.
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    /// Creates a new [`AuthClientBuilder`].
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::new()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// Extracts the provider's human-readable message from an error body.
    async fn error_from(response: reqwest::Response) -> ForgeError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&text)
            .ok()
            .and_then(|body| body.message())
            .unwrap_or(text);
        if message.trim().is_empty() {
            return ForgeError::Api {
                status,
                message: "identity provider returned no error detail".into(),
            };
        }
        ForgeError::Auth(message)
    }
}

#[async_trait]
impl IdentityProvider for AuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<()> {
        let mut request = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&Credentials { email, password });
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let grant: TokenGrant = response.json().await?;
        Ok(Session {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            email: grant.user.email.unwrap_or_else(|| email.to_string()),
            expires_at: grant
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: GrantUser,
}

#[derive(Debug, Deserialize)]
struct GrantUser {
    #[serde(default)]
    email: Option<String>,
}

/// The provider reports errors under a handful of field names depending on
/// the endpoint.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ProviderErrorBody {
    fn message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.message)
    }
}
