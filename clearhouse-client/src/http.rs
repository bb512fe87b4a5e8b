//! HTTP table store backend
//!
//! Speaks the hosted backend's REST conventions: one route per table
//! under `/rest/v1/`, key filters as `<col>=eq.<value>` query
//! parameters, and `Prefer: return=representation` to get mutated rows
//! echoed back.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;

use crate::{ClientError, ClientResult, StoreConfig, TableStore};

/// HTTP client for the hosted table store
#[derive(Debug, Clone)]
pub struct HttpTableStore {
    client: Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

/// Session returned by password sign-in
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
}

impl HttpTableStore {
    /// Create a new store from configuration
    pub fn new(config: &StoreConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: config.token.clone(),
        }
    }

    /// Adopt a bearer token (after sign-in)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Bearer value: user token when signed in, API key otherwise
    fn bearer(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or(&self.api_key))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, self.bearer())
    }

    /// Handle the HTTP response
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    /// Unwrap the single-row echo the store returns for mutations.
    ///
    /// An empty echo means the write was accepted without
    /// representation, which callers treat the same as a failed echo.
    fn single_row(mut rows: Vec<Value>, table: &str) -> ClientResult<Value> {
        if rows.is_empty() {
            return Err(ClientError::InvalidResponse(format!(
                "no row echoed for {table}"
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// Invoke a remote procedure under `/rest/v1/rpc/`
    pub async fn rpc(&self, name: &str, params: &Value) -> ClientResult<Value> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, name);
        let response = self.request(self.client.post(&url).json(params)).send().await?;
        Self::handle_response(response).await
    }

    // ========== Auth API ==========

    /// Sign in with email and password against the hosted auth
    /// endpoint. The returned token is not adopted automatically; call
    /// [`HttpTableStore::with_token`] with it.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        #[derive(serde::Serialize)]
        struct PasswordGrant<'a> {
            email: &'a str,
            password: &'a str,
        }

        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        Self::handle_response(response).await
    }
}

#[async_trait]
impl TableStore for HttpTableStore {
    async fn select_all(&self, table: &str) -> ClientResult<Vec<Value>> {
        let url = format!("{}?select=*", self.rest_url(table));
        let response = self.request(self.client.get(&url)).send().await?;
        Self::handle_response(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        let response = self
            .request(self.client.post(self.rest_url(table)).json(&row))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        Self::single_row(rows, table)
    }

    async fn update(
        &self,
        table: &str,
        key_col: &str,
        key: &str,
        patch: Value,
    ) -> ClientResult<Value> {
        let url = format!("{}?{}=eq.{}", self.rest_url(table), key_col, key);
        let response = self
            .request(self.client.patch(&url).json(&patch))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        Self::single_row(rows, table)
    }

    async fn delete(&self, table: &str, key_col: &str, key: &str) -> ClientResult<Value> {
        let url = format!("{}?{}=eq.{}", self.rest_url(table), key_col, key);
        let response = self
            .request(self.client.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        Self::single_row(rows, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_url_shape() {
        let store = StoreConfig::new("https://abc.example.co/", "anon").build();
        assert_eq!(
            store.rest_url("duty_payments"),
            "https://abc.example.co/rest/v1/duty_payments"
        );
    }

    #[test]
    fn test_bearer_falls_back_to_api_key() {
        let store = StoreConfig::new("https://abc.example.co", "anon").build();
        assert_eq!(store.bearer(), "Bearer anon");
        let store = store.with_token("user-jwt");
        assert_eq!(store.bearer(), "Bearer user-jwt");
    }

    #[test]
    fn test_single_row_rejects_empty_echo() {
        let err = HttpTableStore::single_row(vec![], "clients").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        let row = HttpTableStore::single_row(vec![json!({"ain": "A1"})], "clients").unwrap();
        assert_eq!(row["ain"], "A1");
    }
}
