//! ARM Client
//!
//! Main client for interacting with the Azure Resource Manager API, combining
//! authentication and HTTP functionality.

use super::auth::AzureCredentials;
use super::http::AzureHttpClient;
use crate::error::ApiError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::future::Future;
use url::Url;

/// Public cloud management endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Main ARM client
#[derive(Clone)]
pub struct ArmClient {
    pub credentials: AzureCredentials,
    pub http: AzureHttpClient,
    pub endpoint: Url,
}

impl ArmClient {
    /// Create a new ARM client
    pub fn new(credentials: AzureCredentials, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid management endpoint: {}", endpoint))?;

        let http = AzureHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            endpoint,
        })
    }

    async fn token(&self) -> Result<String, ApiError> {
        self.credentials
            .get_token()
            .await
            .map_err(|e| ApiError::transport(format!("{:#}", e)))
    }

    /// Run `call` with a bearer token, retrying once with a fresh token on 401
    async fn authorized<F, Fut>(&self, call: F) -> Result<Value, ApiError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let token = self.token().await?;
        match call(token).await {
            Err(e) if e.status == Some(401) && self.credentials.can_refresh() => {
                tracing::debug!("Token rejected, refreshing and retrying once");
                let token = self
                    .credentials
                    .refresh_token()
                    .await
                    .map_err(|e| ApiError::transport(format!("{:#}", e)))?;
                call(token).await
            },
            other => other,
        }
    }

    /// Make a GET request to an ARM resource
    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.authorized(|token| async move { self.http.get(url, &token).await })
            .await
    }

    /// Make a PUT request to an ARM resource
    pub async fn put(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        self.authorized(|token| async move { self.http.put(url, &token, body).await })
            .await
    }

    /// Make a POST request to an ARM resource action
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.authorized(|token| async move { self.http.post(url, &token, body).await })
            .await
    }

    /// Make a DELETE request to an ARM resource
    pub async fn delete(&self, url: &str) -> Result<Value, ApiError> {
        self.authorized(|token| async move { self.http.delete(url, &token).await })
            .await
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build the URL of a resource from its ID and API version
    pub fn resource_url(&self, resource_id: &str, api_version: &str) -> String {
        self.resource_action_url(resource_id, None, api_version)
    }

    /// Build the URL of a resource action (e.g. `listKeys`)
    pub fn resource_action_url(
        &self,
        resource_id: &str,
        action: Option<&str>,
        api_version: &str,
    ) -> String {
        let mut url = self.endpoint.clone();

        let base = self.endpoint.path().trim_end_matches('/');
        let path = match action {
            Some(action) => format!("{}{}/{}", base, resource_id, action),
            None => format!("{}{}", base, resource_id),
        };
        url.set_path(&path);
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", api_version);

        url.to_string()
    }
}
