//! HTTP utilities for Azure Resource Manager REST calls

use crate::error::ApiError;
use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull `error.code` / `error.message` out of an ARM error envelope
fn parse_error_body(status: u16, body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let code = error
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("API request failed with status {}", status));

    ApiError::from_status(status, code, message)
}

/// HTTP client wrapper for ARM API calls
#[derive(Clone)]
pub struct AzureHttpClient {
    client: Client,
}

impl AzureHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ehcg/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, token: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, url, token, None).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, url: &str, token: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::PUT, url, token, Some(body)).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, token: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.send(Method::POST, url, token, body).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, token: &str) -> Result<Value, ApiError> {
        self.send(Method::DELETE, url, token, None).await
    }

    fn request(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!("{} {} (client request id {})", method, url, request_id);

        self.client
            .request(method, url)
            .bearer_auth(token)
            .header("x-ms-client-request-id", request_id.to_string())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let mut request = self.request(method, url, token);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(parse_error_body(status.as_u16(), &response_body));
        }

        // Handle empty response (204, 202 without body)
        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).map_err(|e| {
            ApiError::from_status(
                status.as_u16(),
                None,
                format!("Failed to parse response JSON: {}", e),
            )
        })
    }
}

/// Format an API error for display on the command line
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_api_error(error: &ApiError) -> String {
    match error.status {
        Some(401) => {
            "Authentication failed. Check ARM_ACCESS_TOKEN or the service principal credentials."
                .to_string()
        },
        Some(403) => "Permission denied. Check the role assignments on the subscription.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(409) => "Resource conflict. The resource may already exist or be in use.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => format!("Invalid request: {}", sanitize_for_log(&error.message)),
        Some(500..=599) => "Azure service temporarily unavailable. Please try again.".to_string(),
        _ => sanitize_for_log(&error.to_string()),
    }
}
