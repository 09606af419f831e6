//! Azure Authentication
//!
//! Handles authentication using a pre-issued access token or an Azure AD
//! service principal (OAuth2 client credentials flow).

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default scope for Azure Resource Manager access
pub const DEFAULT_SCOPE: &str = "https://management.azure.com/.default";

/// Azure AD authority used for token requests
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Token expiry buffer - refresh tokens this much before they actually expire
/// This prevents using tokens that are about to expire during a request
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if the token endpoint omits `expires_in` (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Service principal used for the client credentials flow
#[derive(Clone)]
pub struct ServicePrincipal {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority: String,
}

impl std::fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
enum TokenSource {
    /// Token handed in from outside (e.g. `az account get-access-token`)
    Static(String),
    ClientCredentials {
        principal: ServicePrincipal,
        http: Client,
    },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Azure credentials holder with token caching
#[derive(Clone)]
pub struct AzureCredentials {
    source: TokenSource,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    /// Check if this cached token is still valid
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl AzureCredentials {
    /// Credentials that always hand out the given bearer token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Credentials backed by a service principal secret
    pub fn from_service_principal(principal: ServicePrincipal) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("ehcg/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create token HTTP client")?;

        Ok(Self {
            source: TokenSource::ClientCredentials { principal, http },
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Resolve credentials from the environment
    ///
    /// `ARM_ACCESS_TOKEN` wins; otherwise `ARM_CLIENT_SECRET` is combined with
    /// the given tenant and client IDs.
    pub fn from_env(tenant_id: Option<&str>, client_id: Option<&str>) -> Result<Self> {
        if let Ok(token) = std::env::var("ARM_ACCESS_TOKEN") {
            if !token.trim().is_empty() {
                tracing::debug!("Using access token from ARM_ACCESS_TOKEN");
                return Ok(Self::from_token(token.trim()));
            }
        }

        let tenant_id = tenant_id.context(
            "No tenant configured. Set ARM_TENANT_ID or use --tenant-id (or set ARM_ACCESS_TOKEN)",
        )?;
        let client_id = client_id.context(
            "No client configured. Set ARM_CLIENT_ID or use --client-id (or set ARM_ACCESS_TOKEN)",
        )?;
        let client_secret = std::env::var("ARM_CLIENT_SECRET")
            .context("ARM_CLIENT_SECRET must be set for service principal authentication")?;

        Self::from_service_principal(ServicePrincipal {
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret,
            authority: DEFAULT_AUTHORITY.to_string(),
        })
    }

    /// Get an access token for API calls
    /// Security: Checks token expiry before returning cached token
    pub async fn get_token(&self) -> Result<String> {
        let (principal, http) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ClientCredentials { principal, http } => (principal, http),
        };

        // Check cache first - but only return if token is still valid
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            principal.authority.trim_end_matches('/'),
            urlencoding::encode(&principal.tenant_id)
        );
        tracing::debug!("POST {}", url);

        let response = http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", principal.client_id.as_str()),
                ("client_secret", principal.client_secret.as_str()),
                ("scope", DEFAULT_SCOPE),
            ])
            .send()
            .await
            .context("Failed to send token request")?;

        let status = response.status();
        if !status.is_success() {
            // Security: never log the token endpoint body, it may echo the request
            return Err(anyhow::anyhow!("Token request failed: {}", status));
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        let ttl = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.access_token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token.access_token)
    }

    /// Whether a rejected token can be replaced by fetching a new one
    pub fn can_refresh(&self) -> bool {
        matches!(self.source, TokenSource::ClientCredentials { .. })
    }

    /// Force refresh the token
    pub async fn refresh_token(&self) -> Result<String> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }

        self.get_token().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_is_returned_verbatim() {
        let credentials = AzureCredentials::from_token("abc123");
        let token = tokio_test::block_on(credentials.get_token()).unwrap();
        assert_eq!(token, "abc123");
        assert!(!credentials.can_refresh());
    }

    #[test]
    fn test_service_principal_debug_redacts_secret() {
        let principal = ServicePrincipal {
            tenant_id: "tenant".to_string(),
            client_id: "client".to_string(),
            client_secret: "hunter2".to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
        };
        let rendered = format!("{:?}", principal);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_cached_token_validity() {
        let fresh = CachedToken {
            token: "t".to_string(),
            expires_at: Instant::now() + Duration::from_secs(60),
        };
        assert!(fresh.is_valid());

        let stale = CachedToken {
            token: "t".to_string(),
            expires_at: Instant::now() - Duration::from_secs(1),
        };
        assert!(!stale.is_valid());
    }
}
