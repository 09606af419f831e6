//! Azure Resource Manager interaction module
//!
//! This module provides the core functionality for talking to the ARM
//! management API: authentication, the HTTP client and the URL helpers.
//!
//! # Module Structure
//!
//! - [`auth`] - Bearer token acquisition and caching
//! - [`client`] - Main ARM client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use ehcg::azure::{auth::AzureCredentials, client::ArmClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let credentials = AzureCredentials::from_env(Some("tenant"), Some("client"))?;
//!     let client = ArmClient::new(credentials, "https://management.azure.com")?;
//!     let url = client.resource_url("/subscriptions/.../consumergroups/cg", "2017-04-01");
//!     let body = client.get(&url).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
