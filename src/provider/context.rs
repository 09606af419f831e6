//! Per-call context handed to every resource operation

use crate::error::{ProviderError, ProviderResult};
use std::future::Future;
use std::time::Duration;

/// Operation time limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

impl Timeouts {
    /// Same limit for every operation
    pub fn uniform(limit: Duration) -> Self {
        Self {
            create: limit,
            read: limit,
            update: limit,
            delete: limit,
        }
    }
}

/// Client handle and account details for a single operation
pub struct ResourceContext<'a, C: ?Sized> {
    pub client: &'a C,
    pub subscription_id: &'a str,
    pub timeouts: Timeouts,
}

impl<'a, C: ?Sized> ResourceContext<'a, C> {
    pub fn new(client: &'a C, subscription_id: &'a str) -> Self {
        Self {
            client,
            subscription_id,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

/// Result of reading a managed resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Present(T),
    /// The remote no longer has the resource; it should be dropped from state
    Gone,
}

impl<T> ReadOutcome<T> {
    pub fn is_gone(&self) -> bool {
        matches!(self, ReadOutcome::Gone)
    }

    pub fn present(self) -> Option<T> {
        match self {
            ReadOutcome::Present(value) => Some(value),
            ReadOutcome::Gone => None,
        }
    }
}

/// Run `fut` under `limit`; an elapsed limit drops the in-flight call
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, fut: F) -> ProviderResult<T>
where
    F: Future<Output = ProviderResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{} timed out after {:?}", operation, limit);
            Err(ProviderError::Timeout {
                operation: operation.to_string(),
                after: limit,
            })
        },
    }
}
