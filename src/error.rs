//! Error types for provider operations
//!
//! [`ApiError`] describes a failed call against the management API and
//! [`ProviderError`] is what every resource operation returns.

use std::time::Duration;

/// Result alias for resource operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A failed call against the management API
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", self.describe())]
pub struct ApiError {
    /// HTTP status, `None` when the request never produced a response
    pub status: Option<u16>,
    /// Error code reported by the API (e.g. `ResourceNotFound`)
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn from_status(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_status(404, Some("ResourceNotFound".to_string()), message)
    }

    /// Whether the remote reported the addressed resource as absent
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    fn describe(&self) -> String {
        match (self.status, self.code.as_deref()) {
            (Some(status), Some(code)) => {
                format!("status {} ({}): {}", status, code, self.message)
            },
            (Some(status), None) => format!("status {}: {}", status, self.message),
            (None, _) => format!("transport error: {}", self.message),
        }
    }
}

/// Errors surfaced by resource and data source operations
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("parsing {kind} ID {input:?}: {reason}")]
    MalformedIdentifier {
        kind: &'static str,
        input: String,
        reason: String,
    },

    #[error("{0} was not found")]
    NotFound(String),

    #[error(
        "A resource with the ID {id:?} already exists - to be managed via Terraform this resource needs to be imported into the State. Please see the resource documentation for {resource_type:?} for more information."
    )]
    RequiresImport {
        resource_type: &'static str,
        id: String,
    },

    #[error("{action}: {source}")]
    RemoteCallFailure {
        action: String,
        #[source]
        source: ApiError,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        operation: String,
        after: Duration,
    },

    #[error("decoding {resource_type} configuration: {source}")]
    Decode {
        resource_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    pub fn malformed_identifier(
        kind: &'static str,
        input: &str,
        reason: impl Into<String>,
    ) -> Self {
        ProviderError::MalformedIdentifier {
            kind,
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn remote(action: impl Into<String>, source: ApiError) -> Self {
        ProviderError::RemoteCallFailure {
            action: action.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ProviderError::Validation(message.into())
    }
}
