//! Event Hub consumer group and authorization rule bindings for the Azure
//! Resource Manager API.
//!
//! Declarative resource state is validated against an embedded schema,
//! decoded into typed structs and mapped onto `Microsoft.EventHub` calls by
//! the handlers in [`eventhub`]. [`provider::execute`] is the single entry
//! point taking untyped configuration.

pub mod azure;
pub mod config;
pub mod error;
pub mod eventhub;
pub mod provider;

pub use error::{ApiError, ProviderError, ProviderResult};
