//! Provider plumbing shared by all resources
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource schemas from embedded JSON
//! - [`context`] - Request-scoped client handle, timeouts and read outcomes
//! - [`dispatch`] - Routes a resource type and operation to its handler
//!
//! # Schema Definitions
//!
//! Schemas are defined in JSON files under `src/resources/`:
//! - `eventhub.json` - consumer groups and authorization rules

pub mod context;
pub mod dispatch;
pub mod registry;

pub use context::{ReadOutcome, ResourceContext, Timeouts};
pub use dispatch::{execute, subscription_from_id, validate, Operation, Request};
pub use registry::{get_all_resource_keys, get_data_source, get_resource};
