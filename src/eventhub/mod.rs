//! Event Hub resources
//!
//! Consumer groups and Event Hub scoped authorization rules, mapped onto the
//! `Microsoft.EventHub` management API.
//!
//! # Module Structure
//!
//! - [`id`] - Composite resource identifiers and their canonical strings
//! - [`models`] - Wire models of the management API
//! - [`state`] - Typed declarative state decoded from configuration
//! - [`mapper`] - Expand/flatten between state and wire models
//! - [`validate`] - Field and cross-field rules
//! - [`api`] - Remote operations as traits, implemented by the ARM client
//! - [`consumer_group_resource`], [`consumer_group_data_source`],
//!   [`authorization_rule_resource`] - CRUD and lookup handlers

pub mod api;
pub mod authorization_rule_resource;
pub mod consumer_group_data_source;
pub mod consumer_group_resource;
pub mod id;
pub mod mapper;
pub mod models;
pub mod state;
pub mod validate;

pub use authorization_rule_resource::AuthorizationRuleResource;
pub use consumer_group_data_source::ConsumerGroupDataSource;
pub use consumer_group_resource::ConsumerGroupResource;
pub use id::{AuthorizationRuleId, ConsumerGroupId};
