//! Declarative state of the Event Hub resources
//!
//! These structs are decoded once from untyped configuration and encoded back
//! after every read, so the handlers never look at loosely typed values.

use super::id::Identity;
use serde::{Deserialize, Serialize};

/// Consumer group as declared in configuration and as tracked in state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerGroupObject {
    pub name: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub resource_group_name: String,
    /// Empty when unset
    #[serde(default)]
    pub user_metadata: String,
}

impl ConsumerGroupObject {
    pub fn identity(&self) -> Identity<'_> {
        [
            ("name", self.name.as_str()),
            ("namespace_name", self.namespace_name.as_str()),
            ("eventhub_name", self.eventhub_name.as_str()),
            ("resource_group_name", self.resource_group_name.as_str()),
        ]
    }
}

/// Input of the consumer group lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerGroupLookup {
    pub name: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub resource_group_name: String,
}

/// Output of the consumer group lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsumerGroupDataSourceState {
    pub id: String,
    pub name: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub resource_group_name: String,
    pub user_metadata: String,
}

/// Authorization rule as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationRuleConfig {
    pub name: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub resource_group_name: String,
    #[serde(default)]
    pub listen: bool,
    #[serde(default)]
    pub send: bool,
    #[serde(default)]
    pub manage: bool,
}

impl AuthorizationRuleConfig {
    pub fn identity(&self) -> Identity<'_> {
        [
            ("name", self.name.as_str()),
            ("namespace_name", self.namespace_name.as_str()),
            ("eventhub_name", self.eventhub_name.as_str()),
            ("resource_group_name", self.resource_group_name.as_str()),
        ]
    }
}

/// Authorization rule as tracked in state, including the computed keys
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorizationRuleState {
    pub name: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub resource_group_name: String,
    pub listen: bool,
    pub send: bool,
    pub manage: bool,
    pub primary_key: String,
    pub secondary_key: String,
    pub primary_connection_string: String,
    pub secondary_connection_string: String,
    pub primary_connection_string_alias: String,
    pub secondary_connection_string_alias: String,
}

impl std::fmt::Debug for AuthorizationRuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys and connection strings are sensitive
        f.debug_struct("AuthorizationRuleState")
            .field("name", &self.name)
            .field("namespace_name", &self.namespace_name)
            .field("eventhub_name", &self.eventhub_name)
            .field("resource_group_name", &self.resource_group_name)
            .field("listen", &self.listen)
            .field("send", &self.send)
            .field("manage", &self.manage)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consumer_group_object_metadata_defaults_to_empty() {
        let object: ConsumerGroupObject = serde_json::from_value(json!({
            "name": "cg",
            "namespace_name": "acctest-ns",
            "eventhub_name": "eh",
            "resource_group_name": "rg"
        }))
        .unwrap();
        assert_eq!(object.user_metadata, "");
    }

    #[test]
    fn test_consumer_group_object_rejects_unknown_fields() {
        let result: Result<ConsumerGroupObject, _> = serde_json::from_value(json!({
            "name": "cg",
            "namespace_name": "acctest-ns",
            "eventhub_name": "eh",
            "resource_group_name": "rg",
            "location": "westeurope"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_consumer_group_object_rejects_wrong_types() {
        let result: Result<ConsumerGroupObject, _> = serde_json::from_value(json!({
            "name": 42,
            "namespace_name": "acctest-ns",
            "eventhub_name": "eh",
            "resource_group_name": "rg"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_authorization_rule_config_rights_default_false() {
        let config: AuthorizationRuleConfig = serde_json::from_value(json!({
            "name": "rule",
            "namespace_name": "acctest-ns",
            "eventhub_name": "eh",
            "resource_group_name": "rg",
            "listen": true
        }))
        .unwrap();
        assert!(config.listen);
        assert!(!config.send);
        assert!(!config.manage);
    }

    #[test]
    fn test_authorization_rule_state_debug_hides_keys() {
        let state = AuthorizationRuleState {
            primary_key: "super-secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", state).contains("super-secret"));
    }
}
