//! Wire models for the Event Hub management API (api-version 2017-04-01)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API version used for every Event Hub call
pub const API_VERSION: &str = "2017-04-01";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerGroupProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroup {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ConsumerGroupProperties>,
}

/// A single permission granted by an authorization rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessRight {
    Listen,
    Send,
    Manage,
}

impl AccessRight {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRight::Listen => "Listen",
            AccessRight::Send => "Send",
            AccessRight::Manage => "Manage",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRuleProperties {
    /// Kept as strings on read so unknown rights don't fail deserialization
    #[serde(default)]
    pub rights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRule {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<AuthorizationRuleProperties>,
}

/// Response of the `listKeys` action
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeys {
    #[serde(default)]
    pub primary_connection_string: Option<String>,
    #[serde(default)]
    pub secondary_connection_string: Option<String>,
    #[serde(default)]
    pub alias_primary_connection_string: Option<String>,
    #[serde(default)]
    pub alias_secondary_connection_string: Option<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub secondary_key: Option<String>,
    #[serde(default)]
    pub key_name: Option<String>,
}

/// Remote representation of resource tags
pub type RemoteTags = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consumer_group_serializes_only_writable_fields() {
        let group = ConsumerGroup {
            id: Some("/ignored".to_string()),
            name: Some("cg".to_string()),
            properties: Some(ConsumerGroupProperties {
                user_metadata: Some("meta".to_string()),
                created_at: Some("2020-01-01T00:00:00Z".to_string()),
                updated_at: None,
            }),
        };

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            json!({"name": "cg", "properties": {"userMetadata": "meta"}})
        );
    }

    #[test]
    fn test_consumer_group_deserializes_without_properties() {
        let group: ConsumerGroup = serde_json::from_value(json!({"name": "cg"})).unwrap();
        assert_eq!(group.name.as_deref(), Some("cg"));
        assert!(group.properties.is_none());
    }

    #[test]
    fn test_access_keys_deserialize() {
        let keys: AccessKeys = serde_json::from_value(json!({
            "primaryConnectionString": "Endpoint=sb://a/;SharedAccessKeyName=r;SharedAccessKey=k1",
            "primaryKey": "k1",
            "secondaryKey": "k2",
            "keyName": "r"
        }))
        .unwrap();
        assert_eq!(keys.primary_key.as_deref(), Some("k1"));
        assert_eq!(keys.secondary_key.as_deref(), Some("k2"));
        assert!(keys.alias_primary_connection_string.is_none());
    }
}
