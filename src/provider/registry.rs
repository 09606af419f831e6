//! Schema Registry - Load resource schemas from JSON
//!
//! This module loads the argument/attribute declarations of every resource
//! and data source from an embedded JSON file and checks untyped
//! configuration against them before it is decoded into typed state.

use super::context::Timeouts;
use crate::eventhub::validate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

/// Embedded schema files (compiled into the binary)
const SCHEMA_FILES: &[&str] = &[include_str!("../resources/eventhub.json")];

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
}

/// Attribute definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDef {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub default: Option<Value>,
    /// Name of a rule in [`validator_for`]
    #[serde(default)]
    pub validator: Option<String>,
}

impl AttributeDef {
    /// Whether users may set this attribute
    pub fn is_argument(&self) -> bool {
        self.required || self.optional
    }
}

/// Timeouts in minutes; missing entries fall back to the defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeoutsDef {
    #[serde(default)]
    pub create: Option<u64>,
    #[serde(default)]
    pub read: Option<u64>,
    #[serde(default)]
    pub update: Option<u64>,
    #[serde(default)]
    pub delete: Option<u64>,
}

/// Which identifier codec a resource uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    ConsumerGroup,
    AuthorizationRule,
}

/// Resource or data source schema from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDef {
    pub display_name: String,
    pub id_kind: IdKind,
    #[serde(default)]
    pub timeouts: TimeoutsDef,
    pub attributes: BTreeMap<String, AttributeDef>,
}

impl SchemaDef {
    pub fn timeouts(&self) -> Timeouts {
        let defaults = Timeouts::default();
        let minutes = |v: Option<u64>, fallback: Duration| {
            v.map(|m| Duration::from_secs(m * 60)).unwrap_or(fallback)
        };

        Timeouts {
            create: minutes(self.timeouts.create, defaults.create),
            read: minutes(self.timeouts.read, defaults.read),
            update: minutes(self.timeouts.update, defaults.update),
            delete: minutes(self.timeouts.delete, defaults.delete),
        }
    }

    /// Names of attributes whose change requires replacement
    pub fn force_new_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.force_new)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Check untyped configuration against the declared arguments
    ///
    /// Returns one diagnostic per problem; an empty list means the
    /// configuration is acceptable.
    pub fn validate_config(&self, config: &Value) -> Vec<String> {
        let Value::Object(map) = config else {
            return vec!["configuration must be an object".to_string()];
        };

        let mut diagnostics = Vec::new();

        for (key, value) in map {
            match self.attributes.get(key) {
                None => diagnostics.push(format!("unsupported argument {:?}", key)),
                Some(attr) if attr.computed && !attr.is_argument() && !value.is_null() => {
                    diagnostics.push(format!("{:?} is computed and cannot be set", key))
                },
                Some(_) => {},
            }
        }

        for (name, attr) in &self.attributes {
            if !attr.is_argument() {
                continue;
            }

            let value = match map.get(name) {
                None | Some(Value::Null) => {
                    if attr.required {
                        diagnostics.push(format!("the argument {:?} is required", name));
                    }
                    continue;
                },
                Some(value) => value,
            };

            match (attr.kind, value) {
                (AttributeType::String, Value::String(s)) => {
                    let check = attr.validator.as_deref().and_then(validator_for);
                    if let Some(check) = check {
                        if let Err(e) = check(s) {
                            diagnostics.push(format!("{}: {}", name, e));
                        }
                    }
                },
                (AttributeType::Bool, Value::Bool(_)) => {},
                (kind, _) => diagnostics.push(format!("{:?} must be of type {:?}", name, kind)),
            }
        }

        diagnostics
    }

    /// Drop explicit nulls and fill in declared defaults
    ///
    /// A null argument means "unset", so after this step the typed state
    /// structs only ever see absent or well-typed values.
    pub fn normalize_config(&self, config: Value) -> Value {
        let Value::Object(mut map) = config else {
            return config;
        };

        map.retain(|_, value| !value.is_null());

        for (name, attr) in &self.attributes {
            if !attr.is_argument() || map.contains_key(name) {
                continue;
            }
            if let Some(default) = &attr.default {
                map.insert(name.clone(), default.clone());
            }
        }

        Value::Object(map)
    }

    /// Copy of `state` with every sensitive attribute masked, for logging
    pub fn redact(&self, state: &Value) -> Value {
        let mut state = state.clone();
        if let Value::Object(map) = &mut state {
            for (name, value) in map.iter_mut() {
                let sensitive = self.attributes.get(name).is_some_and(|a| a.sensitive);
                if sensitive && !value.is_null() {
                    *value = Value::String("(sensitive value)".to_string());
                }
            }
        }
        state
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, SchemaDef>,
    #[serde(default)]
    pub data_sources: BTreeMap<String, SchemaDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<SchemaConfig> = OnceLock::new();

/// Get the schema registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static SchemaConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = SchemaConfig::default();

        for content in SCHEMA_FILES {
            let partial: SchemaConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded schema JSON: {}", e));
            final_config.resources.extend(partial.resources);
            final_config.data_sources.extend(partial.data_sources);
        }

        final_config
    })
}

/// Get a resource schema by type name
pub fn get_resource(key: &str) -> Option<&'static SchemaDef> {
    get_registry().resources.get(key)
}

/// Get a data source schema by type name
pub fn get_data_source(key: &str) -> Option<&'static SchemaDef> {
    get_registry().data_sources.get(key)
}

/// Get all resource type names
pub fn get_all_resource_keys() -> Vec<&'static str> {
    get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect()
}

/// Resolve a validator name used in the schema JSON
pub fn validator_for(name: &str) -> Option<fn(&str) -> Result<(), String>> {
    let check: fn(&str) -> Result<(), String> = match name {
        "consumer_group_name" => validate::consumer_group_name,
        "consumer_group_lookup_name" => validate::consumer_group_lookup_name,
        "namespace_name" => validate::namespace_name,
        "eventhub_name" => validate::eventhub_name,
        "authorization_rule_name" => validate::authorization_rule_name,
        "resource_group_name" => validate::resource_group_name,
        "user_metadata" => validate::user_metadata,
        _ => return None,
    };
    Some(check)
}
