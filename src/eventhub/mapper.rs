//! Conversions between declarative state and API payloads
//!
//! `expand_*` builds request payloads from local state, `flatten_*` turns
//! API responses back into local state. None of these can fail.

use super::id::ConsumerGroupId;
use super::models::{
    AccessKeys, AccessRight, AuthorizationRule, AuthorizationRuleProperties, ConsumerGroup,
    ConsumerGroupProperties, RemoteTags,
};
use super::state::{AuthorizationRuleState, ConsumerGroupObject};
use std::collections::BTreeMap;

/// Listen/Send/Manage flags of an authorization rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rights {
    pub listen: bool,
    pub send: bool,
    pub manage: bool,
}

/// Build the create-or-update payload of a consumer group
///
/// `name` is passed separately so updates can take it from the parsed ID.
pub fn expand_consumer_group(name: &str, object: &ConsumerGroupObject) -> ConsumerGroup {
    let user_metadata = if object.user_metadata.is_empty() {
        None
    } else {
        Some(object.user_metadata.clone())
    };

    ConsumerGroup {
        id: None,
        name: Some(name.to_string()),
        properties: Some(ConsumerGroupProperties {
            user_metadata,
            ..Default::default()
        }),
    }
}

/// Rebuild local state from the ID and the (possibly partial) response
pub fn flatten_consumer_group(id: &ConsumerGroupId, model: Option<&ConsumerGroup>) -> ConsumerGroupObject {
    let user_metadata = model
        .and_then(|m| m.properties.as_ref())
        .and_then(|p| p.user_metadata.clone())
        .unwrap_or_default();

    ConsumerGroupObject {
        name: id.name.clone(),
        namespace_name: id.namespace_name.clone(),
        eventhub_name: id.eventhub_name.clone(),
        resource_group_name: id.resource_group.clone(),
        user_metadata,
    }
}

/// Rights in the fixed order Listen, Send, Manage
pub fn expand_rights(rights: &Rights) -> Vec<AccessRight> {
    let mut output = Vec::new();

    if rights.listen {
        output.push(AccessRight::Listen);
    }

    if rights.send {
        output.push(AccessRight::Send);
    }

    if rights.manage {
        output.push(AccessRight::Manage);
    }

    output
}

/// Set a flag for every known right; unknown entries are logged and skipped
pub fn flatten_rights(rights: &[String]) -> Rights {
    let mut output = Rights::default();

    for right in rights {
        match right.as_str() {
            "Listen" => output.listen = true,
            "Send" => output.send = true,
            "Manage" => output.manage = true,
            other => tracing::debug!("Unknown Authorization Rule Right {:?}", other),
        }
    }

    output
}

pub fn expand_authorization_rule(rights: &Rights) -> AuthorizationRule {
    AuthorizationRule {
        id: None,
        name: None,
        properties: Some(AuthorizationRuleProperties {
            rights: expand_rights(rights)
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }),
    }
}

/// Merge the rule's rights and keys into `state`
pub fn flatten_authorization_rule(
    state: &mut AuthorizationRuleState,
    model: Option<&AuthorizationRule>,
    keys: Option<&AccessKeys>,
) {
    let rights = model
        .and_then(|m| m.properties.as_ref())
        .map(|p| flatten_rights(&p.rights))
        .unwrap_or_default();
    state.listen = rights.listen;
    state.send = rights.send;
    state.manage = rights.manage;

    if let Some(keys) = keys {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        state.primary_key = text(&keys.primary_key);
        state.secondary_key = text(&keys.secondary_key);
        state.primary_connection_string = text(&keys.primary_connection_string);
        state.secondary_connection_string = text(&keys.secondary_connection_string);
        state.primary_connection_string_alias = text(&keys.alias_primary_connection_string);
        state.secondary_connection_string_alias = text(&keys.alias_secondary_connection_string);
    }
}

/// Tags as sent to the API; an empty map still produces an (empty) object
///
/// Consumer groups and Event Hub authorization rules carry no tags. These
/// mirror the tag handling of the taggable Event Hub resources and are not
/// wired into either resource.
pub fn expand_tags(input: &BTreeMap<String, String>) -> Option<RemoteTags> {
    Some(input.clone())
}

/// Tags as stored locally; absent remote tags become an empty map
pub fn flatten_tags(input: Option<&RemoteTags>) -> BTreeMap<String, String> {
    input.cloned().unwrap_or_default()
}
