//! Resource identifiers
//!
//! ARM addresses every Event Hub child resource with a path of alternating
//! keys and values. Both identifiers here share the same five-part shape:
//! subscription, resource group, namespace, event hub and a leaf name.

use crate::error::{ProviderError, ProviderResult};
use std::fmt;
use std::str::FromStr;

const PROVIDER_NAMESPACE: &str = "Microsoft.EventHub";

/// Identifying argument values keyed by argument name; any change forces a
/// new resource
pub type Identity<'a> = [(&'static str, &'a str); 4];

enum Segment {
    Literal(&'static str),
    Value(&'static str),
}

/// Split `input` according to `template`, returning the captured values in order
fn parse_segments(
    kind: &'static str,
    input: &str,
    template: &[Segment],
) -> ProviderResult<Vec<String>> {
    let Some(path) = input.strip_prefix('/') else {
        return Err(ProviderError::malformed_identifier(
            kind,
            input,
            "expected the ID to start with '/'",
        ));
    };

    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() != template.len() {
        return Err(ProviderError::malformed_identifier(
            kind,
            input,
            format!("expected {} segments, got {}", template.len(), parts.len()),
        ));
    }

    let mut values = Vec::new();
    for (part, segment) in parts.iter().zip(template) {
        match segment {
            Segment::Literal(expected) if part != expected => {
                return Err(ProviderError::malformed_identifier(
                    kind,
                    input,
                    format!("expected segment {:?}, got {:?}", expected, part),
                ));
            },
            Segment::Literal(_) => {},
            Segment::Value(name) if part.is_empty() => {
                return Err(ProviderError::malformed_identifier(
                    kind,
                    input,
                    format!("the segment {:?} was empty", name),
                ));
            },
            Segment::Value(_) => values.push(part.to_string()),
        }
    }

    Ok(values)
}

/// Identifier of an Event Hub consumer group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsumerGroupId {
    pub subscription_id: String,
    pub resource_group: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub name: String,
}

impl ConsumerGroupId {
    const KIND: &'static str = "Consumergroup";

    const TEMPLATE: &'static [Segment] = &[
        Segment::Literal("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Literal("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Literal("providers"),
        Segment::Literal(PROVIDER_NAMESPACE),
        Segment::Literal("namespaces"),
        Segment::Value("namespaceName"),
        Segment::Literal("eventhubs"),
        Segment::Value("eventhubName"),
        Segment::Literal("consumergroups"),
        Segment::Value("name"),
    ];

    pub fn new(
        subscription_id: &str,
        resource_group: &str,
        namespace_name: &str,
        eventhub_name: &str,
        name: &str,
    ) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            namespace_name: namespace_name.to_string(),
            eventhub_name: eventhub_name.to_string(),
            name: name.to_string(),
        }
    }

    /// Argument values this ID pins down
    pub fn identity(&self) -> Identity<'_> {
        [
            ("name", self.name.as_str()),
            ("namespace_name", self.namespace_name.as_str()),
            ("eventhub_name", self.eventhub_name.as_str()),
            ("resource_group_name", self.resource_group.as_str()),
        ]
    }

    /// Parse a canonical consumer group ID
    pub fn parse(input: &str) -> ProviderResult<Self> {
        let mut values = parse_segments(Self::KIND, input, Self::TEMPLATE)?.into_iter();
        // parse_segments guarantees one value per placeholder
        let mut next = || values.next().unwrap_or_default();

        Ok(Self {
            subscription_id: next(),
            resource_group: next(),
            namespace_name: next(),
            eventhub_name: next(),
            name: next(),
        })
    }
}

impl fmt::Display for ConsumerGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/namespaces/{}/eventhubs/{}/consumergroups/{}",
            self.subscription_id,
            self.resource_group,
            PROVIDER_NAMESPACE,
            self.namespace_name,
            self.eventhub_name,
            self.name
        )
    }
}

impl FromStr for ConsumerGroupId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identifier of an authorization rule scoped to a single Event Hub
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizationRuleId {
    pub subscription_id: String,
    pub resource_group: String,
    pub namespace_name: String,
    pub eventhub_name: String,
    pub name: String,
}

impl AuthorizationRuleId {
    const KIND: &'static str = "EventhubAuthorizationRule";

    const TEMPLATE: &'static [Segment] = &[
        Segment::Literal("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Literal("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Literal("providers"),
        Segment::Literal(PROVIDER_NAMESPACE),
        Segment::Literal("namespaces"),
        Segment::Value("namespaceName"),
        Segment::Literal("eventhubs"),
        Segment::Value("eventhubName"),
        Segment::Literal("authorizationRules"),
        Segment::Value("name"),
    ];

    pub fn new(
        subscription_id: &str,
        resource_group: &str,
        namespace_name: &str,
        eventhub_name: &str,
        name: &str,
    ) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            namespace_name: namespace_name.to_string(),
            eventhub_name: eventhub_name.to_string(),
            name: name.to_string(),
        }
    }

    /// Argument values this ID pins down
    pub fn identity(&self) -> Identity<'_> {
        [
            ("name", self.name.as_str()),
            ("namespace_name", self.namespace_name.as_str()),
            ("eventhub_name", self.eventhub_name.as_str()),
            ("resource_group_name", self.resource_group.as_str()),
        ]
    }

    /// Parse a canonical authorization rule ID
    pub fn parse(input: &str) -> ProviderResult<Self> {
        let mut values = parse_segments(Self::KIND, input, Self::TEMPLATE)?.into_iter();
        let mut next = || values.next().unwrap_or_default();

        Ok(Self {
            subscription_id: next(),
            resource_group: next(),
            namespace_name: next(),
            eventhub_name: next(),
            name: next(),
        })
    }
}

impl fmt::Display for AuthorizationRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/namespaces/{}/eventhubs/{}/authorizationRules/{}",
            self.subscription_id,
            self.resource_group,
            PROVIDER_NAMESPACE,
            self.namespace_name,
            self.eventhub_name,
            self.name
        )
    }
}

impl FromStr for AuthorizationRuleId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
