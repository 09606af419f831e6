//! Operation Dispatch
//!
//! Maps a resource type name and an operation onto the typed handlers.
//! Untyped configuration is checked against the schema and decoded exactly
//! once here.

use super::context::{ReadOutcome, ResourceContext};
use super::registry::{self, IdKind, SchemaDef};
use crate::error::{ProviderError, ProviderResult};
use crate::eventhub::api::{AuthorizationRulesApi, ConsumerGroupsApi};
use crate::eventhub::state::{AuthorizationRuleConfig, ConsumerGroupLookup, ConsumerGroupObject};
use crate::eventhub::{
    AuthorizationRuleId, AuthorizationRuleResource, ConsumerGroupDataSource, ConsumerGroupId,
    ConsumerGroupResource,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// Operations a caller can run against a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    /// Data source read
    Lookup,
    /// Schema and cross-field checks only, no remote call
    Validate,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Lookup => "lookup",
            Operation::Validate => "validate",
        }
    }
}

/// A single operation request
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub resource_type: &'a str,
    pub operation: Operation,
    /// Durable ID, required by read/update/delete
    pub id: Option<&'a str>,
    /// Declared configuration, required by create/update/lookup/validate
    pub config: Value,
}

/// Run `request` and return the resulting state as JSON
///
/// Create and update read the resource back so the returned state reflects
/// the remote. A read of a vanished resource returns `{"id": .., "gone": true}`.
pub async fn execute<C>(client: &C, subscription_id: &str, request: Request<'_>) -> ProviderResult<Value>
where
    C: ConsumerGroupsApi + AuthorizationRulesApi,
{
    tracing::info!(
        "execute: resource_type={}, operation={}",
        request.resource_type,
        request.operation.as_str()
    );

    if request.operation == Operation::Validate {
        return validate(request.resource_type, request.config);
    }

    if request.operation == Operation::Lookup {
        let schema = registry::get_data_source(request.resource_type).ok_or_else(|| {
            ProviderError::validation(format!("Unknown data source: {}", request.resource_type))
        })?;
        if schema.id_kind != IdKind::ConsumerGroup {
            return Err(ProviderError::validation(format!(
                "Unsupported data source: {}",
                request.resource_type
            )));
        }
        tracing::debug!("looking up {}", schema.display_name);

        let config = check_config(request.resource_type, schema, request.config)?;
        let ctx = ResourceContext::new(client, subscription_id).with_timeouts(schema.timeouts());
        let lookup: ConsumerGroupLookup = decode(request.resource_type, config)?;
        let state = encode(&ConsumerGroupDataSource::read(&ctx, &lookup).await?)?;
        tracing::debug!("{} state: {}", schema.display_name, schema.redact(&state));
        return Ok(state);
    }

    let schema = resource_schema(request.resource_type)?;
    tracing::debug!("{} {}", request.operation.as_str(), schema.display_name);
    let ctx = ResourceContext::new(client, subscription_id).with_timeouts(schema.timeouts());

    let result = match schema.id_kind {
        IdKind::ConsumerGroup => execute_consumer_group(&ctx, schema, request).await?,
        IdKind::AuthorizationRule => execute_authorization_rule(&ctx, schema, request).await?,
    };
    tracing::debug!("{} state: {}", schema.display_name, schema.redact(&result));

    Ok(result)
}

async fn execute_consumer_group<C>(
    ctx: &ResourceContext<'_, C>,
    schema: &SchemaDef,
    request: Request<'_>,
) -> ProviderResult<Value>
where
    C: ConsumerGroupsApi + ?Sized,
{
    let resource_type = request.resource_type;

    match request.operation {
        Operation::Create => {
            let config = check_config(resource_type, schema, request.config)?;
            let object: ConsumerGroupObject = decode(resource_type, config)?;
            let id = ConsumerGroupResource::create(ctx, &object).await?.to_string();
            let outcome = ConsumerGroupResource::read(ctx, &id).await?;
            read_result(&id, outcome)
        },
        Operation::Read => {
            let id = require_id(request.id)?;
            let outcome = ConsumerGroupResource::read(ctx, id).await?;
            read_result(id, outcome)
        },
        Operation::Update => {
            let id = require_id(request.id)?;
            let config = check_config(resource_type, schema, request.config)?;
            let object: ConsumerGroupObject = decode(resource_type, config)?;
            ConsumerGroupResource::update(ctx, id, &object).await?;
            let outcome = ConsumerGroupResource::read(ctx, id).await?;
            read_result(id, outcome)
        },
        Operation::Delete => {
            let id = require_id(request.id)?;
            ConsumerGroupResource::delete(ctx, id).await?;
            Ok(Value::Null)
        },
        Operation::Validate | Operation::Lookup => {
            unreachable!("handled before resource routing")
        },
    }
}

async fn execute_authorization_rule<C>(
    ctx: &ResourceContext<'_, C>,
    schema: &SchemaDef,
    request: Request<'_>,
) -> ProviderResult<Value>
where
    C: AuthorizationRulesApi + ?Sized,
{
    let resource_type = request.resource_type;

    match request.operation {
        Operation::Create => {
            let config = check_config(resource_type, schema, request.config)?;
            let config: AuthorizationRuleConfig = decode(resource_type, config)?;
            let id = AuthorizationRuleResource::create(ctx, &config).await?.to_string();
            let outcome = AuthorizationRuleResource::read(ctx, &id).await?;
            read_result(&id, outcome)
        },
        Operation::Read => {
            let id = require_id(request.id)?;
            let outcome = AuthorizationRuleResource::read(ctx, id).await?;
            read_result(id, outcome)
        },
        Operation::Update => {
            let id = require_id(request.id)?;
            let config = check_config(resource_type, schema, request.config)?;
            let config: AuthorizationRuleConfig = decode(resource_type, config)?;
            AuthorizationRuleResource::update(ctx, id, &config).await?;
            let outcome = AuthorizationRuleResource::read(ctx, id).await?;
            read_result(id, outcome)
        },
        Operation::Delete => {
            let id = require_id(request.id)?;
            AuthorizationRuleResource::delete(ctx, id).await?;
            Ok(Value::Null)
        },
        Operation::Validate | Operation::Lookup => {
            unreachable!("handled before resource routing")
        },
    }
}

/// Run the schema and cross-field checks without touching the remote
pub fn validate(resource_type: &str, config: Value) -> ProviderResult<Value> {
    let schema = resource_schema(resource_type)?;
    let config = check_config(resource_type, schema, config)?;

    match schema.id_kind {
        IdKind::ConsumerGroup => {
            let object: ConsumerGroupObject = decode(resource_type, config)?;
            ConsumerGroupResource::validate(&object)?;
        },
        IdKind::AuthorizationRule => {
            let config: AuthorizationRuleConfig = decode(resource_type, config)?;
            AuthorizationRuleResource::validate(&config)?;
        },
    }

    Ok(json!({ "valid": true }))
}

/// Subscription embedded in the durable ID of a `resource_type` resource
pub fn subscription_from_id(resource_type: &str, id: &str) -> ProviderResult<String> {
    let schema = resource_schema(resource_type)?;

    let subscription_id = match schema.id_kind {
        IdKind::ConsumerGroup => ConsumerGroupId::parse(id)?.subscription_id,
        IdKind::AuthorizationRule => AuthorizationRuleId::parse(id)?.subscription_id,
    };
    Ok(subscription_id)
}

fn resource_schema(resource_type: &str) -> ProviderResult<&'static SchemaDef> {
    registry::get_resource(resource_type)
        .ok_or_else(|| ProviderError::validation(format!("Unknown resource: {}", resource_type)))
}

fn require_id(id: Option<&str>) -> ProviderResult<&str> {
    id.filter(|id| !id.is_empty())
        .ok_or_else(|| ProviderError::validation("an ID is required for this operation"))
}

/// Check `config` against the schema and return it normalized for decoding
fn check_config(resource_type: &str, schema: &SchemaDef, config: Value) -> ProviderResult<Value> {
    let diagnostics = schema.validate_config(&config);
    if diagnostics.is_empty() {
        return Ok(schema.normalize_config(config));
    }

    for diagnostic in &diagnostics {
        tracing::debug!("{}: {}", resource_type, diagnostic);
    }
    Err(ProviderError::validation(diagnostics.join("; ")))
}

fn decode<T: DeserializeOwned>(resource_type: &str, config: Value) -> ProviderResult<T> {
    serde_json::from_value(config).map_err(|source| ProviderError::Decode {
        resource_type: resource_type.to_string(),
        source,
    })
}

fn encode<T: Serialize>(state: &T) -> ProviderResult<Value> {
    serde_json::to_value(state).map_err(|source| ProviderError::Decode {
        resource_type: std::any::type_name::<T>().to_string(),
        source,
    })
}

fn read_result<T: Serialize>(id: &str, outcome: ReadOutcome<T>) -> ProviderResult<Value> {
    match outcome {
        ReadOutcome::Present(state) => {
            let mut value = encode(&state)?;
            if let Value::Object(map) = &mut value {
                map.insert("id".to_string(), Value::String(id.to_string()));
            }
            Ok(value)
        },
        ReadOutcome::Gone => Ok(json!({ "id": id, "gone": true })),
    }
}
