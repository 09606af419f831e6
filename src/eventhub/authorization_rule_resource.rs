//! `azurerm_eventhub_authorization_rule` resource

use super::api::AuthorizationRulesApi;
use super::id::AuthorizationRuleId;
use super::mapper::{expand_authorization_rule, flatten_authorization_rule, Rights};
use super::state::{AuthorizationRuleConfig, AuthorizationRuleState};
use super::validate;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::context::{with_timeout, ReadOutcome, ResourceContext};

pub struct AuthorizationRuleResource;

impl AuthorizationRuleResource {
    pub const RESOURCE_TYPE: &'static str = "azurerm_eventhub_authorization_rule";

    pub fn rights(config: &AuthorizationRuleConfig) -> Rights {
        Rights {
            listen: config.listen,
            send: config.send,
            manage: config.manage,
        }
    }

    /// Field rules plus the rights invariant; runs before any remote call
    pub fn validate(config: &AuthorizationRuleConfig) -> ProviderResult<()> {
        validate::field("name", &config.name, validate::authorization_rule_name)?;
        validate::field("namespace_name", &config.namespace_name, validate::namespace_name)?;
        validate::field("eventhub_name", &config.eventhub_name, validate::eventhub_name)?;
        validate::field(
            "resource_group_name",
            &config.resource_group_name,
            validate::resource_group_name,
        )?;
        validate::validate_rights(&Self::rights(config))
    }

    pub async fn create<C>(
        ctx: &ResourceContext<'_, C>,
        config: &AuthorizationRuleConfig,
    ) -> ProviderResult<AuthorizationRuleId>
    where
        C: AuthorizationRulesApi + ?Sized,
    {
        Self::validate(config)?;

        with_timeout("creating Authorization Rule", ctx.timeouts.create, async {
            tracing::info!("creating Authorization Rule {:?}..", config.name);

            let id = AuthorizationRuleId::new(
                ctx.subscription_id,
                &config.resource_group_name,
                &config.namespace_name,
                &config.eventhub_name,
                &config.name,
            );

            match ctx.client.get(&id).await {
                Ok(_) => {
                    return Err(ProviderError::RequiresImport {
                        resource_type: Self::RESOURCE_TYPE,
                        id: id.to_string(),
                    });
                },
                Err(e) if e.is_not_found() => {},
                Err(e) => {
                    return Err(ProviderError::remote(
                        format!("checking for the presence of an existing {}", id),
                        e,
                    ));
                },
            }

            let parameters = expand_authorization_rule(&Self::rights(config));
            ctx.client
                .create_or_update(&id, &parameters)
                .await
                .map_err(|e| ProviderError::remote(format!("creating {}", id), e))?;

            Ok(id)
        })
        .await
    }

    /// Read the rule and its keys
    pub async fn read<C>(
        ctx: &ResourceContext<'_, C>,
        id: &str,
    ) -> ProviderResult<ReadOutcome<AuthorizationRuleState>>
    where
        C: AuthorizationRulesApi + ?Sized,
    {
        let id = AuthorizationRuleId::parse(id)?;

        with_timeout("reading Authorization Rule", ctx.timeouts.read, async {
            tracing::info!("retrieving Authorization Rule {:?}..", id.name);

            let model = match ctx.client.get(&id).await {
                Ok(model) => model,
                Err(e) if e.is_not_found() => {
                    tracing::info!("{} was not found - removing from state", id);
                    return Ok(ReadOutcome::Gone);
                },
                Err(e) => return Err(ProviderError::remote(format!("retrieving {}", id), e)),
            };

            let keys = ctx
                .client
                .list_keys(&id)
                .await
                .map_err(|e| ProviderError::remote(format!("listing keys for {}", id), e))?;

            let mut state = AuthorizationRuleState {
                name: id.name.clone(),
                namespace_name: id.namespace_name.clone(),
                eventhub_name: id.eventhub_name.clone(),
                resource_group_name: id.resource_group.clone(),
                ..Default::default()
            };
            flatten_authorization_rule(&mut state, Some(&model), Some(&keys));

            Ok(ReadOutcome::Present(state))
        })
        .await
    }

    pub async fn update<C>(
        ctx: &ResourceContext<'_, C>,
        id: &str,
        config: &AuthorizationRuleConfig,
    ) -> ProviderResult<()>
    where
        C: AuthorizationRulesApi + ?Sized,
    {
        let id = AuthorizationRuleId::parse(id)?;
        Self::validate(config)?;
        validate::ensure_same_identity(&id.identity(), &config.identity())?;

        with_timeout("updating Authorization Rule", ctx.timeouts.update, async {
            tracing::info!("updating Authorization Rule {:?}..", id.name);

            let parameters = expand_authorization_rule(&Self::rights(config));
            ctx.client
                .create_or_update(&id, &parameters)
                .await
                .map(|_| ())
                .map_err(|e| ProviderError::remote(format!("updating {}", id), e))
        })
        .await
    }

    pub async fn delete<C>(ctx: &ResourceContext<'_, C>, id: &str) -> ProviderResult<()>
    where
        C: AuthorizationRulesApi + ?Sized,
    {
        let id = AuthorizationRuleId::parse(id)?;

        with_timeout("deleting Authorization Rule", ctx.timeouts.delete, async {
            tracing::info!("deleting Authorization Rule {:?}..", id.name);

            match ctx.client.delete(&id).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_not_found() => Ok(()),
                Err(e) => Err(ProviderError::remote(format!("deleting {}", id), e)),
            }
        })
        .await
    }
}
