//! `azurerm_eventhub_consumer_group` resource

use super::api::ConsumerGroupsApi;
use super::id::ConsumerGroupId;
use super::mapper::{expand_consumer_group, flatten_consumer_group};
use super::state::ConsumerGroupObject;
use super::validate;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::context::{with_timeout, ReadOutcome, ResourceContext};

pub struct ConsumerGroupResource;

impl ConsumerGroupResource {
    pub const RESOURCE_TYPE: &'static str = "azurerm_eventhub_consumer_group";

    /// Check every argument against its field rule
    pub fn validate(object: &ConsumerGroupObject) -> ProviderResult<()> {
        validate::field("name", &object.name, validate::consumer_group_name)?;
        validate::field("namespace_name", &object.namespace_name, validate::namespace_name)?;
        validate::field("eventhub_name", &object.eventhub_name, validate::eventhub_name)?;
        validate::field(
            "resource_group_name",
            &object.resource_group_name,
            validate::resource_group_name,
        )?;
        if !object.user_metadata.is_empty() {
            validate::field("user_metadata", &object.user_metadata, validate::user_metadata)?;
        }
        Ok(())
    }

    /// Create the consumer group and return its ID
    ///
    /// Fails with [`ProviderError::RequiresImport`] when the group already
    /// exists; nothing is written in that case.
    pub async fn create<C>(
        ctx: &ResourceContext<'_, C>,
        object: &ConsumerGroupObject,
    ) -> ProviderResult<ConsumerGroupId>
    where
        C: ConsumerGroupsApi + ?Sized,
    {
        Self::validate(object)?;

        with_timeout("creating Consumer Group", ctx.timeouts.create, async {
            tracing::info!("creating Consumer Group {:?}..", object.name);

            let id = ConsumerGroupId::new(
                ctx.subscription_id,
                &object.resource_group_name,
                &object.namespace_name,
                &object.eventhub_name,
                &object.name,
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

            let parameters = expand_consumer_group(&object.name, object);
            ctx.client
                .create_or_update(&id, &parameters)
                .await
                .map_err(|e| ProviderError::remote(format!("creating {}", id), e))?;

            Ok(id)
        })
        .await
    }

    pub async fn read<C>(
        ctx: &ResourceContext<'_, C>,
        id: &str,
    ) -> ProviderResult<ReadOutcome<ConsumerGroupObject>>
    where
        C: ConsumerGroupsApi + ?Sized,
    {
        let id = ConsumerGroupId::parse(id)?;

        with_timeout("reading Consumer Group", ctx.timeouts.read, async {
            tracing::info!("retrieving Consumer Group {:?}..", id.name);

            match ctx.client.get(&id).await {
                Ok(model) => Ok(ReadOutcome::Present(flatten_consumer_group(&id, Some(&model)))),
                Err(e) if e.is_not_found() => {
                    tracing::info!("{} was not found - removing from state", id);
                    Ok(ReadOutcome::Gone)
                },
                Err(e) => Err(ProviderError::remote(format!("retrieving {}", id), e)),
            }
        })
        .await
    }

    /// Replace the consumer group with the full desired payload
    ///
    /// The name sent is always the one from `id`; identifying fields in
    /// `object` that disagree with `id` are rejected since they force a new
    /// resource.
    pub async fn update<C>(
        ctx: &ResourceContext<'_, C>,
        id: &str,
        object: &ConsumerGroupObject,
    ) -> ProviderResult<()>
    where
        C: ConsumerGroupsApi + ?Sized,
    {
        let id = ConsumerGroupId::parse(id)?;
        Self::validate(object)?;
        validate::ensure_same_identity(&id.identity(), &object.identity())?;

        with_timeout("updating Consumer Group", ctx.timeouts.update, async {
            tracing::info!("updating Consumer Group {:?}..", id.name);

            let parameters = expand_consumer_group(&id.name, object);
            ctx.client
                .create_or_update(&id, &parameters)
                .await
                .map(|_| ())
                .map_err(|e| ProviderError::remote(format!("updating {}", id), e))
        })
        .await
    }

    /// Delete the consumer group; an already absent group is not an error
    pub async fn delete<C>(ctx: &ResourceContext<'_, C>, id: &str) -> ProviderResult<()>
    where
        C: ConsumerGroupsApi + ?Sized,
    {
        let id = ConsumerGroupId::parse(id)?;

        with_timeout("deleting Consumer Group", ctx.timeouts.delete, async {
            tracing::info!("deleting Consumer Group {:?}..", id.name);

            match ctx.client.delete(&id).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_not_found() => Ok(()),
                Err(e) => Err(ProviderError::remote(format!("deleting {}", id), e)),
            }
        })
        .await
    }
}
