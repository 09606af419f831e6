//! `azurerm_eventhub_consumer_group` data source
//!
//! Unlike the resource's read, a missing consumer group is a hard error here:
//! there is no tracked state to drop.

use super::api::ConsumerGroupsApi;
use super::id::ConsumerGroupId;
use super::mapper::flatten_consumer_group;
use super::state::{ConsumerGroupDataSourceState, ConsumerGroupLookup};
use super::validate;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::context::{with_timeout, ResourceContext};

pub struct ConsumerGroupDataSource;

impl ConsumerGroupDataSource {
    pub const DATA_SOURCE_TYPE: &'static str = "azurerm_eventhub_consumer_group";

    pub fn validate(lookup: &ConsumerGroupLookup) -> ProviderResult<()> {
        validate::field("name", &lookup.name, validate::consumer_group_lookup_name)?;
        validate::field("namespace_name", &lookup.namespace_name, validate::namespace_name)?;
        validate::field("eventhub_name", &lookup.eventhub_name, validate::eventhub_name)?;
        validate::field(
            "resource_group_name",
            &lookup.resource_group_name,
            validate::resource_group_name,
        )
    }

    pub async fn read<C>(
        ctx: &ResourceContext<'_, C>,
        lookup: &ConsumerGroupLookup,
    ) -> ProviderResult<ConsumerGroupDataSourceState>
    where
        C: ConsumerGroupsApi + ?Sized,
    {
        Self::validate(lookup)?;

        let id = ConsumerGroupId::new(
            ctx.subscription_id,
            &lookup.resource_group_name,
            &lookup.namespace_name,
            &lookup.eventhub_name,
            &lookup.name,
        );

        with_timeout("reading Consumer Group", ctx.timeouts.read, async {
            tracing::info!("looking up Consumer Group {:?}..", id.name);

            let model = match ctx.client.get(&id).await {
                Ok(model) => model,
                Err(e) if e.is_not_found() => return Err(ProviderError::NotFound(id.to_string())),
                Err(e) => return Err(ProviderError::remote(format!("retrieving {}", id), e)),
            };

            let object = flatten_consumer_group(&id, Some(&model));
            Ok(ConsumerGroupDataSourceState {
                id: id.to_string(),
                name: object.name,
                namespace_name: object.namespace_name,
                eventhub_name: object.eventhub_name,
                resource_group_name: object.resource_group_name,
                user_metadata: object.user_metadata,
            })
        })
        .await
    }
}
