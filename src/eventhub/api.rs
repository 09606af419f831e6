//! Management API operations for Event Hub child resources
//!
//! The handlers only talk to these traits; [`ArmClient`] implements them over
//! HTTP and tests substitute an in-memory fake.

use super::id::{AuthorizationRuleId, ConsumerGroupId};
use super::models::{AccessKeys, AuthorizationRule, ConsumerGroup, API_VERSION};
use crate::azure::client::ArmClient;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[async_trait]
pub trait ConsumerGroupsApi: Send + Sync {
    async fn get(&self, id: &ConsumerGroupId) -> Result<ConsumerGroup, ApiError>;

    async fn create_or_update(
        &self,
        id: &ConsumerGroupId,
        parameters: &ConsumerGroup,
    ) -> Result<ConsumerGroup, ApiError>;

    async fn delete(&self, id: &ConsumerGroupId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthorizationRulesApi: Send + Sync {
    async fn get(&self, id: &AuthorizationRuleId) -> Result<AuthorizationRule, ApiError>;

    async fn create_or_update(
        &self,
        id: &AuthorizationRuleId,
        parameters: &AuthorizationRule,
    ) -> Result<AuthorizationRule, ApiError>;

    async fn delete(&self, id: &AuthorizationRuleId) -> Result<(), ApiError>;

    async fn list_keys(&self, id: &AuthorizationRuleId) -> Result<AccessKeys, ApiError>;
}

fn decode<T: DeserializeOwned + Default>(value: Value) -> Result<T, ApiError> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::transport(format!("Failed to decode response: {}", e)))
}

fn encode<T: serde::Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload)
        .map_err(|e| ApiError::transport(format!("Failed to encode request: {}", e)))
}

#[async_trait]
impl ConsumerGroupsApi for ArmClient {
    async fn get(&self, id: &ConsumerGroupId) -> Result<ConsumerGroup, ApiError> {
        let url = self.resource_url(&id.to_string(), API_VERSION);
        decode(ArmClient::get(self, &url).await?)
    }

    async fn create_or_update(
        &self,
        id: &ConsumerGroupId,
        parameters: &ConsumerGroup,
    ) -> Result<ConsumerGroup, ApiError> {
        let url = self.resource_url(&id.to_string(), API_VERSION);
        let body = encode(parameters)?;
        decode(self.put(&url, &body).await?)
    }

    async fn delete(&self, id: &ConsumerGroupId) -> Result<(), ApiError> {
        let url = self.resource_url(&id.to_string(), API_VERSION);
        ArmClient::delete(self, &url).await.map(|_| ())
    }
}

#[async_trait]
impl AuthorizationRulesApi for ArmClient {
    async fn get(&self, id: &AuthorizationRuleId) -> Result<AuthorizationRule, ApiError> {
        let url = self.resource_url(&id.to_string(), API_VERSION);
        decode(ArmClient::get(self, &url).await?)
    }

    async fn create_or_update(
        &self,
        id: &AuthorizationRuleId,
        parameters: &AuthorizationRule,
    ) -> Result<AuthorizationRule, ApiError> {
        let url = self.resource_url(&id.to_string(), API_VERSION);
        let body = encode(parameters)?;
        decode(self.put(&url, &body).await?)
    }

    async fn delete(&self, id: &AuthorizationRuleId) -> Result<(), ApiError> {
        let url = self.resource_url(&id.to_string(), API_VERSION);
        ArmClient::delete(self, &url).await.map(|_| ())
    }

    async fn list_keys(&self, id: &AuthorizationRuleId) -> Result<AccessKeys, ApiError> {
        let url = self.resource_action_url(&id.to_string(), Some("listKeys"), API_VERSION);
        decode(self.post(&url, None).await?)
    }
}
