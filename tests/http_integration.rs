//! Integration tests for the ARM client using wiremock
//!
//! These tests drive the real HTTP stack against mocked endpoints, checking
//! the request shapes sent to the management API and how responses and
//! error statuses are surfaced to the resource operations.

use ehcg::azure::auth::{AzureCredentials, ServicePrincipal};
use ehcg::azure::client::ArmClient;
use ehcg::eventhub::api::{AuthorizationRulesApi, ConsumerGroupsApi};
use ehcg::eventhub::models::{ConsumerGroup, ConsumerGroupProperties};
use ehcg::eventhub::state::ConsumerGroupLookup;
use ehcg::eventhub::{AuthorizationRuleId, ConsumerGroupDataSource, ConsumerGroupId, ConsumerGroupResource};
use ehcg::provider::{self, Operation, Request, ResourceContext};
use ehcg::ProviderError;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";

fn consumer_group_path(name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/rg1/providers/Microsoft.EventHub/namespaces/acctest-ns/eventhubs/eh1/consumergroups/{}",
        SUBSCRIPTION, name
    )
}

fn consumer_group_id(name: &str) -> ConsumerGroupId {
    ConsumerGroupId::new(SUBSCRIPTION, "rg1", "acctest-ns", "eh1", name)
}

fn client(server: &MockServer) -> ArmClient {
    ArmClient::new(AzureCredentials::from_token("test-token"), &server.uri())
        .expect("client should build")
}

fn not_found_body() -> serde_json::Value {
    json!({
        "error": {
            "code": "ResourceNotFound",
            "message": "The requested resource does not exist."
        }
    })
}

/// Raw request/response behaviour of the client
mod arm_client_tests {
    use super::*;

    /// Test GET sends the bearer token and API version and decodes the body
    #[tokio::test]
    async fn test_get_consumer_group_decodes_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .and(query_param("api-version", "2017-04-01"))
            .and(bearer_token("test-token"))
            .and(header_exists("x-ms-client-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": consumer_group_path("cg1"),
                "name": "cg1",
                "type": "Microsoft.EventHub/Namespaces/EventHubs/ConsumerGroups",
                "properties": {
                    "createdAt": "2020-01-01T00:00:00Z",
                    "updatedAt": "2020-01-02T00:00:00Z",
                    "userMetadata": "meta"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let group = ConsumerGroupsApi::get(&client(&server), &consumer_group_id("cg1"))
            .await
            .expect("GET should succeed");

        assert_eq!(group.name.as_deref(), Some("cg1"));
        let properties = group.properties.unwrap();
        assert_eq!(properties.user_metadata.as_deref(), Some("meta"));
        assert_eq!(properties.created_at.as_deref(), Some("2020-01-01T00:00:00Z"));
    }

    /// Test 404 is reported as not found with the ARM error code
    #[tokio::test]
    async fn test_404_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("missing")))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .mount(&server)
            .await;

        let err = ConsumerGroupsApi::get(&client(&server), &consumer_group_id("missing"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.code.as_deref(), Some("ResourceNotFound"));
    }

    /// Test error statuses other than 404 keep their status and message
    #[tokio::test]
    async fn test_error_statuses_are_not_not_found() {
        for (status, code) in [(409, "Conflict"), (429, "TooManyRequests"), (500, "InternalServerError")] {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path(consumer_group_path("cg1")))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "error": { "code": code, "message": "request failed" }
                })))
                .mount(&server)
                .await;

            let err = ConsumerGroupsApi::get(&client(&server), &consumer_group_id("cg1"))
                .await
                .unwrap_err();

            assert_eq!(err.status, Some(status));
            assert_eq!(err.code.as_deref(), Some(code));
            assert_eq!(err.message, "request failed");
            assert!(!err.is_not_found());
        }
    }

    /// Test PUT sends only the writable fields in the ARM envelope
    #[tokio::test]
    async fn test_create_or_update_body_shape() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(consumer_group_path("cg1")))
            .and(query_param("api-version", "2017-04-01"))
            .and(body_json(json!({
                "name": "cg1",
                "properties": { "userMetadata": "meta" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": consumer_group_path("cg1"),
                "name": "cg1",
                "properties": { "userMetadata": "meta" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let parameters = ConsumerGroup {
            id: None,
            name: Some("cg1".to_string()),
            properties: Some(ConsumerGroupProperties {
                user_metadata: Some("meta".to_string()),
                ..Default::default()
            }),
        };

        let group =
            ConsumerGroupsApi::create_or_update(&client(&server), &consumer_group_id("cg1"), &parameters)
                .await
                .expect("PUT should succeed");
        assert_eq!(group.id.as_deref(), Some(consumer_group_path("cg1").as_str()));
    }

    /// Test listKeys is a POST on the rule's action path
    #[tokio::test]
    async fn test_list_keys_posts_to_action() {
        let server = MockServer::start().await;
        let rule = AuthorizationRuleId::new(SUBSCRIPTION, "rg1", "acctest-ns", "eh1", "rule1");

        Mock::given(method("POST"))
            .and(path(format!("{}/listKeys", rule)))
            .and(query_param("api-version", "2017-04-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "primaryConnectionString": "Endpoint=sb://acctest-ns.servicebus.windows.net/;SharedAccessKeyName=rule1;SharedAccessKey=k1;EntityPath=eh1",
                "secondaryConnectionString": "Endpoint=sb://acctest-ns.servicebus.windows.net/;SharedAccessKeyName=rule1;SharedAccessKey=k2;EntityPath=eh1",
                "primaryKey": "k1",
                "secondaryKey": "k2",
                "keyName": "rule1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let keys = client(&server).list_keys(&rule).await.expect("listKeys should succeed");

        assert_eq!(keys.primary_key.as_deref(), Some("k1"));
        assert_eq!(keys.secondary_key.as_deref(), Some("k2"));
        assert_eq!(keys.key_name.as_deref(), Some("rule1"));
    }

    /// Test a rejected service principal token is refreshed once and retried
    #[tokio::test]
    async fn test_401_refreshes_token_and_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "stale-token"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "fresh-token"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .and(bearer_token("stale-token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "code": "ExpiredAuthenticationToken", "message": "expired" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .and(bearer_token("fresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "cg1" })))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = AzureCredentials::from_service_principal(ServicePrincipal {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "secret".to_string(),
            authority: server.uri(),
        })
        .unwrap();
        let arm = ArmClient::new(credentials, &server.uri()).unwrap();

        let group = ConsumerGroupsApi::get(&arm, &consumer_group_id("cg1"))
            .await
            .expect("retry with a fresh token should succeed");
        assert_eq!(group.name.as_deref(), Some("cg1"));
    }

    /// Test a static token is not retried on 401
    #[tokio::test]
    async fn test_401_with_static_token_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = ConsumerGroupsApi::get(&client(&server), &consumer_group_id("cg1"))
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(401));
    }

    /// Test DELETE with an empty 204 body succeeds
    #[tokio::test]
    async fn test_delete_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        ConsumerGroupsApi::delete(&client(&server), &consumer_group_id("cg1"))
            .await
            .expect("DELETE should succeed");
    }
}

/// Resource operations end to end over HTTP
mod resource_tests {
    use super::*;

    /// Test create checks for an existing group, writes it and reads it back
    #[tokio::test]
    async fn test_create_through_dispatch() {
        let server = MockServer::start().await;

        // First GET: presence check before create
        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        // Second GET: read back after create
        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": consumer_group_path("cg1"),
                "name": "cg1",
                "properties": { "userMetadata": "meta" }
            })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path(consumer_group_path("cg1")))
            .and(body_json(json!({
                "name": "cg1",
                "properties": { "userMetadata": "meta" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": consumer_group_path("cg1"),
                "name": "cg1",
                "properties": { "userMetadata": "meta" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider::execute(
            &client(&server),
            SUBSCRIPTION,
            Request {
                resource_type: "azurerm_eventhub_consumer_group",
                operation: Operation::Create,
                id: None,
                config: json!({
                    "name": "cg1",
                    "namespace_name": "acctest-ns",
                    "eventhub_name": "eh1",
                    "resource_group_name": "rg1",
                    "user_metadata": "meta"
                }),
            },
        )
        .await
        .expect("create should succeed");

        assert_eq!(result["id"], consumer_group_path("cg1"));
        assert_eq!(result["name"], "cg1");
        assert_eq!(result["user_metadata"], "meta");
    }

    /// Test an existing group blocks create without any PUT
    #[tokio::test]
    async fn test_create_existing_requires_import() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "cg1" })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let arm = client(&server);
        let ctx = ResourceContext::new(&arm, SUBSCRIPTION);
        let object = serde_json::from_value(json!({
            "name": "cg1",
            "namespace_name": "acctest-ns",
            "eventhub_name": "eh1",
            "resource_group_name": "rg1"
        }))
        .unwrap();

        let err = ConsumerGroupResource::create(&ctx, &object).await.unwrap_err();
        assert!(matches!(err, ProviderError::RequiresImport { .. }));
    }

    /// Test read of a vanished group reports it gone, the lookup fails
    #[tokio::test]
    async fn test_missing_group_read_vs_lookup() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .mount(&server)
            .await;

        let arm = client(&server);
        let ctx = ResourceContext::new(&arm, SUBSCRIPTION);

        let outcome = ConsumerGroupResource::read(&ctx, &consumer_group_path("cg1"))
            .await
            .expect("read should not fail on 404");
        assert!(outcome.is_gone());

        let lookup = ConsumerGroupLookup {
            name: "cg1".to_string(),
            namespace_name: "acctest-ns".to_string(),
            eventhub_name: "eh1".to_string(),
            resource_group_name: "rg1".to_string(),
        };
        let err = ConsumerGroupDataSource::read(&ctx, &lookup).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(ref id) if id == &consumer_group_path("cg1")));
    }

    /// Test the built-in default group can be looked up
    #[tokio::test]
    async fn test_lookup_default_group() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("$Default")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": consumer_group_path("$Default"),
                "name": "$Default",
                "properties": {}
            })))
            .mount(&server)
            .await;

        let result = provider::execute(
            &client(&server),
            SUBSCRIPTION,
            Request {
                resource_type: "azurerm_eventhub_consumer_group",
                operation: Operation::Lookup,
                id: None,
                config: json!({
                    "name": "$Default",
                    "namespace_name": "acctest-ns",
                    "eventhub_name": "eh1",
                    "resource_group_name": "rg1"
                }),
            },
        )
        .await
        .expect("lookup should succeed");

        assert_eq!(result["name"], "$Default");
        assert_eq!(result["user_metadata"], "");
    }

    /// Test delete treats 404 as already deleted
    #[tokio::test]
    async fn test_delete_missing_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .expect(1)
            .mount(&server)
            .await;

        let arm = client(&server);
        let ctx = ResourceContext::new(&arm, SUBSCRIPTION);

        ConsumerGroupResource::delete(&ctx, &consumer_group_path("cg1"))
            .await
            .expect("delete of a missing group should succeed");
    }

    /// Test throttling surfaces as a remote failure naming the resource
    #[tokio::test]
    async fn test_throttled_read_is_remote_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(consumer_group_path("cg1")))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "code": "TooManyRequests", "message": "slow down" }
            })))
            .mount(&server)
            .await;

        let arm = client(&server);
        let ctx = ResourceContext::new(&arm, SUBSCRIPTION);

        let err = ConsumerGroupResource::read(&ctx, &consumer_group_path("cg1"))
            .await
            .unwrap_err();

        match err {
            ProviderError::RemoteCallFailure { action, source } => {
                assert_eq!(action, format!("retrieving {}", consumer_group_path("cg1")));
                assert_eq!(source.status, Some(429));
            },
            other => panic!("expected RemoteCallFailure, got {:?}", other),
        }
    }
}
