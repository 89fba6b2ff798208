//! reqwest client against a wiremock server: paths, query strings, bodies
//! and error mapping

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{
    body_json, body_partial_json, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wachat::egui_app::api::{HttpApi, MessagingApi, UserQuery};
use wachat::egui_app::{ClientError, Config};
use wachat::shared::messaging::{DeliveryState, GroupPatch, MessageId, NewMessage, UserId};
use wachat::shared::AppConfig;

use crate::{assert_err, assert_ok};

fn api_for(server: &MockServer) -> HttpApi {
    let config = Config::from_builder(AppConfig::builder().server_url(server.uri()));
    HttpApi::new(assert_ok!(config))
}

#[tokio::test]
async fn test_list_messages_filters_by_direction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("senderId", "42"))
        .and(query_param("recipientId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 3,
                "senderId": 42,
                "recipientId": "7",
                "body": "salut",
                "createdAt": "2024-05-01T10:00:00Z",
                "deliveryState": "delivered"
            },
            {
                "id": "a1b2",
                "senderId": "42",
                "recipientId": "7",
                "body": "sans état",
                "createdAt": "2024-05-01T10:01:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let messages = assert_ok!(api.list_messages(&"42".into(), &"7".into()).await);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, MessageId::from("3"));
    assert_eq!(messages[0].sender_id, UserId::from("42"));
    assert_eq!(messages[0].delivery_state, DeliveryState::Delivered);
    assert_eq!(messages[1].delivery_state, DeliveryState::Sending);
}

#[tokio::test]
async fn test_inbox_uses_recipient_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("recipientId", "7"))
        .and(query_param_is_missing("senderId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let inbox = assert_ok!(api_for(&server).list_inbox(&"7".into()).await);
    assert!(inbox.is_empty());
}

#[tokio::test]
async fn test_message_filters_follow_configured_param_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("fromUserId", "42"))
        .and(query_param("receiverId", "7"))
        .and(query_param_is_missing("senderId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 9,
                "fromUserId": 42,
                "receiverId": 7,
                "content": "ancien format",
                "timestamp": "2024-05-01T10:00:00Z",
                "status": "read"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("receiverId", "7"))
        .and(query_param_is_missing("fromUserId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = assert_ok!(Config::from_builder(
        AppConfig::builder()
            .server_url(server.uri())
            .message_params("fromUserId", "receiverId")
    ));
    let api = HttpApi::new(config);

    let messages = assert_ok!(api.list_messages(&"42".into(), &"7".into()).await);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, "ancien format");
    assert_eq!(messages[0].delivery_state, DeliveryState::Read);
    assert!(assert_ok!(api.list_inbox(&"7".into()).await).is_empty());
}

#[tokio::test]
async fn test_create_message_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(json!({
            "senderId": "7",
            "recipientId": "42",
            "body": "hello",
            "deliveryState": "sending"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "m100",
            "senderId": "7",
            "recipientId": "42",
            "body": "hello",
            "createdAt": "2024-05-01T10:00:00Z",
            "deliveryState": "sending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = NewMessage::new("7".into(), "42".into(), "hello");
    let created = assert_ok!(api_for(&server).create_message(&draft).await);
    assert_eq!(created.id, MessageId::from("m100"));
}

#[tokio::test]
async fn test_patch_requests() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/messages/m1"))
        .and(body_json(json!({ "deliveryState": "read" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "senderId": "42",
            "recipientId": "7",
            "body": "salut",
            "createdAt": "2024-05-01T10:00:00Z",
            "deliveryState": "read"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/contacts/42"))
        .and(body_json(json!({ "blocked": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/conversations/42"))
        .and(body_json(json!({ "archived": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/groups/g1"))
        .and(body_json(json!({ "name": "Cousins" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g1",
            "name": "Cousins",
            "members": ["7", "8"],
            "adminId": "7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let read = assert_ok!(api.update_delivery_state(&"m1".into(), DeliveryState::Read).await);
    assert_eq!(read.delivery_state, DeliveryState::Read);
    assert_ok!(api.block_contact(&"42".into()).await);
    assert_ok!(api.archive_conversation(&"42".into()).await);

    let patch = GroupPatch {
        name: Some("Cousins".to_string()),
        members: None,
    };
    let group = assert_ok!(api.update_group(&"g1".into(), &patch).await);
    assert_eq!(group.name, "Cousins");
}

#[tokio::test]
async fn test_deletes() {
    let server = MockServer::start().await;
    for route in ["/conversations/42", "/contacts/42"] {
        Mock::given(method("DELETE"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = api_for(&server);
    assert_ok!(api.delete_conversation(&"42".into()).await);
    assert_ok!(api.delete_contact(&"42".into()).await);
}

#[tokio::test]
async fn test_find_users_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("username", "awa"))
        .and(query_param_is_missing("phone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "username": "awa", "phone": "771234567" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = assert_ok!(api_for(&server).find_users(&UserQuery::username("awa")).await);
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, UserId::from("7"));
    assert!(users[0].is_active);
}

#[tokio::test]
async fn test_non_success_status_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = api_for(&server).list_groups().await;
    assert_eq!(result, Err(ClientError::server(500, "boom")));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert_err!(
        api_for(&server).list_contacts(&"7".into()).await,
        ClientError::Decode { .. }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // nothing listens on port 1
    let config = assert_ok!(Config::from_builder(
        AppConfig::builder().server_url("http://127.0.0.1:1")
    ));
    let api = HttpApi::new(config);

    let result = api.list_groups().await;
    assert_matches!(&result, Err(ClientError::Network { .. }));
    assert!(result.unwrap_err().is_transport());
}
