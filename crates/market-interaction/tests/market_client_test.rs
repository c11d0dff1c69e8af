use market_core::MarketError;
use market_core::gateway::{
    AuthGateway, FavoriteGateway, ItemGateway, MessageGateway, StatsGateway, TransactionGateway,
};
use market_core::item::{ItemDraft, ItemFilter, ItemStatus};
use market_core::message::NewMessage;
use market_core::stats::CountTarget;
use market_core::transaction::TransactionStatus;
use market_core::user::Credentials;
use market_interaction::MarketClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> MarketClient {
    MarketClient::with_base_url(format!("{}/api", server.uri())).unwrap()
}

fn item_json(id: i64, owner: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Desk lamp",
        "description": "Warm light",
        "price": 25.0,
        "category": 4,
        "categoryName": "Daily goods",
        "status": 0,
        "statusName": "Available",
        "condition": "Like new",
        "imagePath": "",
        "ownerUsername": owner,
        "publishTime": 1717000000
    })
}

#[tokio::test]
async fn login_returns_session_without_identity_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "username": "alice",
                "email": "alice@campus.edu",
                "phone": "13800000000",
                "studentId": "2021001",
                "creditScore": 100
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let session = client.login(&Credentials::new("alice", "pw")).await.unwrap();

    assert_eq!(session.username, "alice");
    assert_eq!(session.credit_score, 100);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn login_rejection_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Wrong username or password"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .login(&Credentials::new("alice", "nope"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MarketError::InvalidCredentials("Wrong username or password".to_string())
    );
}

#[tokio::test]
async fn owned_items_escape_username_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/owner/ann%2Fb%3Fx"))
        .and(header("Authorization", "ann/b?x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [item_json(5, "ann/b?x")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let items = client.list_owned_items("ann/b?x").await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].owner_username, "ann/b?x");
}

#[tokio::test]
async fn owned_items_send_bare_username_as_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/owner/bob"))
        .and(header("Authorization", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [item_json(1, "bob"), item_json(2, "bob")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let items = client.list_owned_items("bob").await.unwrap();

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.is_owned_by("bob")));
    assert!(items[0].image_path.is_none());
}

#[tokio::test]
async fn filtered_list_sends_only_set_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item"))
        .and(query_param("category", "3"))
        .and(query_param("status", "0"))
        .and(query_param("maxPrice", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [item_json(5, "carol")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let filter = ItemFilter {
        category: Some(3),
        status: Some(ItemStatus::Available),
        max_price: Some(50.0),
        ..ItemFilter::default()
    };
    let items = client.list_items(&filter).await.unwrap();
    assert_eq!(items.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("minPrice"));
    assert!(!query.contains("startTime"));
}

#[tokio::test]
async fn search_sends_keyword() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/search"))
        .and(query_param("keyword", "lamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [item_json(1, "bob")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.search_items("lamp").await.unwrap().len(), 1);
}

#[tokio::test]
async fn publish_sends_empty_image_path_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/item"))
        .and(header("Authorization", "bob"))
        .and(body_json(json!({
            "title": "Desk lamp",
            "description": "Warm light",
            "price": 25.0,
            "category": 4,
            "condition": "Like new",
            "imagePath": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let draft = ItemDraft {
        title: "Desk lamp".to_string(),
        description: "Warm light".to_string(),
        price: 25.0,
        category: 4,
        condition: "Like new".to_string(),
        image_path: None,
    };
    client.create_item("bob", &draft).await.unwrap();
}

#[tokio::test]
async fn transaction_status_update_sends_numeric_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/transaction/7"))
        .and(header("Authorization", "bob"))
        .and(body_json(json!({ "status": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .update_transaction_status("bob", 7, TransactionStatus::Confirmed)
        .await
        .unwrap();
}

#[tokio::test]
async fn create_transaction_failure_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transaction"))
        .and(body_json(json!({ "itemId": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Item is not available"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.create_transaction("alice", 3).await.unwrap_err();
    assert_eq!(err, MarketError::api("Item is not available"));
}

#[tokio::test]
async fn favorites_add_and_remove() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/favorite"))
        .and(body_json(json!({ "itemId": 9 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/favorite/9"))
        .and(header("Authorization", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.add_favorite("alice", 9).await.unwrap();
    client.remove_favorite("alice", 9).await.unwrap();
}

#[tokio::test]
async fn message_thread_and_send() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/message/transaction/4"))
        .and(header("Authorization", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "transactionId": 4, "senderUsername": "bob", "receiverUsername": "alice",
                  "content": "Still available?", "sendTime": 1717000000, "isRead": true },
                { "id": 2, "transactionId": 4, "senderUsername": "alice", "receiverUsername": "bob",
                  "content": "Yes", "sendTime": 1717000100, "isRead": false }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/message"))
        .and(body_json(json!({ "transactionId": 4, "content": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let thread = client.list_messages("alice", 4).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].content, "Still available?");

    let message = NewMessage {
        transaction_id: 4,
        content: "hello".to_string(),
    };
    client.send_message("alice", &message).await.unwrap();
}

#[tokio::test]
async fn count_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": 12 })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.count(CountTarget::Items).await.unwrap(), 12);
}

#[tokio::test]
async fn non_json_body_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_item(1).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn error_status_with_envelope_follows_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/item/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "You can only delete your own items"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.delete_item("mallory", 1).await.unwrap_err();
    assert_eq!(err, MarketError::api("You can only delete your own items"));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let client = MarketClient::with_base_url("http://127.0.0.1:1/api").unwrap();
    let err = client.count(CountTarget::Users).await.unwrap_err();
    assert!(err.is_transport());
}
