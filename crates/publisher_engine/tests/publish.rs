use std::time::Duration;

use publisher_engine::{
    ClientSettings, MediumClient, PublishFailure, PublishStatus, Publisher, Submission,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn submission() -> Submission {
    Submission {
        title: "Hello".to_string(),
        content: "# Hello\n\nWorld.".to_string(),
        tags: vec!["rust".to_string(), "blog".to_string()],
        publish_status: PublishStatus::Draft,
        notify_followers: false,
    }
}

fn client(server: &MockServer) -> MediumClient {
    MediumClient::new(
        &server.uri(),
        "secret-token",
        "author-1",
        ClientSettings::default(),
    )
}

#[tokio::test]
async fn publish_returns_the_remote_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/author-1/posts"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(body_partial_json(json!({
            "title": "Hello",
            "contentFormat": "markdown",
            "content": "# Hello\n\nWorld.",
            "tags": ["rust", "blog"],
            "publishStatus": "draft",
            "notifyFollowers": false,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "abc123", "url": "https://medium.com/p/abc123" }
        })))
        .mount(&server)
        .await;

    let id = client(&server).publish(&submission()).await.unwrap();
    assert_eq!(id, "abc123");
}

#[tokio::test]
async fn publish_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/author-1/posts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).publish(&submission()).await.unwrap_err();
    assert_eq!(err.kind, PublishFailure::HttpStatus(401));
}

#[tokio::test]
async fn publish_fails_on_unparseable_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/author-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).publish(&submission()).await.unwrap_err();
    assert_eq!(err.kind, PublishFailure::InvalidResponse);
}

#[tokio::test]
async fn publish_fails_when_the_id_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/author-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let err = client(&server).publish(&submission()).await.unwrap_err();
    assert_eq!(err.kind, PublishFailure::InvalidResponse);
}

#[tokio::test]
async fn publish_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/author-1/posts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "data": { "id": "late" } })),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let slow_client = MediumClient::new(&server.uri(), "secret-token", "author-1", settings);

    let err = slow_client.publish(&submission()).await.unwrap_err();
    assert_eq!(err.kind, PublishFailure::Timeout);
}

#[tokio::test]
async fn user_info_unwraps_the_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "user-42",
                "username": "writer",
                "name": "A Writer",
                "url": "https://medium.com/@writer"
            }
        })))
        .mount(&server)
        .await;

    let user = client(&server).user_info().await.unwrap();
    assert_eq!(user.id, "user-42");
    assert_eq!(user.username, "writer");
    assert_eq!(user.name, "A Writer");
    assert_eq!(user.url, "https://medium.com/@writer");
}

#[tokio::test]
async fn user_info_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).user_info().await.unwrap_err();
    assert_eq!(err.kind, PublishFailure::HttpStatus(401));
}
