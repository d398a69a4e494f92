//! Integration tests for failure classification. Nothing is retried.

use crate::mock_server::{MockServerFixture, API_KEY};
use std::time::Duration;
use user_api_client::{ApiErrorKind, Error, ListUsersQuery, UserApiClient, UserUpdate};

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/users/1")
        .with_status(401)
        .with_body(r#"{"error": "invalid token"}"#)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client();

    let err = client.get_user("1", true).await.unwrap_err();
    assert!(err.is_authentication());
    assert!(err.is_api_error());
    assert_eq!(err.status(), Some(401));
    match err {
        Error::Api(api) => {
            assert_eq!(api.kind, ApiErrorKind::Authentication);
            assert!(api.message.contains("invalid token"));
            assert_eq!(api.method, "GET");
            assert!(api.url.ends_with("/users/1"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
    // failures are not cached and not retried
    assert_eq!(client.cached_len(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limit_error() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/users/search")
        .match_query(mockito::Matcher::Any)
        .with_status(429)
        .with_header("retry-after", "30")
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client();

    let err = client.search_users("ada", None).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert!(err.is_api_error());
    assert!(!err.is_authentication());
    assert_eq!(err.api_error().and_then(|e| e.retry_after), Some(30));
    mock.assert_async().await;
}

#[tokio::test]
async fn every_operation_classifies_401_and_429() {
    for (status, auth) in [(401usize, true), (429, false)] {
        let mut fixture = MockServerFixture::new().await;
        let _get = fixture.mock_error("GET", "/users/1", status, "").await;
        let _post = fixture.mock_error("POST", "/users", status, "").await;
        let _patch = fixture.mock_error("PATCH", "/users/1", status, "").await;
        let _delete = fixture.mock_error("DELETE", "/users/1", status, "").await;
        let _list = fixture.mock_error("GET", "/users", status, "").await;
        let _search = fixture.mock_error("GET", "/users/search", status, "").await;
        let client = fixture.client();

        let errors = vec![
            client.get_user("1", true).await.unwrap_err(),
            client.create_user("a@b.io", "A", None).await.unwrap_err(),
            client
                .update_user("1", &UserUpdate::new().set("x", 1))
                .await
                .unwrap_err(),
            client.delete_user("1").await.unwrap_err(),
            client.list_users(&ListUsersQuery::new()).await.unwrap_err(),
            client.search_users("a", None).await.unwrap_err(),
            client.get_user_permissions("1").await.unwrap_err(),
        ];
        for err in errors {
            assert!(err.is_api_error(), "{}", err);
            assert_eq!(err.is_authentication(), auth, "{}", err);
            assert_eq!(err.is_rate_limited(), !auth, "{}", err);
        }
    }
}

#[tokio::test]
async fn other_statuses_are_generic_api_errors_with_cause() {
    let mut fixture = MockServerFixture::new().await;
    let _missing = fixture.mock_error("GET", "/users/404", 404, "no such user").await;
    let _broken = fixture.mock_error("GET", "/users/500", 503, "").await;
    let client = fixture.client();

    let err = client.get_user("404", false).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_authentication() && !err.is_rate_limited());
    assert!(err.to_string().contains("no such user"));
    assert!(err.to_string().contains("404"));

    // empty bodies fall back to the canonical reason
    let err = client.get_user("500", false).await.unwrap_err();
    assert_eq!(err.api_error().map(|e| e.kind), Some(ApiErrorKind::Status));
    assert_eq!(
        err.api_error().map(|e| e.message.as_str()),
        Some("Service Unavailable")
    );
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let mut fixture = MockServerFixture::new().await;
    let _html = fixture
        .server
        .mock("GET", "/users/1")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;
    let client = fixture.client();

    let err = client.get_user("1", true).await.unwrap_err();
    assert!(err.is_decode());
    assert!(!err.is_transport());
    assert!(!err.is_api_error());
    assert_eq!(client.cached_len(), 0);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = UserApiClient::new(&format!("http://127.0.0.1:{}", port), API_KEY).unwrap();

    let err = client.get_user("1", true).await.unwrap_err();
    assert!(err.is_transport());
    assert!(!err.is_api_error());
}

#[tokio::test]
async fn stalled_server_times_out() {
    // Accepts connections at the kernel level but never answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = UserApiClient::builder()
        .base_url(format!("http://{}", addr))
        .api_key(API_KEY)
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let err = client.get_user("1", false).await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.is_timeout());
    drop(listener);
}

#[tokio::test]
async fn truncated_error_body_still_yields_classified_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        // promises 100 bytes, sends 7, then hangs up
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });
    let client = UserApiClient::new(&format!("http://{}", addr), API_KEY).unwrap();

    let err = client.get_user("1", false).await.unwrap_err();
    assert!(err.is_api_error());
    assert_eq!(err.status(), Some(500));
    assert_eq!(
        err.api_error().map(|e| e.message.as_str()),
        Some("Internal Server Error")
    );
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_ids_are_rejected_before_sending() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.client();

    for id in ["", "  ", "1/2", "1?admin=true"] {
        assert!(client.get_user(id, true).await.unwrap_err().is_validation());
        assert!(client.delete_user(id).await.unwrap_err().is_validation());
    }
}

#[tokio::test]
async fn dot_segment_ids_never_reach_collection_or_root() {
    let mut fixture = MockServerFixture::new().await;
    let collection = fixture.mock_json("DELETE", "/users/", 204, "", 0).await;
    let listing = fixture.mock_json("GET", "/users/", 200, "[]", 0).await;
    let root = fixture.mock_json("GET", "/", 200, r#"{"root": true}"#, 0).await;
    let client = fixture.client();

    for id in [".", ".."] {
        assert!(client.delete_user(id).await.unwrap_err().is_validation());
        assert!(client.get_user(id, true).await.unwrap_err().is_validation());
        assert!(client
            .update_user(id, &UserUpdate::new().set("name", "x"))
            .await
            .unwrap_err()
            .is_validation());
    }
    assert_eq!(client.cached_len(), 0);

    // escaped dots stay inside the id segment
    let _ = client.delete_user("%2e").await;
    let _ = client.get_user("%2e%2e", true).await;

    collection.assert_async().await;
    listing.assert_async().await;
    root.assert_async().await;
}
