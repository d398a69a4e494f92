//! Cache population, expiry and invalidation through the public client.

use crate::mock_server::MockServerFixture;
use serde_json::json;
use std::time::Duration;
use user_api_client::cache::USER_CACHE_TTL;
use user_api_client::UserUpdate;

const ADA: &str = r#"{"id": 1, "name": "Ada", "permissions": ["read", "write"]}"#;

#[tokio::test]
async fn cached_read_skips_network() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 1).await;
    let client = fixture.client();

    let first = client.get_user("1", true).await.unwrap();
    let second = client.get_user("1", true).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second["name"], "Ada");
    mock.assert_async().await;

    let stats = client.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(client.cached_len(), 1);
}

#[tokio::test]
async fn uncached_read_always_fetches_and_leaves_cache_alone() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 2).await;
    let client = fixture.client();

    client.get_user("1", false).await.unwrap();
    client.get_user("1", false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(client.cached_len(), 0);
}

#[tokio::test]
async fn entry_is_served_until_just_before_ttl() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 1).await;
    let (client, clock) = fixture.client_with_clock();

    client.get_user("1", true).await.unwrap();
    clock.advance(USER_CACHE_TTL - Duration::from_secs(1));
    client.get_user("1", true).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn read_at_ttl_boundary_refetches() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 2).await;
    let (client, clock) = fixture.client_with_clock();

    client.get_user("1", true).await.unwrap();
    clock.advance(USER_CACHE_TTL);
    client.get_user("1", true).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn refetch_after_expiry_refreshes_the_entry() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 2).await;
    let (client, clock) = fixture.client_with_clock();

    client.get_user("1", true).await.unwrap();
    clock.advance(USER_CACHE_TTL + Duration::from_secs(60));
    client.get_user("1", true).await.unwrap();
    // served from the refreshed entry
    clock.advance(Duration::from_secs(60));
    client.get_user("1", true).await.unwrap();

    mock.assert_async().await;
    assert_eq!(client.cache_stats().inserts, 2);
}

#[tokio::test]
async fn update_invalidates_cached_user() {
    let mut fixture = MockServerFixture::new().await;
    let get = fixture.mock_json("GET", "/users/1", 200, ADA, 2).await;
    let patch = fixture
        .mock_json("PATCH", "/users/1", 200, r#"{"id": 1, "name": "Grace"}"#, 1)
        .await;
    let client = fixture.client();

    client.get_user("1", true).await.unwrap();
    client
        .update_user("1", &UserUpdate::new().set("name", "Grace"))
        .await
        .unwrap();
    client.get_user("1", true).await.unwrap();

    get.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn update_and_delete_of_uncached_user_succeed() {
    let mut fixture = MockServerFixture::new().await;
    let _patch = fixture
        .mock_json("PATCH", "/users/5", 200, r#"{"id": 5}"#, 1)
        .await;
    let _delete = fixture.mock_json("DELETE", "/users/5", 204, "", 1).await;
    let client = fixture.client();

    client
        .update_user("5", &UserUpdate::new().set("active", false))
        .await
        .unwrap();
    assert!(client.delete_user("5").await.unwrap());
    assert_eq!(client.cache_stats().invalidations, 2);
}

#[tokio::test]
async fn delete_invalidates_cached_user() {
    let mut fixture = MockServerFixture::new().await;
    let get = fixture.mock_json("GET", "/users/1", 200, ADA, 2).await;
    let _delete = fixture
        .mock_json("DELETE", "/users/1", 200, r#"{"deleted": true}"#, 1)
        .await;
    let client = fixture.client();

    client.get_user("1", true).await.unwrap();
    assert!(client.delete_user("1").await.unwrap());
    client.get_user("1", true).await.unwrap();

    get.assert_async().await;
}

#[tokio::test]
async fn failed_update_keeps_cache_entry() {
    let mut fixture = MockServerFixture::new().await;
    let get = fixture.mock_json("GET", "/users/1", 200, ADA, 1).await;
    let _patch = fixture.mock_error("PATCH", "/users/1", 500, "boom").await;
    let client = fixture.client();

    client.get_user("1", true).await.unwrap();
    let err = client
        .update_user("1", &UserUpdate::new().set("name", "X"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    client.get_user("1", true).await.unwrap();

    get.assert_async().await;
}

#[tokio::test]
async fn clear_cache_forces_refetch() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 2).await;
    let client = fixture.client();

    client.get_user("1", true).await.unwrap();
    client.clear_cache();
    assert_eq!(client.cached_len(), 0);
    client.get_user("1", true).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn permissions_use_the_cached_read() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/users/1", 200, ADA, 1).await;
    let client = fixture.client();

    client.get_user("1", true).await.unwrap();
    let perms = client.get_user_permissions("1").await.unwrap();

    assert_eq!(perms, vec![json!("read"), json!("write")]);
    mock.assert_async().await;
}

#[tokio::test]
async fn permissions_default_to_empty() {
    let mut fixture = MockServerFixture::new().await;
    let _get = fixture
        .mock_json("GET", "/users/2", 200, r#"{"id": 2}"#, 1)
        .await;
    let client = fixture.client();

    assert!(client.get_user_permissions("2").await.unwrap().is_empty());
}
