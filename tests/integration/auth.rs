//! Authentication integration tests.

use super::common::{get_client, get_credentials};
use busbar_vcd_api::auth::{logout, validate_session};
use busbar_vcd_api::client::ApiVersion;

#[tokio::test]
#[ignore]
async fn test_login_negotiates_version() {
    let client = get_client().await;

    assert!(client.is_authenticated());
    let negotiated: ApiVersion = client.api_version().parse().unwrap();
    let requested: ApiVersion = get_credentials().api_version().parse().unwrap();
    assert!(negotiated <= requested, "{negotiated} > {requested}");
}

#[tokio::test]
#[ignore]
async fn test_validate_session() {
    let client = get_client().await;
    validate_session(&client, client.session())
        .await
        .expect("fresh session should validate");
}

#[tokio::test]
#[ignore]
async fn test_logout_invalidates_session() {
    let mut client = get_client().await;
    logout(&mut client).await.expect("logout should succeed");
    assert!(!client.is_authenticated());
}

#[tokio::test]
#[ignore]
async fn test_discover_versions() {
    let client = get_client().await;
    let versions = client.discover_versions().await.unwrap();
    assert!(!versions.version_info.is_empty());
}
