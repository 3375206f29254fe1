//! OpenAPI integration tests.

use super::common::{get_openapi_client, TEST_ROLE_NAME};
use busbar_vcd_api::openapi::{Role, ENDPOINT_AUDIT_TRAIL};
use busbar_vcd_api::FilterBuilder;

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_list_roles() {
    let client = get_openapi_client().await;
    let roles = client.get_all_roles(Default::default()).await.unwrap();
    assert!(!roles.is_empty(), "every instance ships predefined roles");
}

#[tokio::test]
#[ignore]
async fn test_get_test_role_by_name() {
    let client = get_openapi_client().await;
    let role = client
        .get_role_by_name(TEST_ROLE_NAME)
        .await
        .expect("run `cargo run --bin setup-test-roles` first");

    let id = role.id.as_deref().unwrap();
    let by_id = client.get_role_by_id(id).await.unwrap();
    assert_eq!(by_id.name, TEST_ROLE_NAME);
}

#[tokio::test]
#[ignore]
async fn test_role_lifecycle() {
    let client = get_openapi_client().await;
    let name = format!("BusbarIntTest_Temp_{}", std::process::id());

    let created = client
        .create_role(&Role::new(&name, "temporary"))
        .await
        .unwrap();
    let id = created.id.clone().unwrap();

    let mut updated = created.clone();
    updated.description = "updated".to_string();
    let updated = client.update_role(&updated).await.unwrap();
    assert_eq!(updated.description, "updated");

    client.delete_role(&id).await.unwrap();
    let err = client.get_role_by_id(&id).await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
#[ignore]
async fn test_filtered_role_query() {
    let client = get_openapi_client().await;
    let params = FilterBuilder::all()
        .like("name", "BusbarIntTest")
        .unwrap()
        .into_params();

    let roles = client.get_all_roles(params).await.unwrap();
    assert!(roles.iter().all(|r| r.name.starts_with("BusbarIntTest")));
}

// ============================================================================
// Rights
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_rights_span_multiple_pages() {
    let client = get_openapi_client().await;
    let rights = client.get_all_rights(Default::default()).await.unwrap();
    assert!(rights.len() > 128, "got {} rights", rights.len());
}

// ============================================================================
// Audit trail and sessions
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_recent_audit_trail() {
    let client = get_openapi_client().await;
    if client
        .inner()
        .check_endpoint_compatibility(ENDPOINT_AUDIT_TRAIL)
        .is_err()
    {
        return;
    }

    let since = chrono::Utc::now() - chrono::Duration::hours(1);
    let events = client.get_audit_trail_since(since).await.unwrap();
    // The login that created this client is an audited event.
    assert!(!events.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_current_session() {
    let client = get_openapi_client().await;
    let session = client.get_current_session().await.unwrap();
    assert!(!session.id.is_empty());
}
