//! One-time vCD setup for integration tests.
//!
//! Creates the test role used by the live suite and grants it a read-only
//! right. Idempotent, safe to re-run.
//!
//! ```sh
//! export VCD_URL=https://vcd.example.com VCD_ORG=System VCD_USER=admin VCD_PASSWORD=...
//! cargo run --bin setup-test-roles
//! ```

use busbar_vcd_api::openapi::{OpenApiReference, Role};
use busbar_vcd_api::{OpenApiClient, VcdCredentials};
use tracing_subscriber::EnvFilter;

const TEST_ROLE_NAME: &str = "BusbarIntTest_Role";
const TEST_RIGHT_NAME: &str = "Organization: View";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Setting up vCD for integration tests...\n");

    let creds = VcdCredentials::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("  Set VCD_URL, VCD_ORG and VCD_USER + VCD_PASSWORD (or VCD_TOKEN / VCD_API_TOKEN).");
        std::process::exit(1);
    });

    let client = creds.connect().await.unwrap_or_else(|e| {
        eprintln!("Error: Failed to authenticate: {e}");
        std::process::exit(1);
    });

    println!(
        "  Authenticated to {} (API {})\n",
        client.base_url(),
        client.api_version()
    );

    let openapi = OpenApiClient::from_client(client);

    print!("  Ensuring test role... ");
    let role = ensure_test_role(&openapi).await;
    println!("{}", role.id.as_deref().unwrap_or("?"));

    print!("  Granting '{TEST_RIGHT_NAME}'... ");
    grant_test_right(&openapi, &role).await;
    println!("done");

    println!("\nvCD setup complete.");
}

async fn ensure_test_role(client: &OpenApiClient) -> Role {
    match client.get_role_by_name(TEST_ROLE_NAME).await {
        Ok(role) => role,
        Err(e) if e.is_not_found() => client
            .create_role(&Role::new(TEST_ROLE_NAME, "Role used by busbar integration tests"))
            .await
            .unwrap_or_else(|e| {
                eprintln!("\nError: Failed to create test role: {e}");
                std::process::exit(1);
            }),
        Err(e) => {
            eprintln!("\nError: Failed to look up test role: {e}");
            std::process::exit(1);
        }
    }
}

async fn grant_test_right(client: &OpenApiClient, role: &Role) {
    let right = client
        .get_right_by_name(TEST_RIGHT_NAME)
        .await
        .unwrap_or_else(|e| {
            eprintln!("\nError: Failed to look up right: {e}");
            std::process::exit(1);
        });

    let role_id = role.id.as_deref().unwrap_or_default();
    let reference: OpenApiReference = right.reference();
    if let Err(e) = client.add_role_rights(role_id, vec![reference]).await {
        eprintln!("\nError: Failed to grant right: {e}");
        std::process::exit(1);
    }
}
