use busbar_vcd_api::auth::VcdCredentials;
use busbar_vcd_api::{OpenApiClient, VcdClient};

/// Role created by `setup-test-roles`.
pub const TEST_ROLE_NAME: &str = "BusbarIntTest_Role";

/// Credentials for integration tests.
///
/// **IMPORTANT**: Integration tests MUST run against a real vCD instance.
/// This function panics with a helpful error message if the environment
/// is not configured. Tests should NOT skip when credentials are unavailable.
pub fn get_credentials() -> VcdCredentials {
    match VcdCredentials::from_env() {
        Ok(creds) => creds,
        Err(e) => panic!(
            "\n\n\
            ╔══════════════════════════════════════════════════════════════════════╗\n\
            ║ INTEGRATION TEST CONFIGURATION ERROR                                 ║\n\
            ╠══════════════════════════════════════════════════════════════════════╣\n\
            ║ {:68} ║\n\
            ║                                                                      ║\n\
            ║ Integration tests require a reachable vCD instance.                  ║\n\
            ║                                                                      ║\n\
            ║ To fix:                                                              ║\n\
            ║   export VCD_URL=https://vcd.example.com                             ║\n\
            ║   export VCD_ORG=System                                              ║\n\
            ║   export VCD_USER=... VCD_PASSWORD=...                               ║\n\
            ║   (or VCD_TOKEN / VCD_API_TOKEN / VCD_API_TOKEN_FILE)                ║\n\
            ╚══════════════════════════════════════════════════════════════════════╝\n\n",
            e.to_string()
        ),
    }
}

/// A logged-in client.
pub async fn get_client() -> VcdClient {
    let creds = get_credentials();
    match creds.connect().await {
        Ok(client) => client,
        Err(e) => panic!(
            "\n\n\
            ╔══════════════════════════════════════════════════════════════════════╗\n\
            ║ INTEGRATION TEST AUTHENTICATION FAILED                               ║\n\
            ╠══════════════════════════════════════════════════════════════════════╣\n\
            ║ Error: {:61} ║\n\
            ║                                                                      ║\n\
            ║ This usually means:                                                  ║\n\
            ║   - The password or token is wrong or expired                        ║\n\
            ║   - VCD_ORG does not match the user's organization                   ║\n\
            ║   - The instance uses a self-signed certificate (set VCD_INSECURE)   ║\n\
            ╚══════════════════════════════════════════════════════════════════════╝\n\n",
            e.to_string()
        ),
    }
}

pub async fn get_openapi_client() -> OpenApiClient {
    OpenApiClient::from_client(get_client().await)
}
