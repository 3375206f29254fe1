//! API token (OAuth refresh token) login.

use std::path::Path;

use busbar_vcd_client::{AuthHeader, RequestBuilder, RequestMethod, Session, VcdClient};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::credentials::SYSTEM_ORG;
use crate::error::{Error, ErrorKind, Result};
use crate::login::new_session;
use crate::storage::ApiTokenFile;

/// Response of the vCD OAuth token endpoint.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Present for service accounts; replaces the token just used.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// OAuth token endpoint for an org.
pub fn token_url(client: &VcdClient, org: &str) -> String {
    if org.eq_ignore_ascii_case(SYSTEM_ORG) {
        client.url("oauth/provider/token")
    } else {
        client.url(&format!(
            "oauth/tenant/{}/token",
            busbar_vcd_client::security::url::encode_param(org)
        ))
    }
}

/// Exchange a refresh token for an access token.
///
/// The refresh_token parameter is not logged to prevent credential exposure.
#[instrument(skip(client, refresh_token))]
pub async fn exchange_refresh_token(
    client: &VcdClient,
    org: &str,
    refresh_token: &str,
) -> Result<TokenResponse> {
    if refresh_token.is_empty() {
        return Err(Error::new(ErrorKind::InvalidCredentials(
            "refresh token must not be empty".to_string(),
        )));
    }

    let request = RequestBuilder::new(RequestMethod::Post, token_url(client, org))
        .accept("application/json")
        .form(vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.to_string()),
        ]);

    let response = client.execute(request).await.map_err(|e| {
        if matches!(e.status(), Some(400) | Some(401)) {
            let message = e.to_string();
            Error::with_source(ErrorKind::Unauthorized(message), e)
        } else {
            e.into()
        }
    })?;

    let token: TokenResponse = response.json().await?;
    if token.access_token.is_empty() {
        return Err(Error::new(ErrorKind::MissingToken(
            "token endpoint returned an empty access_token".to_string(),
        )));
    }

    debug!(expires_in = ?token.expires_in, "Exchanged refresh token");
    Ok(token)
}

/// Log in with an API token.
pub async fn login_api_token(client: &VcdClient, org: &str, refresh_token: &str) -> Result<Session> {
    let token = exchange_refresh_token(client, org, refresh_token).await?;
    Ok(new_session(client, org, token.access_token, AuthHeader::Bearer))
}

/// Log in with a service account token file and store the rotated token.
#[instrument(skip(client))]
pub async fn login_token_file(client: &VcdClient, org: &str, path: &Path) -> Result<Session> {
    let mut file = ApiTokenFile::load(path)?;
    let token = exchange_refresh_token(client, org, &file.refresh_token).await?;

    if let Some(rotated) = token.refresh_token.as_deref().filter(|t| !t.is_empty()) {
        file.rotate(rotated);
        file.save(path)?;
        debug!(path = %path.display(), "Stored rotated refresh token");
    }

    Ok(new_session(client, org, token.access_token, AuthHeader::Bearer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_token_urls() {
        let client = VcdClient::new("https://vcd.example.com").unwrap();
        assert_eq!(
            token_url(&client, "System"),
            "https://vcd.example.com/oauth/provider/token"
        );
        assert_eq!(
            token_url(&client, "my org"),
            "https://vcd.example.com/oauth/tenant/my%20org/token"
        );
    }

    #[test]
    fn test_token_response_debug_redacts_tokens() {
        let token = TokenResponse {
            access_token: "secret_access".to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(3600),
            refresh_token: Some("secret_refresh".to_string()),
        };
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret_access"));
        assert!(!debug.contains("secret_refresh"));
        assert!(debug.contains("3600"));
    }

    #[tokio::test]
    async fn test_exchange_tenant_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/tenant/acme/token"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-1",
                "token_type": "Bearer",
                "expires_in": 2592000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VcdClient::new(server.uri()).unwrap();
        let session = login_api_token(&client, "acme", "rt-1").await.unwrap();

        assert_eq!(session.token(), Some("at-1"));
        assert_eq!(session.auth_header(), AuthHeader::Bearer);
        assert_eq!(session.org.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_rejected_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/provider/token"))
            .respond_with(ResponseTemplate::new(400).set_body_raw(
                r#"{"minorErrorCode":"BAD_REQUEST","message":"invalid_grant"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = VcdClient::new(server.uri()).unwrap();
        let err = exchange_refresh_token(&client, "System", "expired")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_token_file_is_rotated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/provider/token"))
            .and(body_string_contains("refresh_token=first"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at",
                "token_type": "Bearer",
                "refresh_token": "second"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("sa.json");
        ApiTokenFile::new("first").save(&file_path).unwrap();

        let client = VcdClient::new(server.uri()).unwrap();
        let session = login_token_file(&client, "System", &file_path).await.unwrap();
        assert_eq!(session.token(), Some("at"));

        let stored = ApiTokenFile::load(&file_path).unwrap();
        assert_eq!(stored.refresh_token, "second");
        assert!(stored.updated_on.is_some());
    }
}
