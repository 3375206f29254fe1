//! SAML login through Active Directory Federation Services.
//!
//! The flow:
//! 1. read the org's SAML entity id from its metadata (unless a custom
//!    relying party trust id is given)
//! 2. follow the org's SAML login redirect to learn the ADFS host
//! 3. request a token from the ADFS WS-Trust 1.3 `usernamemixed` endpoint
//! 4. sign in to vCD with the gzipped, base64 encoded assertion

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine};
use busbar_vcd_client::security::{url::encode_param, xml::escape};
use busbar_vcd_client::{BodyFormat, RequestBuilder, RequestMethod, Session, VcdClient};
use chrono::{Duration, SecondsFormat, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::error::{Error, ErrorKind, Result};
use crate::login::{new_session, token_from_response};

/// ADFS WS-Trust 1.3 endpoint accepting user name and password.
pub const ADFS_USERNAME_MIXED_PATH: &str = "/adfs/services/trust/13/usernamemixed";

/// Lifetime requested for the security token.
const TOKEN_LIFETIME_MINUTES: i64 = 60;

#[derive(Debug, Deserialize)]
struct EntityDescriptor {
    #[serde(rename = "@entityID")]
    entity_id: String,
}

/// Log in as `user` through the org's ADFS server.
#[instrument(skip(client, password))]
pub async fn login_saml(
    client: &VcdClient,
    org: &str,
    user: &str,
    password: &str,
    custom_rpt_id: Option<&str>,
) -> Result<Session> {
    let rpt_id = match custom_rpt_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => saml_entity_id(client, org).await?,
    };
    debug!(rpt_id = %rpt_id, "Using relying party trust");

    let adfs_url = adfs_endpoint(client, org).await?;
    let assertion = request_security_token(client, &adfs_url, user, password, &rpt_id).await?;

    let request = RequestBuilder::new(RequestMethod::Post, client.api_url("sessions"))
        .accept(BodyFormat::Xml.accept(client.api_version()))
        .header("Authorization", sign_header(&assertion, org)?);

    let response = client.execute(request).await.map_err(|e| {
        if e.status() == Some(401) {
            let message = e.to_string();
            Error::with_source(ErrorKind::Unauthorized(message), e)
        } else {
            e.into()
        }
    })?;
    let (token, header) = token_from_response(&response)?;

    Ok(new_session(client, org, token, header).with_user(user))
}

/// Entity id published in the org's SAML metadata.
pub async fn saml_entity_id(client: &VcdClient, org: &str) -> Result<String> {
    let url = client.url(&format!(
        "cloud/org/{}/saml/metadata/alias/vcd",
        encode_param(org)
    ));
    let request = RequestBuilder::new(RequestMethod::Get, url);

    let metadata: EntityDescriptor = client.execute(request).await?.xml().await?;
    if metadata.entity_id.is_empty() {
        return Err(Error::new(ErrorKind::Saml(format!(
            "SAML metadata of org '{}' has no entityID",
            org
        ))));
    }
    Ok(metadata.entity_id)
}

/// ADFS `usernamemixed` URL on the host vCD redirects the login to.
pub async fn adfs_endpoint(client: &VcdClient, org: &str) -> Result<String> {
    let url = client.url(&format!(
        "login/my-org/saml/login/alias/vcd?service=tenant:{}",
        encode_param(org)
    ));
    let response = client
        .execute_raw(RequestBuilder::new(RequestMethod::Get, url))
        .await?;

    let location = match (response.status(), response.location()) {
        (300..=399, Some(location)) => location.to_string(),
        _ => {
            return Err(Error::new(ErrorKind::Saml(format!(
                "expected a redirect to the ADFS server, got {}",
                response.status_text()
            ))))
        }
    };

    let mut adfs = Url::parse(&location)
        .map_err(|e| Error::with_source(ErrorKind::Saml(format!("bad ADFS redirect: {}", e)), e))?;
    adfs.set_path(ADFS_USERNAME_MIXED_PATH);
    adfs.set_query(None);
    adfs.set_fragment(None);

    Ok(adfs.to_string())
}

/// Exchange user name and password for a SAML assertion.
async fn request_security_token(
    client: &VcdClient,
    adfs_url: &str,
    user: &str,
    password: &str,
    rpt_id: &str,
) -> Result<String> {
    let envelope = security_token_request(adfs_url, user, password, rpt_id);
    let request = RequestBuilder::new(RequestMethod::Post, adfs_url)
        .content_type("application/soap+xml; charset=utf-8")
        .text(envelope);

    let response = client.execute_raw(request).await?;
    let status = response.status_text();
    let success = response.is_success();
    let body = response.text().await?;

    if let Some(reason) = soap_fault_reason(&body) {
        return Err(Error::new(ErrorKind::Saml(format!("ADFS fault: {}", reason))));
    }
    if !success {
        return Err(Error::new(ErrorKind::Saml(format!(
            "ADFS returned {}",
            status
        ))));
    }

    extract_security_token(&body)
}

/// WS-Trust 1.3 `Issue` request for a bearer SAML 2.0 token.
fn security_token_request(adfs_url: &str, user: &str, password: &str, rpt_id: &str) -> String {
    let created = Utc::now();
    let expires = created + Duration::minutes(TOKEN_LIFETIME_MINUTES);

    format!(
        r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope" xmlns:a="http://www.w3.org/2005/08/addressing" xmlns:u="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd">
  <s:Header>
    <a:Action s:mustUnderstand="1">http://docs.oasis-open.org/ws-sx/ws-trust/200512/RST/Issue</a:Action>
    <a:ReplyTo><a:Address>http://www.w3.org/2005/08/addressing/anonymous</a:Address></a:ReplyTo>
    <a:To s:mustUnderstand="1">{to}</a:To>
    <a:MessageID>urn:uuid:{message_id}</a:MessageID>
    <o:Security s:mustUnderstand="1" xmlns:o="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd">
      <u:Timestamp u:Id="_0">
        <u:Created>{created}</u:Created>
        <u:Expires>{expires}</u:Expires>
      </u:Timestamp>
      <o:UsernameToken u:Id="uuid-{message_id}-1">
        <o:Username>{user}</o:Username>
        <o:Password o:Type="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordText">{password}</o:Password>
      </o:UsernameToken>
    </o:Security>
  </s:Header>
  <s:Body>
    <trust:RequestSecurityToken xmlns:trust="http://docs.oasis-open.org/ws-sx/ws-trust/200512">
      <wsp:AppliesTo xmlns:wsp="http://schemas.xmlsoap.org/ws/2004/09/policy">
        <a:EndpointReference><a:Address>{rpt}</a:Address></a:EndpointReference>
      </wsp:AppliesTo>
      <trust:KeySize>0</trust:KeySize>
      <trust:KeyType>http://docs.oasis-open.org/ws-sx/ws-trust/200512/Bearer</trust:KeyType>
      <i:RequestDisplayToken xml:lang="en" xmlns:i="http://schemas.xmlsoap.org/ws/2005/05/identity"/>
      <trust:RequestType>http://docs.oasis-open.org/ws-sx/ws-trust/200512/Issue</trust:RequestType>
      <trust:TokenType>http://docs.oasis-open.org/wss/oasis-wss-saml-token-profile-1.1#SAMLV2.0</trust:TokenType>
    </trust:RequestSecurityToken>
  </s:Body>
</s:Envelope>"#,
        to = escape(adfs_url),
        message_id = message_id(),
        created = created.to_rfc3339_opts(SecondsFormat::Millis, true),
        expires = expires.to_rfc3339_opts(SecondsFormat::Millis, true),
        user = escape(user),
        password = escape(password),
        rpt = escape(rpt_id),
    )
}

fn message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reason text of a SOAP fault, if the body is one.
fn soap_fault_reason(body: &str) -> Option<String> {
    let mut reader = Reader::from_str(body);
    let mut in_fault = false;
    let mut in_text = false;
    let mut reason = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Fault" => in_fault = true,
                b"Text" | b"faultstring" if in_fault => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"Fault" => in_fault = true,
            Ok(Event::Text(t)) if in_text => {
                if let Ok(text) = t.unescape() {
                    reason.push_str(&text);
                }
            }
            Ok(Event::CData(c)) if in_text => reason.push_str(&String::from_utf8_lossy(&c)),
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"Text" | b"faultstring" if in_text => {
                    if !reason.trim().is_empty() {
                        break;
                    }
                    in_text = false;
                }
                b"Fault" => break,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    if !in_fault {
        return None;
    }
    let reason = reason.trim();
    Some(if reason.is_empty() {
        "unknown fault".to_string()
    } else {
        reason.to_string()
    })
}

/// Raw XML inside the `RequestedSecurityToken` element.
fn extract_security_token(body: &str) -> Result<String> {
    let missing = || Error::new(ErrorKind::Saml("no RequestedSecurityToken in response".to_string()));
    let malformed = |e: quick_xml::Error| {
        Error::with_source(ErrorKind::Saml(format!("malformed ADFS response: {}", e)), e)
    };

    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) if e.local_name().as_ref() == b"RequestedSecurityToken" => {
                let end = e.to_end().into_owned();
                let inner = reader.read_text(end.name()).map_err(malformed)?;
                return token_content(&inner).ok_or_else(missing);
            }
            Event::Eof => return Err(missing()),
            _ => {}
        }
    }
}

/// Trimmed token markup, unwrapped from a CDATA section if ADFS sent one.
fn token_content(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("<![CDATA[")
        .and_then(|r| r.strip_suffix("]]>"))
        .map(str::trim)
        .unwrap_or(raw);
    (!raw.is_empty()).then(|| raw.to_string())
}

/// `SIGN token="<gzip+base64 assertion>",org="<org>"`
fn sign_header(assertion: &str, org: &str) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(assertion.as_bytes())?;
    let compressed = encoder.finish()?;

    Ok(format!(
        r#"SIGN token="{}",org="{}""#,
        STANDARD.encode(compressed),
        org
    ))
}
