use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

use crate::error::{HedexError, Result};

const LOGIN_PATH: &str = "/sakai-ws/soap/login";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub(crate) fn build_client(timeout_seconds: Option<u64>) -> Result<Client> {
    let timeout = Duration::from_secs(timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));

    ClientBuilder::new()
        .timeout(timeout)
        .cookie_store(true)
        .user_agent("HedexReports/0.1 (Rust)")
        .build()
        .map_err(|e| HedexError::Request(format!("Failed to build HTTP client: {}", e)))
}

/// Build the SOAP 1.1 envelope for the Sakai `login` operation.
///
/// Sakai's login web service is an Axis RPC-style endpoint taking two
/// string parts, `id` and `pw`.
fn login_envelope(username: &str, password: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/""#,
            r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
            r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<soapenv:Body>"#,
            r#"<login soapenv:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#,
            r#"<id xsi:type="xsd:string">{id}</id>"#,
            r#"<pw xsi:type="xsd:string">{pw}</pw>"#,
            r#"</login>"#,
            r#"</soapenv:Body>"#,
            r#"</soapenv:Envelope>"#,
        ),
        id = escape(username),
        pw = escape(password),
    )
}

/// What a scan of the login response body turned up.
#[derive(Debug, Default)]
struct LoginReply {
    token: Option<String>,
    fault: Option<String>,
}

fn scan_login_response(body: &str) -> std::result::Result<LoginReply, quick_xml::Error> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut reply = LoginReply::default();
    let mut in_return = false;
    let mut in_fault = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"loginReturn" => in_return = true,
                b"faultstring" => in_fault = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"loginReturn" => in_return = false,
                b"faultstring" => in_fault = false,
                _ => {}
            },
            Event::Text(t) => {
                let text = t.unescape()?.trim().to_string();
                if in_return {
                    reply.token = Some(text);
                } else if in_fault {
                    reply.fault = Some(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(reply)
}

/// Log in to the Sakai server and return the opaque session token.
///
/// The token is a capability: its lifetime is decided entirely by the
/// remote server and nothing here should try to guess when it expires.
///
/// Fails with [`HedexError::Authentication`] when the server rejects
/// the credentials or cannot be reached, and with
/// [`HedexError::Protocol`] when the response is not a recognisable
/// SOAP login reply. One exchange, no retries.
pub async fn login(
    server_url: &str,
    username: &str,
    password: &str,
    timeout_seconds: Option<u64>,
) -> Result<String> {
    if username.is_empty() || password.is_empty() {
        return Err(HedexError::Authentication(
            "username and password must be non-empty".to_string(),
        ));
    }

    let client = build_client(timeout_seconds)?;
    let url = format!("{}{}", server_url.trim_end_matches('/'), LOGIN_PATH);

    debug!(%url, %username, "logging in");

    let response = client
        .post(&url)
        .header("Content-Type", "text/xml; charset=utf-8")
        .header("SOAPAction", "\"\"")
        .body(login_envelope(username, password))
        .send()
        .await
        .map_err(|e| HedexError::Authentication(format!("login request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| HedexError::Authentication(format!("failed to read login response: {}", e)))?;

    // Axis reports bad credentials as an HTTP 500 carrying a SOAP
    // fault, so scan the body before looking at the status.
    match scan_login_response(&body) {
        Ok(reply) => {
            if let Some(fault) = reply.fault {
                return Err(HedexError::Authentication(fault));
            }
            if !status.is_success() {
                return Err(HedexError::Authentication(format!(
                    "login failed with status {}",
                    status.as_u16()
                )));
            }
            match reply.token {
                Some(token) if !token.is_empty() => Ok(token),
                _ => Err(HedexError::Protocol(
                    "login response contained no session token".to_string(),
                )),
            }
        }
        Err(_) if !status.is_success() => Err(HedexError::Authentication(format!(
            "login failed with status {}",
            status.as_u16()
        ))),
        Err(e) => Err(HedexError::Protocol(format!(
            "login response is not valid XML: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_escapes_credentials() {
        let envelope = login_envelope("user", "p<&>w");
        assert!(envelope.contains("<id xsi:type=\"xsd:string\">user</id>"));
        assert!(envelope.contains("p&lt;&amp;&gt;w"));
        assert!(!envelope.contains("p<&>w"));
    }

    #[test]
    fn scans_token_from_login_reply() {
        let body = concat!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soapenv:Body><loginResponse>"#,
            r#"<loginReturn xsi:type="xsd:string" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">abc123</loginReturn>"#,
            r#"</loginResponse></soapenv:Body></soapenv:Envelope>"#,
        );
        let reply = scan_login_response(body).unwrap();
        assert_eq!(reply.token.as_deref(), Some("abc123"));
        assert!(reply.fault.is_none());
    }

    #[test]
    fn scans_fault_from_rejection() {
        let body = concat!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soapenv:Body><soapenv:Fault>"#,
            r#"<faultcode>soapenv:Server.userException</faultcode>"#,
            r#"<faultstring>Unable to login user</faultstring>"#,
            r#"</soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
        );
        let reply = scan_login_response(body).unwrap();
        assert!(reply.token.is_none());
        assert_eq!(reply.fault.as_deref(), Some("Unable to login user"));
    }
}
