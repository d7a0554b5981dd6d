use hedex_reports::{login, HedexError};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PATH: &str = "/sakai-ws/soap/login";

fn login_response(token: &str) -> String {
    format!(
        concat!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soapenv:Body><loginResponse>"#,
            r#"<loginReturn xsi:type="xsd:string" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{}</loginReturn>"#,
            r#"</loginResponse></soapenv:Body></soapenv:Envelope>"#,
        ),
        token
    )
}

fn fault_response(message: &str) -> String {
    format!(
        concat!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soapenv:Body><soapenv:Fault>"#,
            r#"<faultcode>soapenv:Server.userException</faultcode>"#,
            r#"<faultstring>{}</faultstring>"#,
            r#"</soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
        ),
        message
    )
}

#[tokio::test]
async fn valid_credentials_yield_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_string_contains(
            r#"<id xsi:type="xsd:string">noodle-hedex-user</id>"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_response("abc123")))
        .mount(&server)
        .await;

    let token = login(&server.uri(), "noodle-hedex-user", "noodle", Some(5))
        .await
        .unwrap();
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn rejected_credentials_surface_authentication_error() {
    let server = MockServer::start().await;

    // Axis wraps login rejections in an HTTP 500 with a SOAP fault.
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(fault_response("Unable to login user")),
        )
        .mount(&server)
        .await;

    let err = login(&server.uri(), "noodle-hedex-user", "wrong", Some(5))
        .await
        .unwrap_err();
    match err {
        HedexError::Authentication(message) => assert!(message.contains("Unable to login user")),
        other => panic!("expected Authentication, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_credentials_fail_before_any_request() {
    let err = login("http://localhost:1", "", "noodle", Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, HedexError::Authentication(_)));
}

#[tokio::test]
async fn unreachable_server_surfaces_authentication_error() {
    let err = login("http://127.0.0.1:1", "noodle-hedex-user", "noodle", Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, HedexError::Authentication(_)));
}

#[tokio::test]
async fn unparseable_login_reply_is_a_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance page"))
        .mount(&server)
        .await;

    let err = login(&server.uri(), "noodle-hedex-user", "noodle", Some(5))
        .await
        .unwrap_err();
    assert!(matches!(err, HedexError::Protocol(_)));
}

#[tokio::test]
async fn empty_token_is_a_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_response("")))
        .mount(&server)
        .await;

    let err = login(&server.uri(), "noodle-hedex-user", "noodle", Some(5))
        .await
        .unwrap_err();
    assert!(matches!(err, HedexError::Protocol(_)));
}
