use serde_json::Value;
use tracing::debug;
use urlencoding::encode;

use crate::auth::build_client;
use crate::error::{HedexError, Result};
use crate::types::ReportRequest;

/// Build the report URL with its query string.
fn report_url(server_url: &str, session_id: &str, request: &ReportRequest) -> String {
    let mut url = format!(
        "{}/direct/hedex/{}",
        server_url.trim_end_matches('/'),
        request.report.wire_name()
    );

    let mut query_params: Vec<String> = Vec::new();
    query_params.push(format!("RequestingAgent={}", encode(&request.agent)));
    query_params.push(format!("sessionid={}", encode(session_id)));
    query_params.push(format!("startDate={}", encode(&request.start_date)));

    if !request.options.terms.is_empty() {
        let terms = request.options.terms.join(",");
        query_params.push(format!("terms={}", encode(&terms)));
    }

    if let Some(changes_only) = request.options.send_changes_only {
        query_params.push(format!("sendChangesOnly={}", changes_only));
    }

    if let Some(ref last_run) = request.options.last_run_date {
        query_params.push(format!("lastRunDate={}", encode(last_run)));
    }

    url = format!("{}?{}", url, query_params.join("&"));
    url
}

/// Fetch one report and return its decoded JSON body untouched.
///
/// The caller supplies a session token from a prior [`crate::auth::login`];
/// the client never re-authenticates. Fails with
/// [`HedexError::Request`] on network failure or a non-success status
/// and with [`HedexError::Decode`] when the body is not valid JSON.
/// Idempotent, so safe to retry from outside.
pub async fn fetch_report(
    server_url: &str,
    session_id: &str,
    request: &ReportRequest,
    timeout_seconds: Option<u64>,
) -> Result<Value> {
    if session_id.is_empty() {
        return Err(HedexError::Request(
            "a non-empty session token from a prior login is required".to_string(),
        ));
    }

    let client = build_client(timeout_seconds)?;
    let url = report_url(server_url, session_id, request);

    debug!(report = %request.report, agent = %request.agent, "pulling report");

    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| HedexError::Request(format!("GET request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HedexError::Request(format!(
            "{} failed with status {}: {}",
            request.report,
            status.as_u16(),
            body
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| HedexError::Request(format!("Failed to read response body: {}", e)))?;

    let json: Value = serde_json::from_str(&body)?;
    Ok(json)
}
