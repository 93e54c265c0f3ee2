//! # Error Handling Middleware
//!
//! Turns failed HTTP exchanges into [`SesplanError`]s. Non-2xx responses are
//! classified by status code; the message comes from the server's
//! `{"detail": ...}` body when there is one. Transport failures become
//! [`SesplanError::Network`] and undecodable bodies become
//! [`SesplanError::Parse`].

use reqwest::{Response, StatusCode};
use serde_json::Value;
use sesplan_core::errors::{SesplanError, SesplanResult};
use tracing::warn;

/// Passes successful responses through and converts everything else into an error.
pub async fn check_response(response: Response) -> SesplanResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = error_from_body(status.as_u16(), &body);
    warn!("Request to API failed: {}", error);
    Err(error)
}

/// Builds the error for a failed response from its status and raw body.
pub fn error_from_body(status: u16, body: &str) -> SesplanError {
    let detail = extract_detail(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Request failed")
                .to_string()
        } else {
            body.to_string()
        }
    });
    SesplanError::from_status(status, detail)
}

/// Reads FastAPI's `detail` field, which is either a message or a list of
/// validation errors each carrying a `msg`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

pub fn from_reqwest(err: reqwest::Error) -> SesplanError {
    if err.is_decode() {
        return SesplanError::Parse(err.to_string());
    }
    if let Some(status) = err.status() {
        return SesplanError::from_status(status.as_u16(), err.to_string());
    }
    SesplanError::Network(err.to_string())
}
