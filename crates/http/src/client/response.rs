//! Response decoding

use super::ClientError;
use reqwest::{Response, StatusCode, header};
use serde_json::{Value, json};

/// Returned for successful responses that carry no JSON
pub fn success_marker() -> Value {
    json!({ "success": true })
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("application/json"))
}

/// Turn a response into the call result
pub(crate) async fn finish(response: Response) -> Result<Value, ClientError> {
    if response.status().is_success() {
        read_success(response).await
    } else {
        Err(read_failure(response).await)
    }
}

async fn read_success(response: Response) -> Result<Value, ClientError> {
    if !is_json(&response) {
        return Ok(success_marker());
    }
    let body = response.bytes().await?;
    if body.is_empty() {
        return Ok(success_marker());
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Build the error for a non-success response, tolerating odd bodies
pub(crate) async fn read_failure(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| fallback_message(status));
    ClientError::from_status(status, message)
}

fn server_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| payload.get(field).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}

fn fallback_message(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}
