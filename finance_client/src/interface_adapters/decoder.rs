// Response decoding by declared content type, independent of the client.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::errors::ClientError;
use crate::domain::http::RawResponse;

const PREVIEW_CHARS: usize = 200;

/// Structured result of interpreting a response body.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedResponse {
    Json(Value),
    Text(String),
    Empty,
}

impl DecodedResponse {
    /// Converts the decoded body into a typed record. `Empty` is treated as JSON `null`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let value = match self {
            DecodedResponse::Json(value) => value,
            DecodedResponse::Text(text) => Value::String(text),
            DecodedResponse::Empty => Value::Null,
        };
        let preview = preview(&value.to_string());
        serde_json::from_value(value).map_err(|err| ClientError::MalformedJson {
            preview,
            diagnostic: format!("unexpected shape: {err}"),
        })
    }

    /// Like `into_typed`, but an empty body is an empty list.
    pub fn into_list<T: DeserializeOwned>(self) -> Result<Vec<T>, ClientError> {
        match self {
            DecodedResponse::Empty | DecodedResponse::Json(Value::Null) => Ok(Vec::new()),
            other => other.into_typed(),
        }
    }
}

/// Decodes a successful response. Status is the caller's concern.
pub fn decode(response: &RawResponse) -> Result<DecodedResponse, ClientError> {
    if response.content_length.as_deref().map(str::trim) == Some("0") {
        return Ok(DecodedResponse::Empty);
    }

    let content_type = response
        .content_type
        .as_deref()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let body = response.body.as_str();

    if content_type.contains("application/json") {
        if body.trim().is_empty() {
            return Ok(DecodedResponse::Empty);
        }
        return serde_json::from_str(body)
            .map(DecodedResponse::Json)
            .map_err(|err| malformed(body, &err));
    }

    if content_type.contains("text/plain") {
        return Ok(DecodedResponse::Text(body.to_string()));
    }

    // Unknown or missing content type: some servers mislabel JSON.
    tracing::debug!(content_type = %content_type, "unexpected content type");
    if body.trim().is_empty() {
        return Ok(DecodedResponse::Empty);
    }
    Ok(serde_json::from_str(body)
        .map(DecodedResponse::Json)
        .unwrap_or_else(|_| DecodedResponse::Text(body.to_string())))
}

/// The `message` field of a JSON error body, when the backend supplied one.
pub fn backend_message(response: &RawResponse) -> Option<String> {
    match serde_json::from_str::<Value>(response.body.trim()) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Extracts a display message from an error response body.
pub fn error_message(response: &RawResponse) -> String {
    let body = response.body.trim();
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Ok(Value::String(message)) => message,
        _ => body.to_string(),
    }
}

fn malformed(body: &str, err: &serde_json::Error) -> ClientError {
    let mut diagnostic = format!("json parse error: {err}");
    let open = body.matches('{').count();
    let close = body.matches('}').count();
    if open != close {
        diagnostic.push_str(&format!(
            "; brace mismatch ({open} opening vs {close} closing)"
        ));
    }

    let preview = preview(body);
    tracing::warn!(%preview, %diagnostic, "malformed json response");
    ClientError::MalformedJson {
        preview,
        diagnostic,
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}
