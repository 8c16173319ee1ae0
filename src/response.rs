//! Standard response envelope: result, success flag, and request info.

use crate::error::ClientError;
use crate::transport::{TransportResponse, JSON_CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Request metadata reported by the backend. Paginated listings also carry
/// page counters; anything else the backend adds is kept in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseInfo {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub session: Option<String>,
    pub page: Option<u64>,
    pub total_pages: Option<u64>,
    pub total_results: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoded backend envelope. `success: false` is data, not an error; unknown
/// fields pass through unmodified.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub info: ResponseInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    /// Session id carried by a session-acquire envelope.
    pub fn session_id(&self) -> Option<&str> {
        self.result.get("session_id").and_then(Value::as_str)
    }

    /// Decode a raw transport response, enforcing the structured-data content
    /// type. A mismatch means the backend contract was broken.
    pub(crate) fn from_transport(raw: &TransportResponse) -> Result<Self, ClientError> {
        let media_type = raw
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
        if media_type.as_deref() != Some(JSON_CONTENT_TYPE) {
            return Err(ClientError::Protocol(format!(
                "expected '{JSON_CONTENT_TYPE}' response, got '{}'",
                media_type.as_deref().unwrap_or("none")
            )));
        }
        Ok(serde_json::from_str(&raw.body)?)
    }
}
