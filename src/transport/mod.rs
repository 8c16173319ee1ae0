//! Transport seam: one HTTP request in, one structured response out.

mod http;
pub use http::{HttpTransport, API_KEY_HEADER};

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;

/// Content type the backend must declare on every response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw response as seen on the wire. Envelope semantics (the `success` flag)
/// are decided upstream, so a non-2xx status is not an error here.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Performs a single HTTP request. Implementations carry no per-call state
/// and are shared behind an `Arc` across all collections of a client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        method: Method,
        query: &[(String, String)],
        body: Option<&HashMap<String, Value>>,
    ) -> Result<TransportResponse, ClientError>;
}
