//! reqwest-backed transport.

use super::{Transport, TransportResponse};
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;

/// Header carrying the backend API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Production transport over a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: None,
        }
    }

    /// Transport that authenticates every request with an `X-API-KEY` header.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: Some(api_key.into()),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        method: Method,
        query: &[(String, String)],
        body: Option<&HashMap<String, Value>>,
    ) -> Result<TransportResponse, ClientError> {
        tracing::debug!(%method, url, "dispatching request");
        let mut request = self.http.request(method, url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(model) = body {
            request = request.json(model);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        tracing::debug!(status, "response received");
        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
