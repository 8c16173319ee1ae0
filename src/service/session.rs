//! Backend session operations: acquire, commit, rollback.

use crate::error::ClientError;
use crate::registry::ApiModule;
use crate::response::ApiResponse;
use crate::transport::Transport;
use reqwest::Method;
use std::sync::Arc;

/// Client-side face of the backend's `session` sub-resource. Keeps no local
/// bookkeeping: the backend is the sole authority on open sessions, which
/// keeps this service stateless and shareable across collections.
pub struct SessionService {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl SessionService {
    pub(crate) fn new(client_base: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: format!("{client_base}/session"),
            transport,
        }
    }

    /// Open a new backend session and return its id.
    pub async fn acquire(&self) -> Result<String, ClientError> {
        let url = format!("{}/new", self.base_url);
        tracing::debug!(url = %url, "acquiring session");
        let raw = self.transport.send(&url, Method::GET, &[], None).await?;
        let envelope = ApiResponse::from_transport(&raw)?;
        let session_id = envelope.session_id().ok_or_else(|| {
            ClientError::Protocol("acquire response carries no 'result.session_id'".to_string())
        })?;
        Ok(session_id.to_string())
    }

    /// Persist a session's changes and close it.
    pub async fn commit(&self, session: &str) -> Result<ApiResponse, ClientError> {
        let url = format!("{}/save/{session}", self.base_url);
        tracing::debug!(session, "committing session");
        let raw = self.transport.send(&url, Method::GET, &[], None).await?;
        ApiResponse::from_transport(&raw)
    }

    /// Discard a session's changes. `close` controls whether the handle stays
    /// usable afterwards.
    pub async fn rollback(&self, session: &str, close: bool) -> Result<ApiResponse, ClientError> {
        let url = format!("{}/rollback/{session}", self.base_url);
        let close_flag = if close { "y" } else { "n" };
        tracing::debug!(session, close = close_flag, "rolling back session");
        let query = [("close".to_string(), close_flag.to_string())];
        let raw = self.transport.send(&url, Method::GET, &query, None).await?;
        ApiResponse::from_transport(&raw)
    }
}

impl ApiModule for SessionService {
    fn base_path(&self) -> &str {
        &self.base_url
    }

    fn actions(&self) -> Vec<(String, String)> {
        vec![
            ("get".to_string(), format!("{}/new", self.base_url)),
            ("save".to_string(), format!("{}/save/{{session}}", self.base_url)),
            (
                "rollback".to_string(),
                format!("{}/rollback/{{session}}", self.base_url),
            ),
        ]
    }
}
