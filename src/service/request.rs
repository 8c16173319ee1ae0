//! Request orchestration: session lifecycle wrapped around every call.

use crate::args::{partition, to_query_pairs, ArgMap, SESSION_KEY};
use crate::error::ClientError;
use crate::response::ApiResponse;
use crate::service::SessionService;
use crate::transport::Transport;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// Executes one logical request inside a backend session. When the caller
/// supplies no session, a temporary one is opened for the call and settled
/// (committed on success, rolled back on failure) before the call returns.
pub struct RequestService {
    transport: Arc<dyn Transport>,
    sessions: Arc<SessionService>,
}

impl RequestService {
    pub(crate) fn new(transport: Arc<dyn Transport>, sessions: Arc<SessionService>) -> Self {
        Self {
            transport,
            sessions,
        }
    }

    /// Perform a request against `url`. For GET the whole bag travels as
    /// query parameters; for every other verb control arguments go on the
    /// query string and model arguments form the JSON body. Backend-reported
    /// failure (`success: false`) is returned as data, never as `Err`.
    pub async fn perform(
        &self,
        url: &str,
        method: Method,
        mut args: ArgMap,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        if args.contains_key(SESSION_KEY) {
            return Err(ClientError::ReservedKey(SESSION_KEY));
        }

        // Caller-supplied sessions persist across calls and are never settled
        // here; a missing session means this call owns the full lifecycle.
        let (session_id, temporary) = match session {
            Some(id) => (id.to_string(), false),
            None => (self.sessions.acquire().await?, true),
        };
        args.insert(SESSION_KEY.to_string(), Value::String(session_id.clone()));

        let (query, body) = if method == Method::GET {
            (to_query_pairs(&args), None)
        } else {
            let (control, model) = partition(args);
            (to_query_pairs(&control), Some(model))
        };

        tracing::debug!(%method, url, session = %session_id, temporary, "performing request");
        let raw = self
            .transport
            .send(url, method, &query, body.as_ref())
            .await?;

        match ApiResponse::from_transport(&raw) {
            Ok(envelope) => {
                if temporary {
                    self.finalize(&session_id, envelope.success).await?;
                }
                Ok(envelope)
            }
            Err(err) => {
                // The main call completed, so a temporary session must still
                // be released even though its response was unusable.
                if temporary {
                    if let Err(rollback_err) = self.sessions.rollback(&session_id, true).await {
                        tracing::warn!(
                            session = %session_id,
                            error = %rollback_err,
                            "rollback after undecodable response failed"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    async fn finalize(&self, session: &str, success: bool) -> Result<(), ClientError> {
        let outcome = if success {
            self.sessions.commit(session).await?
        } else {
            self.sessions.rollback(session, true).await?
        };
        if !outcome.success {
            tracing::warn!(session, "session finalize reported failure");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    fn service(transport: &Arc<MockTransport>) -> RequestService {
        let sessions = Arc::new(SessionService::new("http://api.test/v1", transport.clone()));
        RequestService::new(transport.clone(), sessions)
    }

    fn bag(entries: &[(&str, Value)]) -> ArgMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn temporary_session_commits_on_success() {
        let transport = Arc::new(MockTransport::new());
        transport.push_session("tmp-1");
        transport.push_success(json!([{"id": 1}]));
        transport.push_success(json!({}));

        let resp = service(&transport)
            .perform("http://api.test/v1/books/", Method::GET, ArgMap::new(), None)
            .await
            .unwrap();

        assert!(resp.success);
        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].url, "http://api.test/v1/session/new");
        assert_eq!(calls[1].url, "http://api.test/v1/books/");
        assert!(calls[1]
            .query
            .contains(&("_session".to_string(), "tmp-1".to_string())));
        assert_eq!(calls[2].url, "http://api.test/v1/session/save/tmp-1");
    }

    #[tokio::test]
    async fn temporary_session_rolls_back_on_reported_failure() {
        let transport = Arc::new(MockTransport::new());
        transport.push_session("tmp-2");
        transport.push_failure("constraint violated");
        transport.push_success(json!({}));

        let resp = service(&transport)
            .perform("http://api.test/v1/books/", Method::POST, bag(&[("title", json!("x"))]), None)
            .await
            .unwrap();

        assert!(!resp.success);
        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].url, "http://api.test/v1/session/rollback/tmp-2");
        assert!(calls[2]
            .query
            .contains(&("close".to_string(), "y".to_string())));
    }

    #[tokio::test]
    async fn explicit_session_is_never_finalized() {
        let transport = Arc::new(MockTransport::new());
        transport.push_success(json!([]));

        let resp = service(&transport)
            .perform(
                "http://api.test/v1/books/",
                Method::GET,
                ArgMap::new(),
                Some("caller-owned"),
            )
            .await
            .unwrap();

        assert!(resp.success);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1, "no acquire, no commit, no rollback");
        assert!(calls[0]
            .query
            .contains(&("_session".to_string(), "caller-owned".to_string())));
    }

    #[tokio::test]
    async fn explicit_session_failure_is_returned_without_rollback() {
        let transport = Arc::new(MockTransport::new());
        transport.push_failure("nope");

        let resp = service(&transport)
            .perform(
                "http://api.test/v1/books/",
                Method::DELETE,
                ArgMap::new(),
                Some("caller-owned"),
            )
            .await
            .unwrap();

        assert!(!resp.success);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn reserved_key_is_rejected_before_any_network_activity() {
        let transport = Arc::new(MockTransport::new());

        let err = service(&transport)
            .perform(
                "http://api.test/v1/books/",
                Method::POST,
                bag(&[("_session", json!("x")), ("name", json!("a"))]),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ReservedKey("_session")));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn get_sends_the_whole_bag_as_query_parameters() {
        let transport = Arc::new(MockTransport::new());
        transport.push_success(json!([]));

        service(&transport)
            .perform(
                "http://api.test/v1/books/",
                Method::GET,
                bag(&[("author", json!("Le Guin")), ("_page", json!(3))]),
                Some("s-1"),
            )
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(
            calls[0].query,
            vec![
                ("_page".to_string(), "3".to_string()),
                ("_session".to_string(), "s-1".to_string()),
                ("author".to_string(), "Le Guin".to_string()),
            ]
        );
        assert!(calls[0].body.is_none());
    }

    #[tokio::test]
    async fn post_splits_control_query_from_model_body() {
        let transport = Arc::new(MockTransport::new());
        transport.push_success(json!({}));

        service(&transport)
            .perform(
                "http://api.test/v1/books/",
                Method::POST,
                bag(&[("title", json!("Dune")), ("_page", json!(3))]),
                Some("s-2"),
            )
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(
            calls[0].query,
            vec![
                ("_page".to_string(), "3".to_string()),
                ("_session".to_string(), "s-2".to_string()),
            ]
        );
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body["title"], json!("Dune"));
    }

    #[tokio::test]
    async fn content_type_mismatch_still_rolls_back_a_temporary_session() {
        let transport = Arc::new(MockTransport::new());
        transport.push_session("tmp-9");
        transport.push_raw(Some("text/html"), "<html></html>");
        transport.push_success(json!({}));

        let err = service(&transport)
            .perform("http://api.test/v1/books/", Method::GET, ArgMap::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Protocol(_)));
        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].url, "http://api.test/v1/session/rollback/tmp-9");
    }

    #[tokio::test]
    async fn malformed_body_still_rolls_back_a_temporary_session() {
        let transport = Arc::new(MockTransport::new());
        transport.push_session("tmp-10");
        transport.push_raw(Some(crate::transport::JSON_CONTENT_TYPE), "not json at all");
        transport.push_success(json!({}));

        let err = service(&transport)
            .perform("http://api.test/v1/books/", Method::GET, ArgMap::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(
            transport.calls()[2].url,
            "http://api.test/v1/session/rollback/tmp-10"
        );
    }
}
