//! Generic CRUD collection: list, detail, create, read, update, delete.

use crate::args::{
    ArgMap, DEFAULT_PAGE_LENGTH, MAX_PAGE_LENGTH, PAGE_KEY, PAGE_LENGTH_KEY, QUERY_KEY,
    SORT_BY_KEY,
};
use crate::error::ClientError;
use crate::registry::ApiModule;
use crate::response::ApiResponse;
use crate::service::RequestService;
use reqwest::Method;
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;

/// Pagination, sorting, and free-text match controls for listing calls.
#[derive(Clone, Debug)]
pub struct ListQuery {
    pub page: u32,
    pub page_length: u32,
    /// Record attribute to sort by; must exist on the backend model.
    pub sort_by: String,
    /// When set, requires a substring match in any model attribute.
    pub match_text: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_length: DEFAULT_PAGE_LENGTH,
            sort_by: "id".to_string(),
            match_text: None,
        }
    }
}

/// Uniform client for one backend collection resource. CRUD and pagination
/// semantics are expressed once here and reused per collection instance; the
/// orchestrator handle is injected at construction and shared across all
/// collections of a client.
pub struct Collection {
    name: String,
    base_url: String,
    core: Arc<RequestService>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Collection {
    pub(crate) fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        core: Arc<RequestService>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            core,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch a page of record identifiers.
    pub async fn list_ids(
        &self,
        args: ArgMap,
        query: &ListQuery,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.list_at(self.root_url(), args, query, session).await
    }

    /// Fetch a page of full records from the `/details` sub-path.
    pub async fn list_details(
        &self,
        args: ArgMap,
        query: &ListQuery,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.list_at(format!("{}/details", self.base_url), args, query, session)
            .await
    }

    /// Create a record from model fields.
    pub async fn create(
        &self,
        args: ArgMap,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.core
            .perform(&self.root_url(), Method::POST, args, session)
            .await
    }

    /// Fetch one record by id.
    pub async fn read(
        &self,
        id: impl Display,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let id = self.require_id(id, "read")?;
        self.core
            .perform(&self.record_url(&id), Method::GET, ArgMap::new(), session)
            .await
    }

    /// Update one record's model fields.
    pub async fn update(
        &self,
        id: impl Display,
        args: ArgMap,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let id = self.require_id(id, "update")?;
        self.core
            .perform(&self.record_url(&id), Method::POST, args, session)
            .await
    }

    /// Delete one record by id.
    pub async fn delete(
        &self,
        id: impl Display,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let id = self.require_id(id, "delete")?;
        self.core
            .perform(&self.record_url(&id), Method::DELETE, ArgMap::new(), session)
            .await
    }

    async fn list_at(
        &self,
        url: String,
        mut args: ArgMap,
        query: &ListQuery,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        args.insert(PAGE_KEY.to_string(), json!(query.page));
        args.insert(
            PAGE_LENGTH_KEY.to_string(),
            json!(query.page_length.min(MAX_PAGE_LENGTH)),
        );
        args.insert(SORT_BY_KEY.to_string(), json!(query.sort_by));
        if let Some(text) = &query.match_text {
            args.insert(QUERY_KEY.to_string(), json!(text));
        }
        self.core.perform(&url, Method::GET, args, session).await
    }

    fn root_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn require_id(&self, id: impl Display, operation: &'static str) -> Result<String, ClientError> {
        let id = id.to_string();
        if id.trim().is_empty() {
            return Err(ClientError::MissingId(operation));
        }
        Ok(id)
    }
}

impl ApiModule for Collection {
    fn base_path(&self) -> &str {
        &self.base_url
    }

    fn actions(&self) -> Vec<(String, String)> {
        vec![
            ("list".to_string(), self.root_url()),
            ("details".to_string(), format!("{}/details", self.base_url)),
            ("create".to_string(), self.root_url()),
            ("read".to_string(), format!("{}/{{id}}", self.base_url)),
            ("update".to_string(), format!("{}/{{id}}", self.base_url)),
            ("delete".to_string(), format!("{}/{{id}}", self.base_url)),
        ]
    }
}
