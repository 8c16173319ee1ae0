//! Top-level client: a registry root with the session module pre-wired.

use crate::collection::Collection;
use crate::error::RegistryError;
use crate::registry::{ApiModule, Endpoint, ResourceNode};
use crate::service::{RequestService, SessionService};
use crate::transport::{HttpTransport, Transport};
use reqwest::Method;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Name under which the built-in session module is registered.
pub const SESSION_MODULE: &str = "session";

/// Declarative API client rooted at a base URL. All registered collections
/// share one transport, one orchestrator, and one session service, so an
/// explicit session id can batch calls across collections transactionally.
pub struct Client {
    base_url: String,
    core: Arc<RequestService>,
    sessions: Arc<SessionService>,
    root: ResourceNode,
    collections: HashMap<String, Arc<Collection>>,
}

impl Client {
    /// Client over the default reqwest transport.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(HttpTransport::new()))
    }

    /// Client over a caller-supplied transport (custom auth, tests).
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let sessions = Arc::new(SessionService::new(&base_url, transport.clone()));
        let core = Arc::new(RequestService::new(transport, sessions.clone()));
        let mut root = ResourceNode::new(base_url.clone(), core.clone());
        // Fresh node, constant valid name: the unchecked attach cannot collide.
        root.attach_module(SESSION_MODULE, sessions.clone());
        Self {
            base_url,
            core,
            sessions,
            root,
            collections: HashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared session service, for caller-managed explicit sessions.
    pub fn sessions(&self) -> &Arc<SessionService> {
        &self.sessions
    }

    /// The shared request orchestrator, for building custom nodes and
    /// modules that invoke through this client's session lifecycle.
    pub fn core(&self) -> &Arc<RequestService> {
        &self.core
    }

    /// Construct a generic CRUD collection rooted at `path` (default
    /// `/{name}`) and register it on the root node.
    pub fn add_general_module(
        &mut self,
        name: &str,
        path: Option<&str>,
    ) -> Result<Arc<Collection>, RegistryError> {
        let path = match path {
            Some(p) => p.to_string(),
            None => format!("/{name}"),
        };
        let collection = Arc::new(Collection::new(
            name,
            format!("{}{}", self.base_url, path),
            self.core.clone(),
        ));
        self.root.register_module(name, collection.clone())?;
        self.collections.insert(name.to_string(), collection.clone());
        Ok(collection)
    }

    /// Typed accessor for a collection registered via `add_general_module`.
    pub fn collection(&self, name: &str) -> Option<&Arc<Collection>> {
        self.collections.get(name)
    }

    /// Register a single-operation endpoint on the root node.
    pub fn register_endpoint(
        &mut self,
        name: &str,
        path: Option<&str>,
        method: Method,
    ) -> Result<Arc<Endpoint>, RegistryError> {
        self.root.register_endpoint(name, path, method)
    }

    /// Attach a pre-built module on the root node.
    pub fn register_module(
        &mut self,
        name: &str,
        module: Arc<dyn ApiModule>,
    ) -> Result<(), RegistryError> {
        self.root.register_module(name, module)
    }

    pub fn root(&self) -> &ResourceNode {
        &self.root
    }

    /// Flattened action directory of everything registered on this client.
    pub fn actions(&self) -> &BTreeMap<String, String> {
        self.root.action_map()
    }
}
