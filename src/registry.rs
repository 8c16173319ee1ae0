//! Resource registry: named endpoints and sub-modules on a navigable node.

use crate::args::ArgMap;
use crate::error::{ClientError, RegistryError};
use crate::response::ApiResponse;
use crate::service::RequestService;
use reqwest::Method;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Structural contract for anything registrable as a sub-resource: a base
/// path plus a discoverable action map. Enforced as a trait bound, so an
/// object that compiles is a valid module.
pub trait ApiModule: Send + Sync {
    fn base_path(&self) -> &str;
    /// Action name to canonical URL template pairs, for discovery and
    /// documentation.
    fn actions(&self) -> Vec<(String, String)>;
}

/// A single registered operation: fixed URL and verb, invoked through the
/// shared orchestrator. The descriptor itself never mutates.
pub struct Endpoint {
    name: String,
    url: String,
    method: Method,
    core: Arc<RequestService>,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl Endpoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub async fn call(
        &self,
        args: ArgMap,
        session: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.core
            .perform(&self.url, self.method.clone(), args, session)
            .await
    }
}

/// A registered entry: a callable endpoint or a nested module.
pub enum Entry {
    Endpoint(Arc<Endpoint>),
    Module(Arc<dyn ApiModule>),
}

/// Namespace node holding uniquely named entries under a base path. Shape is
/// fixed once client setup finishes; reads need no locking.
pub struct ResourceNode {
    base_path: String,
    core: Arc<RequestService>,
    entries: HashMap<String, Entry>,
    actions: BTreeMap<String, String>,
}

impl ResourceNode {
    /// Empty node rooted at `base_path`, invoking through the given
    /// orchestrator (see `Client::core` for the shared handle).
    pub fn new(base_path: impl Into<String>, core: Arc<RequestService>) -> Self {
        Self {
            base_path: base_path.into(),
            core,
            entries: HashMap::new(),
            actions: BTreeMap::new(),
        }
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Flattened action directory: entry names (and dotted module actions)
    /// mapped to canonical URL templates.
    pub fn action_map(&self) -> &BTreeMap<String, String> {
        &self.actions
    }

    /// Register an entry under `name`. A duplicate registration fails and
    /// leaves the existing entry intact.
    pub fn register(&mut self, name: &str, entry: Entry) -> Result<(), RegistryError> {
        validate_name(name)?;
        if self.entries.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        match entry {
            Entry::Endpoint(endpoint) => {
                self.actions.insert(name.to_string(), endpoint.url().to_string());
                self.entries.insert(name.to_string(), Entry::Endpoint(endpoint));
            }
            Entry::Module(module) => self.attach_module(name, module),
        }
        Ok(())
    }

    /// Build and register a single-operation endpoint bound to
    /// `base_path + path`, defaulting `path` to `/{name}`.
    pub fn register_endpoint(
        &mut self,
        name: &str,
        path: Option<&str>,
        method: Method,
    ) -> Result<Arc<Endpoint>, RegistryError> {
        let path = match path {
            Some(p) => p.to_string(),
            None => format!("/{name}"),
        };
        let endpoint = Arc::new(Endpoint {
            name: name.to_string(),
            url: format!("{}{}", self.base_path, path),
            method,
            core: self.core.clone(),
        });
        self.register(name, Entry::Endpoint(endpoint.clone()))?;
        Ok(endpoint)
    }

    /// Attach a pre-built module under `name`.
    pub fn register_module(
        &mut self,
        name: &str,
        module: Arc<dyn ApiModule>,
    ) -> Result<(), RegistryError> {
        self.register(name, Entry::Module(module))
    }

    /// Insert a module without the name checks. Callers must pass a fresh,
    /// valid name; used for the built-in session module at construction.
    pub(crate) fn attach_module(&mut self, name: &str, module: Arc<dyn ApiModule>) {
        self.actions
            .insert(name.to_string(), module.base_path().to_string());
        for (action, template) in module.actions() {
            self.actions.insert(format!("{name}.{action}"), template);
        }
        self.entries.insert(name.to_string(), Entry::Module(module));
    }
}

impl ApiModule for ResourceNode {
    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn actions(&self) -> Vec<(String, String)> {
        self.actions
            .iter()
            .map(|(name, url)| (name.clone(), url.clone()))
            .collect()
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SessionService;
    use crate::transport::mock::MockTransport;

    fn node() -> ResourceNode {
        let transport = Arc::new(MockTransport::new());
        let sessions = Arc::new(SessionService::new("http://api.test/v1", transport.clone()));
        let core = Arc::new(RequestService::new(transport, sessions));
        ResourceNode::new("http://api.test/v1", core)
    }

    #[test]
    fn endpoint_path_defaults_to_its_name() {
        let mut root = node();
        let endpoint = root
            .register_endpoint("reports", None, Method::GET)
            .unwrap();
        assert_eq!(endpoint.url(), "http://api.test/v1/reports");
        assert_eq!(endpoint.name(), "reports");
        assert_eq!(
            root.action_map().get("reports"),
            Some(&"http://api.test/v1/reports".to_string())
        );
    }

    #[test]
    fn explicit_path_and_method_are_honored() {
        let mut root = node();
        let endpoint = root
            .register_endpoint("purge", Some("/admin/purge"), Method::DELETE)
            .unwrap();
        assert_eq!(endpoint.url(), "http://api.test/v1/admin/purge");
        assert_eq!(endpoint.method(), &Method::DELETE);
    }

    #[test]
    fn whitespace_names_are_rejected() {
        let mut root = node();
        let err = root
            .register_endpoint("bad name", None, Method::GET)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName(_)));
        let err = root.register_endpoint("", None, Method::GET).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName(_)));
    }

    #[test]
    fn duplicate_registration_fails_and_keeps_the_first() {
        let mut root = node();
        root.register_endpoint("reports", None, Method::GET).unwrap();
        let err = root
            .register_endpoint("reports", Some("/other"), Method::POST)
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(_)));
        assert_eq!(
            root.action_map().get("reports"),
            Some(&"http://api.test/v1/reports".to_string()),
            "first registration must stay intact"
        );
        assert!(matches!(root.entry("reports"), Some(Entry::Endpoint(_))));
    }

    #[test]
    fn module_actions_are_recorded_with_dotted_names() {
        let mut root = node();
        let mut nested = node();
        nested
            .register_endpoint("summary", None, Method::GET)
            .unwrap();
        root.register_module("stats", Arc::new(nested)).unwrap();

        assert_eq!(
            root.action_map().get("stats"),
            Some(&"http://api.test/v1".to_string())
        );
        assert_eq!(
            root.action_map().get("stats.summary"),
            Some(&"http://api.test/v1/summary".to_string())
        );
        assert!(matches!(root.entry("stats"), Some(Entry::Module(_))));
    }
}
