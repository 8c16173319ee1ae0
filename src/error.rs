//! Typed errors for registration and request execution.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("invalid resource name '{0}': names must be non-empty and contain no whitespace")]
    InvalidName(String),
    #[error("duplicate resource name '{0}': already registered on this node")]
    DuplicateName(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// Caller put the reserved session key inside the argument bag.
    #[error("reserved argument '{0}': pass the session through the session parameter")]
    ReservedKey(&'static str),
    /// Record operations require a non-blank id before any request is issued.
    #[error("missing record id for {0}")]
    MissingId(&'static str),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The backend broke the wire contract (wrong content type, bad acquire envelope).
    #[error("protocol violation: {0}")]
    Protocol(String),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}
