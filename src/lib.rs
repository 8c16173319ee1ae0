//! Transact client: declarative session-transactional REST client library.

pub mod args;
pub mod client;
pub mod collection;
pub mod error;
pub mod registry;
pub mod response;
pub mod service;
pub mod transport;

pub use args::{partition, to_query_pairs, ArgMap, DEFAULT_PAGE_LENGTH, MAX_PAGE_LENGTH};
pub use client::{Client, SESSION_MODULE};
pub use collection::{Collection, ListQuery};
pub use error::{ClientError, RegistryError};
pub use registry::{ApiModule, Endpoint, Entry, ResourceNode};
pub use response::{ApiResponse, ResponseInfo};
pub use service::{RequestService, SessionService};
pub use transport::{HttpTransport, Transport, TransportResponse, API_KEY_HEADER};
