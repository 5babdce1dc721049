//! mimic: an HTTP request-stubbing server.
//!
//! Mappings pair a request pattern with a canned response. They are registered through the
//! admin API (or loaded from a directory at startup) and served on the stub listener, where
//! the most recently registered matching mapping answers each request.

pub mod admin_api;
pub mod config;
pub mod loader;
pub mod mapping;
pub mod metrics;
pub mod server;
pub mod stub_server;

pub use config::ServerConfig;
pub use mapping::{MappingDocument, MappingError, MappingStore};
pub use server::MimicServer;
