//! Stub mappings: registry, request matching and response rendering.
//!
//! This module provides:
//! - `MappingStore`: concurrent append-only registry of mappings
//! - `find_match`: selects the mapping that answers a request (most recent wins)
//! - `render`: turns a match result into a response descriptor
//! - `MappingDocument`: the JSON registration format
//!
//! ## Module Structure
//!
//! - `types`: request patterns, response specs, mappings and errors
//! - `store`: the registry and its snapshots
//! - `matcher`: request descriptors and matching
//! - `render`: response descriptors and rendering
//! - `document`: JSON documents accepted by the admin API and mapping files

mod document;
mod matcher;
mod render;
mod store;
mod types;

pub use document::{
    normalize_url, HeaderMatchDocument, MappingDocument, RequestDocument, ResponseDocument,
};
pub use matcher::{find_match, RequestDescriptor};
pub use render::{render, ResponseDescriptor};
pub use store::{MappingSnapshot, MappingStore};
pub use types::{
    MappingDefinition, MappingError, MappingSpec, RegistrationHandle, RequestMethod,
    RequestPattern, ResponseSpec,
};
