//! Admin REST API for mapping management.
//!
//! This module provides the administrative endpoints under `/__admin`:
//! - Registering, listing and resetting mappings
//! - Health and metrics endpoints
//!
//! The API listens on its own port (default: 8070), separate from stub traffic.

mod handlers;
mod router;
mod server;
mod types;

pub use server::AdminApiServer;
pub use types::{ErrorResponse, MappingCreated, MappingSummary};
