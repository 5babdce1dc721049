//! Admin API request handlers.

pub mod mappings;
pub mod system;
