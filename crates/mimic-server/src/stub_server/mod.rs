//! The stub listener.
//!
//! Every request arriving on the stub port is answered from the mapping store:
//! - `StubDispatcher`: normalizes, matches and renders one request
//! - `StubServer`: the accept loop serving connections with the dispatcher

mod dispatcher;
mod server;

pub use dispatcher::{describe, StubDispatcher};
pub use server::StubServer;
