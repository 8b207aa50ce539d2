//! HTTP gateway for Strata.
//!
//! Exposes the add/cat pipeline over HTTP: multipart upload in, streamed
//! download out, with a liveness probe. The boundary maps the pipeline's
//! error taxonomy onto status classes — bad input (400), absent content
//! (404), failing backend (502) — and never collapses them.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::StrataServer;
pub use state::AppState;
