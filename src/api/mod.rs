//! HTTP API
//! Mission: External request surface

pub mod error;
pub mod routes;
pub mod tickets;

pub use routes::{create_router, AppState};
