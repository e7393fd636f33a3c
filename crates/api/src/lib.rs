//! HTTP API layer for celula-rs.
//!
//! - **Endpoints**: JSON resources under `/api` for members, the
//!   network/generation/cell hierarchy, events, announcements, comments,
//!   stories, prayer requests, testimonies, meetings and the catalogs
//! - **Extractors**: Authenticated member resolved from the bearer token
//! - **Middleware**: Token authentication and shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
