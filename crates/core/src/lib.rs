//! Core business logic for celula-rs.
//!
//! Services sit between the HTTP layer and the repositories: they apply
//! role checks, validate input, resolve the network/generation/cell
//! hierarchy and run multi-table writes through the cascade repository.

pub mod services;

pub use services::*;
