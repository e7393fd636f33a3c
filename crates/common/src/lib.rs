//! Common utilities and shared types for celula-rs.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Local disk storage for uploads via [`LocalStorage`]
//! - **Tokens**: Opaque session tokens via [`TokenGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use celula_common::{AppResult, Config, TokenGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let token = TokenGenerator::new().generate();
//!     println!("{} -> {}", config.database.url, token);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{LocalStorage, StorageBackend, StoredFile, sanitize_filename, upload_file_name};
pub use token::TokenGenerator;
