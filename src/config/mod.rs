//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → owned by the HTTP server for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Allow-list entries are NOT validated here: a malformed entry
//!   degrades to a per-entry warning at guard construction, never a
//!   startup failure

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ServerConfig;
