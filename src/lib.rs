//! Text encryption service library.

pub mod config;
pub mod crypto;
pub mod http;
pub mod observability;
pub mod security;

pub use config::schema::ServerConfig;
pub use crypto::CipherService;
pub use http::HttpServer;
pub use security::AccessGuard;
