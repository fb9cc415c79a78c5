//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http/middleware/ip_restriction.rs extracts the peer address
//!     → access_guard.rs decides allowed / denied
//!     → denied requests are rejected before any handler runs
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any ambiguity (missing, empty, unparseable)
//! - Denial is a normal boolean outcome, not an error
//! - No trust in client input

pub mod access_guard;

pub use access_guard::AccessGuard;
