//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging; request ID flows through all subsystems
//! - Metrics are cheap (atomic increments)
//! - Secrets and derived keys never appear in any event

pub mod logging;
pub mod metrics;
