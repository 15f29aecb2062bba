//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields)
//!     → metrics.rs (counters, histograms)
//!
//! Each dispatch runs inside a `dispatch` span carrying a navigation id,
//! so late output from a superseded navigation can be told apart.
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
