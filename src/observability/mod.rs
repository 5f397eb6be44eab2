//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine / queue / registry produce:
//!     → logging.rs (structured events inside a per-transition span)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Prometheus text rendered by the CLI
//! ```
//!
//! # Design Decisions
//! - Every transition carries a UUID `transition_id` on its span
//! - Metrics are cheap facade calls; nothing is recorded without a recorder

pub mod logging;
pub mod metrics;
