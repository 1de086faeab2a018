//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate construction and evaluation produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (decision counters)
//!
//! Consumers:
//!     → any tracing subscriber installed by the embedder
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits through the `tracing` and `metrics` facades
//! - Subscribers and exporters are installed by binaries, never by gates

pub mod logging;
pub mod metrics;
