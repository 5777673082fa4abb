//! Streaming aggregation of per-request log records.
//!
//! Upstream services emit several independent log lines per request, all
//! tagged with the same correlation key. The [`Aggregator`] buffers those
//! lines per key and folds each request into a single combined record once
//! its completion signal is observed, under a hard bound on resident
//! groups (LRU eviction) and group age (staleness sweep).

pub mod aggregator;
pub mod config;
mod group;
mod lru;
pub mod metrics_defs;
pub mod record;

pub use aggregator::{Aggregator, Decision};
pub use config::AggregatorConfig;
pub use record::Record;
