//! Metric storage and the scrape endpoint that exposes it.

pub mod server;
pub mod store;

pub use store::{GaugeUpdate, MetricStore, SeasonGauge};
