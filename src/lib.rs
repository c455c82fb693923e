//! Avocado Charts - avocado sales aggregation & static chart generation
//!
//! Loads the avocado sales table, groups it into per-date, per-region,
//! per-month and per-type summaries, and renders each summary as a chart.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;
