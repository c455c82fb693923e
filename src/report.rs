//! Summary Report Module
//! Serializes every aggregate of a run into one JSON document.

use crate::data::Record;
use crate::stats::{
    DatePoint, MonthPoint, RegionSizeVolume, RegionTypeVolume, SalesAggregator, SizeByType,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// All chart inputs computed from one record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub record_count: usize,
    pub volume_price_by_date: Vec<DatePoint>,
    pub type_volume_by_region: Vec<RegionTypeVolume>,
    pub price_by_month: Vec<MonthPoint>,
    pub mean_size_by_type: SizeByType,
    pub size_volume_by_region: Vec<RegionSizeVolume>,
}

impl Summary {
    /// Run every aggregator over the records.
    pub fn from_records(records: &[Record]) -> Self {
        let summary = Self {
            record_count: records.len(),
            volume_price_by_date: SalesAggregator::volume_price_by_date(records),
            type_volume_by_region: SalesAggregator::type_volume_by_region(records),
            price_by_month: SalesAggregator::price_by_month(records),
            mean_size_by_type: SalesAggregator::mean_size_by_type(records),
            size_volume_by_region: SalesAggregator::size_volume_by_region(records),
        };
        debug!(
            dates = summary.volume_price_by_date.len(),
            regions = summary.type_volume_by_region.len(),
            months = summary.price_by_month.len(),
            "aggregates computed"
        );
        summary
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "summary written");
    Ok(())
}
