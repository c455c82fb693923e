//! Pipeline Module
//! Load records once, aggregate, render every chart and optionally write the summary.

use crate::charts::ChartRenderer;
use crate::config::Config;
use crate::data::RecordLoader;
use crate::report::{write_summary, Summary};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, info_span, warn};

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub record_count: usize,
    pub charts: Vec<PathBuf>,
    pub summary: Option<PathBuf>,
}

/// Execute one full analysis run.
pub fn run(config: &Config) -> Result<RunReport> {
    let records = info_span!("load", input = %config.input.display()).in_scope(|| {
        RecordLoader::new()
            .with_separator(config.separator)
            .load(&config.input)
            .with_context(|| format!("failed to load {}", config.input.display()))
    })?;

    let summary = info_span!("aggregate").in_scope(|| Summary::from_records(&records));

    let charts = info_span!("render", out_dir = %config.charts.out_dir.display())
        .in_scope(|| render_all(config, &summary))?;

    if let Some(path) = &config.summary {
        write_summary(path, &summary)?;
    }

    if config.open {
        for chart in &charts {
            // A missing viewer should not fail a run whose charts are already on disk
            if let Err(err) = open::that(chart) {
                warn!(path = %chart.display(), error = %err, "could not open chart");
            }
        }
    }

    info!(records = records.len(), charts = charts.len(), "run complete");
    Ok(RunReport {
        record_count: records.len(),
        charts,
        summary: config.summary.clone(),
    })
}

fn render_all(config: &Config, summary: &Summary) -> Result<Vec<PathBuf>> {
    let renderer = ChartRenderer::new(config.charts.clone())?;
    Ok(vec![
        renderer.render_price_demand(&summary.volume_price_by_date)?,
        renderer.render_type_by_region(&summary.type_volume_by_region)?,
        renderer.render_price_by_month(&summary.price_by_month)?,
        renderer.render_size_by_type(&summary.mean_size_by_type)?,
        renderer.render_size_by_region(&summary.size_volume_by_region)?,
    ])
}
