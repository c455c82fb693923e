//! Static Chart Renderer
//! Draws the five avocado charts as PNG files with plotters.
//!
//! Charts:
//! 1. Price and demand over time (volume on the left axis, price on the right)
//! 2. Organic vs conventional volume by region (grouped bars)
//! 3. Weighted price by month over season-shaded bands
//! 4. Mean size-category volume, organic vs conventional
//! 5. Size-category volume by region (three bars per region)
//!
//! Categorical axes are drawn on an `f64` coordinate where category `i` is
//! centred on `x = i`.

use crate::charts::style::{
    category_label, format_volume, season_color, size_color, type_color, value_range,
    zero_based_range, FONT, LABEL_SIZE, MONTH_LINE_COLOR, PRICE_COLOR, SEASON_ALPHA, TICK_SIZE,
    TITLE_SIZE, VOLUME_COLOR,
};
use crate::data::{AvocadoType, SizeCategory};
use crate::stats::{DatePoint, MonthPoint, RegionSizeVolume, RegionTypeVolume, SizeByType};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const PRICE_DEMAND_FILE: &str = "price_demand.png";
pub const TYPE_BY_REGION_FILE: &str = "organic_vs_conventional.png";
pub const PRICE_BY_MONTH_FILE: &str = "price_by_month.png";
pub const SIZE_BY_TYPE_FILE: &str = "size_by_type.png";
pub const SIZE_BY_REGION_FILE: &str = "size_by_region.png";

/// Width of one bar in a two-bar group, in category units.
const PAIR_BAR_WIDTH: f64 = 0.35;
/// Width of one bar in a three-bar group, in category units.
const TRIPLE_BAR_WIDTH: f64 = 0.25;
/// Maximum number of date ticks on the time axis.
const MAX_DATE_LABELS: usize = 16;

/// Output location and pixel size for rendered charts.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub out_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("charts"),
            width: 1400,
            height: 700,
        }
    }
}

/// Renders aggregated avocado data into PNG charts.
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    /// Create a renderer, making sure the output directory exists.
    pub fn new(config: ChartConfig) -> Result<Self> {
        fs::create_dir_all(&config.out_dir).with_context(|| {
            format!(
                "failed to create chart directory {}",
                config.out_dir.display()
            )
        })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.out_dir.join(file_name)
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Total volume and weighted average price per date on twin y axes.
    pub fn render_price_demand(&self, points: &[DatePoint]) -> Result<PathBuf> {
        let path = self.output_path(PRICE_DEMAND_FILE);
        let root = BitMapBackend::new(&path, self.size()).into_drawing_area();
        draw_price_demand(root, points)?;
        Self::finish(&path)
    }

    /// Organic vs conventional volume, one bar pair per region.
    pub fn render_type_by_region(&self, regions: &[RegionTypeVolume]) -> Result<PathBuf> {
        let path = self.output_path(TYPE_BY_REGION_FILE);
        let root = BitMapBackend::new(&path, self.size()).into_drawing_area();
        draw_type_by_region(root, regions)?;
        Self::finish(&path)
    }

    /// Weighted price per month over season-colored background bands.
    pub fn render_price_by_month(&self, months: &[MonthPoint]) -> Result<PathBuf> {
        let path = self.output_path(PRICE_BY_MONTH_FILE);
        let root = BitMapBackend::new(&path, self.size()).into_drawing_area();
        draw_price_by_month(root, months)?;
        Self::finish(&path)
    }

    /// Mean size-category volume, organic vs conventional.
    pub fn render_size_by_type(&self, means: &SizeByType) -> Result<PathBuf> {
        let path = self.output_path(SIZE_BY_TYPE_FILE);
        let root = BitMapBackend::new(&path, self.size()).into_drawing_area();
        draw_size_by_type(root, means)?;
        Self::finish(&path)
    }

    /// Size-category volume per region, three bars per region.
    pub fn render_size_by_region(&self, regions: &[RegionSizeVolume]) -> Result<PathBuf> {
        let path = self.output_path(SIZE_BY_REGION_FILE);
        let root = BitMapBackend::new(&path, self.size()).into_drawing_area();
        draw_size_by_region(root, regions)?;
        Self::finish(&path)
    }

    fn finish(path: &Path) -> Result<PathBuf> {
        info!(path = %path.display(), "chart written");
        Ok(path.to_path_buf())
    }
}

/// Category axis running from half a slot before the first category to half
/// a slot after the last.
fn category_axis(count: usize) -> std::ops::Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

fn draw_price_demand<DB>(root: DrawingArea<DB, Shift>, points: &[DatePoint]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let labels: Vec<String> = points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();
    let volumes: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.total_volume))
        .collect();
    // Dates without any volume have no defined price
    let prices: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.weighted_price.map(|price| (i as f64, price)))
        .collect();

    let x_range = category_axis(points.len());
    let (_, volume_max) = zero_based_range(volumes.iter().map(|(_, v)| *v));
    let (price_min, price_max) = value_range(prices.iter().map(|(_, p)| *p), 0.1);
    debug!(dates = points.len(), volume_max, price_min, price_max, "price/demand ranges");

    let mut chart = ChartBuilder::on(&root)
        .caption("Avocado Price and Demand Over Time", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), 0.0..volume_max)?
        .set_secondary_coord(x_range, price_min..price_max);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().min(MAX_DATE_LABELS))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style((FONT, TICK_SIZE).into_font().transform(FontTransform::Rotate90))
        .x_desc("Date")
        .y_desc("Total Volume")
        .y_label_formatter(&|v| format_volume(*v))
        .axis_desc_style((FONT, LABEL_SIZE))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Weighted Average Price")
        .y_label_formatter(&|v| format!("{:.2}", v))
        .draw()?;

    chart
        .draw_series(LineSeries::new(volumes, VOLUME_COLOR.stroke_width(2)))?
        .label("Total Volume")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], VOLUME_COLOR));

    chart
        .draw_secondary_series(LineSeries::new(prices, PRICE_COLOR.stroke_width(2)))?
        .label("Average Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PRICE_COLOR));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_type_by_region<DB>(root: DrawingArea<DB, Shift>, regions: &[RegionTypeVolume]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let labels: Vec<String> = regions.iter().map(|r| r.region.clone()).collect();
    let (_, y_max) = zero_based_range(
        regions
            .iter()
            .flat_map(|r| [r.organic, r.conventional]),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Organic vs Conventional Avocado Volumes by Region",
            (FONT, TITLE_SIZE),
        )
        .margin(20)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(regions.len()), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style((FONT, TICK_SIZE).into_font().transform(FontTransform::Rotate90))
        .x_desc("Region")
        .y_desc("Total Volume")
        .y_label_formatter(&|v| format_volume(*v))
        .axis_desc_style((FONT, LABEL_SIZE))
        .draw()?;

    for (offset, avocado_type) in [(-0.5, AvocadoType::Organic), (0.5, AvocadoType::Conventional)] {
        let color = type_color(avocado_type);
        chart
            .draw_series(regions.iter().enumerate().map(|(i, r)| {
                let value = match avocado_type {
                    AvocadoType::Organic => r.organic,
                    AvocadoType::Conventional => r.conventional,
                };
                bar(i as f64 + offset * PAIR_BAR_WIDTH, PAIR_BAR_WIDTH, value, color)
            }))?
            .label(avocado_type.label())
            .legend(move |(x, y)| legend_swatch(x, y, color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_price_by_month<DB>(root: DrawingArea<DB, Shift>, months: &[MonthPoint]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let labels: Vec<String> = months.iter().map(|m| m.month.to_string()).collect();
    let prices: Vec<(f64, f64)> = months
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.weighted_price.map(|price| (i as f64, price)))
        .collect();
    let (y_min, y_max) = value_range(prices.iter().map(|(_, p)| *p), 0.1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Weighted Average Avocado Price by Month", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(70)
        .build_cartesian_2d(category_axis(months.len()), y_min..y_max)?;

    // Season bands go under the mesh and the line
    chart.draw_series(months.iter().enumerate().map(|(i, m)| {
        let x = i as f64;
        Rectangle::new(
            [(x - 0.5, y_min), (x + 0.5, y_max)],
            season_color(m.season).mix(SEASON_ALPHA).filled(),
        )
    }))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style((FONT, TICK_SIZE).into_font().transform(FontTransform::Rotate90))
        .x_desc("Month")
        .y_desc("Weighted Average Price")
        .y_label_formatter(&|v| format!("{:.2}", v))
        .axis_desc_style((FONT, LABEL_SIZE))
        .draw()?;

    chart.draw_series(LineSeries::new(
        prices.iter().copied(),
        MONTH_LINE_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        prices
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, MONTH_LINE_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_size_by_type<DB>(root: DrawingArea<DB, Shift>, means: &SizeByType) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let labels: Vec<String> = SizeCategory::ALL
        .iter()
        .map(|s| s.label().to_string())
        .collect();
    let (_, y_max) = zero_based_range(
        [means.organic, means.conventional]
            .into_iter()
            .flatten()
            .flat_map(|sizes| sizes.as_array()),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Average Avocado Size Volume: Organic vs Conventional",
            (FONT, TITLE_SIZE),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(labels.len()), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_desc("Avocado Size")
        .y_desc("Average Volume")
        .y_label_formatter(&|v| format_volume(*v))
        .axis_desc_style((FONT, LABEL_SIZE))
        .draw()?;

    for (offset, avocado_type) in [(-0.5, AvocadoType::Organic), (0.5, AvocadoType::Conventional)] {
        // An empty partition has no mean; its bars are simply left out
        let Some(sizes) = means.get(avocado_type).copied() else {
            debug!(kind = avocado_type.label(), "no records for type, skipping bars");
            continue;
        };
        let color = type_color(avocado_type);
        chart
            .draw_series(SizeCategory::ALL.iter().enumerate().map(|(i, size)| {
                bar(
                    i as f64 + offset * PAIR_BAR_WIDTH,
                    PAIR_BAR_WIDTH,
                    sizes.get(*size),
                    color,
                )
            }))?
            .label(avocado_type.label())
            .legend(move |(x, y)| legend_swatch(x, y, color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_size_by_region<DB>(root: DrawingArea<DB, Shift>, regions: &[RegionSizeVolume]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let labels: Vec<String> = regions.iter().map(|r| r.region.clone()).collect();
    let (_, y_max) = zero_based_range(regions.iter().flat_map(|r| r.sizes.as_array()));

    let mut chart = ChartBuilder::on(&root)
        .caption("Total Avocado Sales by Size and Region", (FONT, TITLE_SIZE))
        .margin(20)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(regions.len()), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style((FONT, TICK_SIZE).into_font().transform(FontTransform::Rotate90))
        .x_desc("Region")
        .y_desc("Total Volume Sold")
        .y_label_formatter(&|v| format_volume(*v))
        .axis_desc_style((FONT, LABEL_SIZE))
        .draw()?;

    let slots = SizeCategory::ALL.len() as f64;
    for (slot, size) in SizeCategory::ALL.iter().enumerate() {
        let color = size_color(*size);
        // Bars of one region are laid out left to right around its centre
        let offset = slot as f64 - (slots - 1.0) / 2.0;
        chart
            .draw_series(regions.iter().enumerate().map(|(i, r)| {
                bar(
                    i as f64 + offset * TRIPLE_BAR_WIDTH,
                    TRIPLE_BAR_WIDTH,
                    r.sizes.get(*size),
                    color,
                )
            }))?
            .label(size.label())
            .legend(move |(x, y)| legend_swatch(x, y, color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Bar of the given width centred on `center`, rising from zero.
fn bar(center: f64, width: f64, value: f64, color: RGBColor) -> Rectangle<(f64, f64)> {
    let half = width / 2.0;
    Rectangle::new([(center - half, 0.0), (center + half, value)], color.filled())
}

fn legend_swatch(x: i32, y: i32, color: RGBColor) -> Rectangle<(i32, i32)> {
    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
}
