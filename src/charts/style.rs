//! Chart Style Module
//! Colors, fonts and axis label helpers shared by the chart renderers.

use crate::data::{AvocadoType, SizeCategory};
use crate::stats::Season;
use plotters::style::RGBColor;

pub const FONT: &str = "sans-serif";
pub const TITLE_SIZE: i32 = 26;
pub const LABEL_SIZE: i32 = 14;
pub const TICK_SIZE: i32 = 12;

pub const VOLUME_COLOR: RGBColor = RGBColor(31, 119, 180); // tab:blue
pub const PRICE_COLOR: RGBColor = RGBColor(255, 127, 14); // tab:orange
pub const ORGANIC_COLOR: RGBColor = RGBColor(0, 128, 0); // Green
pub const CONVENTIONAL_COLOR: RGBColor = RGBColor(165, 42, 42); // Brown
pub const MONTH_LINE_COLOR: RGBColor = RGBColor(0, 0, 139); // Dark blue

/// One color per size category, in `SizeCategory::ALL` order.
pub const SIZE_PALETTE: [RGBColor; 3] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
];

/// Background band opacity for the seasonal price chart.
pub const SEASON_ALPHA: f64 = 0.3;

pub fn type_color(avocado_type: AvocadoType) -> RGBColor {
    match avocado_type {
        AvocadoType::Organic => ORGANIC_COLOR,
        AvocadoType::Conventional => CONVENTIONAL_COLOR,
    }
}

pub fn size_color(size: SizeCategory) -> RGBColor {
    SIZE_PALETTE[size.index()]
}

pub fn season_color(season: Season) -> RGBColor {
    match season {
        Season::Winter => RGBColor(255, 255, 255), // White
        Season::Spring => RGBColor(144, 238, 144), // Light green
        Season::Summer => RGBColor(255, 255, 153), // Yellow
        Season::Fall => RGBColor(255, 179, 102),   // Orange
    }
}

/// Label for a categorical axis position.
///
/// Categories sit at integer x positions; anything between two categories
/// gets an empty label.
pub fn category_label(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

/// Compact volume formatting for value axes.
pub fn format_volume(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// Padded `(min, max)` of the finite values, or `(0, 1)` when there are none.
pub fn value_range(values: impl IntoIterator<Item = f64>, pad_ratio: f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_infinite() {
        return (0.0, 1.0);
    }
    let span = if max > min { max - min } else { max.abs().max(1.0) };
    let pad = span * pad_ratio;
    (min - pad, max + pad)
}

/// `0..max` with headroom, for bar charts starting at zero.
pub fn zero_based_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        (0.0, 1.0)
    } else {
        (0.0, max * 1.1)
    }
}
