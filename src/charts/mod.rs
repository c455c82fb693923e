//! Charts module - Static chart rendering

mod renderer;
mod style;

pub use renderer::{
    ChartConfig, ChartRenderer, PRICE_BY_MONTH_FILE, PRICE_DEMAND_FILE, SIZE_BY_REGION_FILE,
    SIZE_BY_TYPE_FILE, TYPE_BY_REGION_FILE,
};
