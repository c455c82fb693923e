//! Stats module - Record aggregation

mod aggregator;
mod calendar;

pub use aggregator::{
    DatePoint, MonthPoint, RegionSizeVolume, RegionTypeVolume, SalesAggregator, SizeByType,
};
pub use calendar::{Season, YearMonth};
