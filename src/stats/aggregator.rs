//! Sales Aggregator Module
//! Groups avocado records into the summaries behind each chart.
//!
//! Every aggregator is a pure function of the record slice. Groups are
//! accumulated in `BTreeMap`s so the emitted order is sorted on the group key
//! no matter how the input was ordered.

use crate::data::{AvocadoType, Record, SizeVolumes};
use crate::stats::calendar::{Season, YearMonth};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running totals for a volume-weighted price.
#[derive(Debug, Clone, Copy, Default)]
struct PriceVolume {
    volume: f64,
    weighted: f64,
}

impl PriceVolume {
    fn push(&mut self, record: &Record) {
        self.volume += record.total_volume;
        self.weighted += record.weighted_price();
    }

    /// `None` when the group sold nothing.
    fn weighted_price(&self) -> Option<f64> {
        if self.volume == 0.0 {
            None
        } else {
            Some(self.weighted / self.volume)
        }
    }
}

/// Total volume and weighted price for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub total_volume: f64,
    pub weighted_price: Option<f64>,
}

/// Organic and conventional volume sold in one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTypeVolume {
    pub region: String,
    pub organic: f64,
    pub conventional: f64,
}

impl RegionTypeVolume {
    pub fn total(&self) -> f64 {
        self.organic + self.conventional
    }
}

/// Weighted price for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: YearMonth,
    pub season: Season,
    pub total_volume: f64,
    pub weighted_price: Option<f64>,
}

/// Mean size-category volume per record, split by type.
///
/// A side with no records is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeByType {
    pub organic: Option<SizeVolumes>,
    pub conventional: Option<SizeVolumes>,
}

impl SizeByType {
    pub fn get(&self, avocado_type: AvocadoType) -> Option<&SizeVolumes> {
        match avocado_type {
            AvocadoType::Organic => self.organic.as_ref(),
            AvocadoType::Conventional => self.conventional.as_ref(),
        }
    }
}

/// Size-category volume sold in one region, both types together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSizeVolume {
    pub region: String,
    pub sizes: SizeVolumes,
}

/// Pure grouping functions over loaded records.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Total volume and volume-weighted average price per date.
    pub fn volume_price_by_date(records: &[Record]) -> Vec<DatePoint> {
        let mut groups: BTreeMap<NaiveDate, PriceVolume> = BTreeMap::new();
        for record in records {
            groups.entry(record.date).or_default().push(record);
        }

        groups
            .into_iter()
            .map(|(date, acc)| DatePoint {
                date,
                total_volume: acc.volume,
                weighted_price: acc.weighted_price(),
            })
            .collect()
    }

    /// Organic vs conventional total volume per region.
    pub fn type_volume_by_region(records: &[Record]) -> Vec<RegionTypeVolume> {
        let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for record in records {
            let entry = groups.entry(record.region.as_str()).or_default();
            if record.is_organic() {
                entry.0 += record.total_volume;
            } else {
                entry.1 += record.total_volume;
            }
        }

        groups
            .into_iter()
            .map(|(region, (organic, conventional))| RegionTypeVolume {
                region: region.to_string(),
                organic,
                conventional,
            })
            .collect()
    }

    /// Volume-weighted average price per calendar month, tagged by season.
    pub fn price_by_month(records: &[Record]) -> Vec<MonthPoint> {
        let mut groups: BTreeMap<YearMonth, PriceVolume> = BTreeMap::new();
        for record in records {
            groups
                .entry(YearMonth::from_date(record.date))
                .or_default()
                .push(record);
        }

        groups
            .into_iter()
            .map(|(month, acc)| MonthPoint {
                month,
                season: month.season(),
                total_volume: acc.volume,
                weighted_price: acc.weighted_price(),
            })
            .collect()
    }

    /// Arithmetic mean of each size-category volume, per type.
    pub fn mean_size_by_type(records: &[Record]) -> SizeByType {
        let mut organic = (SizeVolumes::default(), 0usize);
        let mut conventional = (SizeVolumes::default(), 0usize);

        for record in records {
            let side = if record.is_organic() {
                &mut organic
            } else {
                &mut conventional
            };
            side.0.add(&record.sizes);
            side.1 += 1;
        }

        let mean = |(sum, count): (SizeVolumes, usize)| {
            (count > 0).then(|| sum.scale(1.0 / count as f64))
        };

        SizeByType {
            organic: mean(organic),
            conventional: mean(conventional),
        }
    }

    /// Summed size-category volumes per region.
    pub fn size_volume_by_region(records: &[Record]) -> Vec<RegionSizeVolume> {
        let mut groups: BTreeMap<&str, SizeVolumes> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.region.as_str())
                .or_default()
                .add(&record.sizes);
        }

        groups
            .into_iter()
            .map(|(region, sizes)| RegionSizeVolume {
                region: region.to_string(),
                sizes,
            })
            .collect()
    }
}
