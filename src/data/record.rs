//! Record Module
//! Typed avocado sales rows and the small value types derived from them.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Region label of the whole-country aggregate row. It double-counts every
/// other region, so the loader drops it.
pub const TOTAL_US: &str = "TotalUS";

/// Avocado production type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvocadoType {
    Organic,
    Conventional,
}

impl AvocadoType {
    /// Coerce a raw `type` cell. Only an exact `organic` is organic.
    pub fn from_label(label: &str) -> Self {
        if label == "organic" {
            AvocadoType::Organic
        } else {
            AvocadoType::Conventional
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AvocadoType::Organic => "Organic",
            AvocadoType::Conventional => "Conventional",
        }
    }
}

/// PLU-code based size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SizeCategory {
    #[serde(rename = "4046")]
    Plu4046,
    #[serde(rename = "4225")]
    Plu4225,
    #[serde(rename = "4770")]
    Plu4770,
}

impl SizeCategory {
    pub const ALL: [SizeCategory; 3] = [
        SizeCategory::Plu4046,
        SizeCategory::Plu4225,
        SizeCategory::Plu4770,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SizeCategory::Plu4046 => "4046",
            SizeCategory::Plu4225 => "4225",
            SizeCategory::Plu4770 => "4770",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            SizeCategory::Plu4046 => 0,
            SizeCategory::Plu4225 => 1,
            SizeCategory::Plu4770 => 2,
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Volumes for the three size categories, in `SizeCategory::ALL` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SizeVolumes {
    #[serde(rename = "4046")]
    pub plu_4046: f64,
    #[serde(rename = "4225")]
    pub plu_4225: f64,
    #[serde(rename = "4770")]
    pub plu_4770: f64,
}

impl SizeVolumes {
    pub fn new(plu_4046: f64, plu_4225: f64, plu_4770: f64) -> Self {
        Self {
            plu_4046,
            plu_4225,
            plu_4770,
        }
    }

    pub fn get(&self, size: SizeCategory) -> f64 {
        self.as_array()[size.index()]
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.plu_4046, self.plu_4225, self.plu_4770]
    }

    pub fn add(&mut self, other: &SizeVolumes) {
        self.plu_4046 += other.plu_4046;
        self.plu_4225 += other.plu_4225;
        self.plu_4770 += other.plu_4770;
    }

    pub fn scale(&self, factor: f64) -> SizeVolumes {
        SizeVolumes::new(
            self.plu_4046 * factor,
            self.plu_4225 * factor,
            self.plu_4770 * factor,
        )
    }
}

/// One row of avocado sales data for a given date, region and type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub average_price: f64,
    pub total_volume: f64,
    pub sizes: SizeVolumes,
    pub total_bags: f64,
    pub small_bags: f64,
    pub large_bags: f64,
    pub xlarge_bags: f64,
    pub avocado_type: AvocadoType,
    pub year: i32,
    pub region: String,
}

impl Record {
    pub fn is_organic(&self) -> bool {
        self.avocado_type == AvocadoType::Organic
    }

    /// Revenue proxy used for volume weighting.
    pub fn weighted_price(&self) -> f64 {
        self.average_price * self.total_volume
    }
}
