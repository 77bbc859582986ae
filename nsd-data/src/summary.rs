//! Depression statistics for a watershed.

use log::info;
use nsd_catalog::{Feature, Properties};
use nsd_utils::units;
use serde::Serialize;

use crate::error::{ExplorerError, Result};
use crate::watershed::Watershed;

/// Depression surface area, square meters.
pub const AREA_PROPERTY: &str = "area";

/// Depression storage volume, cubic meters.
pub const VOLUME_PROPERTY: &str = "volume";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub huc8: String,
    pub watershed_area_sqkm: f64,
    pub depression_count: usize,
    /// Per-depression area in km², in collection order.
    pub depression_area_sqkm: Vec<f64>,
    /// Per-depression volume in km³, in collection order.
    pub depression_volume_km3: Vec<f64>,
    pub total_area_sqkm: f64,
    pub total_volume_km3: f64,
    /// Attributes of the first depression, for display only.
    pub sample_depression: Option<Properties>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.depression_count == 0
    }

    /// Attributes of the first depression, or `EmptyCollection` if the
    /// watershed has none.
    pub fn sample(&self) -> Result<&Properties> {
        self.sample_depression
            .as_ref()
            .ok_or_else(|| ExplorerError::EmptyCollection(self.huc8.clone()))
    }

    /// Share of the watershed covered by depressions, in percent.
    pub fn depression_percent(&self) -> f64 {
        if self.watershed_area_sqkm > 0.0 {
            self.total_area_sqkm / self.watershed_area_sqkm * 100.0
        } else {
            0.0
        }
    }
}

fn numeric(feature: &Feature, key: &str, dataset: &str) -> Result<f64> {
    feature
        .get_f64(key)
        .ok_or_else(|| ExplorerError::invalid_attribute(dataset, key))
}

/// Summarize the realized depressions of a watershed.
///
/// An empty collection is a valid state: the series are empty, totals are
/// zero and [`Summary::sample`] reports `EmptyCollection`.
pub fn aggregate(watershed: &Watershed, depressions: &[Feature]) -> Result<Summary> {
    let dataset = format!("depressions of {}", watershed.huc8);
    let mut depression_area_sqkm = Vec::with_capacity(depressions.len());
    let mut depression_volume_km3 = Vec::with_capacity(depressions.len());
    for feature in depressions {
        depression_area_sqkm.push(units::sq_m_to_sq_km(numeric(feature, AREA_PROPERTY, &dataset)?));
        depression_volume_km3.push(units::cu_m_to_cu_km(numeric(feature, VOLUME_PROPERTY, &dataset)?));
    }
    let summary = Summary {
        huc8: watershed.huc8.clone(),
        watershed_area_sqkm: watershed.area_sqkm,
        depression_count: depressions.len(),
        total_area_sqkm: depression_area_sqkm.iter().sum(),
        total_volume_km3: depression_volume_km3.iter().sum(),
        depression_area_sqkm,
        depression_volume_km3,
        sample_depression: depressions.first().map(|f| f.properties.clone()),
    };
    info!(
        "HUC8 {}: {} depressions, {:.3} km2, {:.6} km3",
        summary.huc8, summary.depression_count, summary.total_area_sqkm, summary.total_volume_km3
    );
    Ok(summary)
}
