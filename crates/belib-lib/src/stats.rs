//! Aggregate counts over the station dataset.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::{PlugType, Station};

/// Number of stations sharing one district label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub stations: usize,
}

/// Number of stations offering one plug type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlugCount {
    pub plug: PlugType,
    pub stations: usize,
}

/// Summary of a dataset: totals, per-district and per-plug counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub in_service: usize,
    /// Sorted by descending count, then by label.
    pub by_district: Vec<DistrictCount>,
    /// Sorted by descending count, then in [`PlugType::ALL`] order.
    pub by_plug: Vec<PlugCount>,
}

impl DatasetStats {
    pub fn compute(stations: &[Station]) -> Self {
        let mut districts: HashMap<&str, usize> = HashMap::new();
        for station in stations {
            *districts.entry(station.district.as_str()).or_default() += 1;
        }
        let mut by_district: Vec<DistrictCount> = districts
            .into_iter()
            .map(|(district, stations)| DistrictCount {
                district: district.to_string(),
                stations,
            })
            .collect();
        by_district.sort_by(|a, b| {
            b.stations
                .cmp(&a.stations)
                .then_with(|| a.district.cmp(&b.district))
        });

        let mut by_plug: Vec<PlugCount> = PlugType::ALL
            .into_iter()
            .map(|plug| PlugCount {
                plug,
                stations: stations.iter().filter(|s| s.plugs.has(plug)).count(),
            })
            .collect();
        // Stable sort keeps PlugType::ALL order among equal counts.
        by_plug.sort_by(|a, b| b.stations.cmp(&a.stations));

        Self {
            total: stations.len(),
            in_service: stations.iter().filter(|s| s.is_in_service()).count(),
            by_district,
            by_plug,
        }
    }
}
