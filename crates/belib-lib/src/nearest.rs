//! Nearest-station search.
//!
//! A plain linear scan over the dataset computing the ellipsoidal distance to
//! every station. The Belib' export holds a few thousand rows and a search
//! runs once per user action, so no spatial index is built; see the
//! `nearest` benchmark for how the scan scales.

use serde::Serialize;
use tracing::debug;

use crate::dataset::Station;
use crate::geo::GeoPoint;

/// Result of a nearest-station search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestStation<'a> {
    /// Position of the station in dataset order.
    pub index: usize,
    pub station: &'a Station,
    /// Geodesic distance from the query point, in meters.
    pub distance_m: f64,
}

/// Find the station closest to `point`.
///
/// Returns `None` for an empty slice. When several stations sit at exactly the
/// same distance the one with the lowest index wins.
pub fn find_nearest(stations: &[Station], point: GeoPoint) -> Option<NearestStation<'_>> {
    find_nearest_matching(stations, point, |_| true)
}

/// Find the closest station accepted by `predicate`.
///
/// Indices still refer to positions in the full `stations` slice.
pub fn find_nearest_matching<F>(
    stations: &[Station],
    point: GeoPoint,
    predicate: F,
) -> Option<NearestStation<'_>>
where
    F: Fn(&Station) -> bool,
{
    let mut best: Option<NearestStation<'_>> = None;

    for (index, station) in stations.iter().enumerate() {
        if !predicate(station) {
            continue;
        }
        let distance_m = point.distance_to(&station.position);
        // Strict comparison keeps the earliest row on ties.
        if best.map_or(true, |current| distance_m < current.distance_m) {
            best = Some(NearestStation {
                index,
                station,
                distance_m,
            });
        }
    }

    if let Some(found) = &best {
        debug!(
            index = found.index,
            station = %found.station.name,
            distance_m = found.distance_m,
            "nearest station found"
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{PlugTypes, StationStatus};

    fn station(name: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id: None,
            name: name.to_string(),
            address: format!("{name} address"),
            status: StationStatus::InService,
            nominal_power_kw: 7.0,
            plugs: PlugTypes::default(),
            district: "Paris centre".to_string(),
            position: GeoPoint::new(latitude, longitude).unwrap(),
            charge_points: None,
            pmr_accessibility: None,
            access_condition: None,
            pricing: None,
        }
    }

    #[test]
    fn empty_dataset_has_no_nearest() {
        let point = GeoPoint::new(48.8566, 2.3522).unwrap();
        assert!(find_nearest(&[], point).is_none());
    }

    #[test]
    fn single_station_is_always_nearest() {
        let stations = vec![station("only", 48.90, 2.25)];
        for (lat, lon) in [(48.8566, 2.3522), (48.81, 2.41), (-33.0, 151.0)] {
            let found = find_nearest(&stations, GeoPoint::new(lat, lon).unwrap()).unwrap();
            assert_eq!(found.index, 0);
            assert_eq!(found.station.name, "only");
        }
    }

    #[test]
    fn picks_closest_station() {
        let stations = vec![
            station("bastille", 48.8532, 2.3692),
            station("louvre", 48.8611, 2.3358),
            station("montparnasse", 48.8421, 2.3219),
        ];
        let near_louvre = GeoPoint::new(48.8606, 2.3376).unwrap();
        let found = find_nearest(&stations, near_louvre).unwrap();
        assert_eq!(found.station.name, "louvre");
        assert_eq!(found.index, 1);
        assert!(found.distance_m < 200.0);
    }

    #[test]
    fn ties_resolve_to_first_row() {
        let stations = vec![
            station("first", 48.86, 2.34),
            station("second", 48.86, 2.34),
        ];
        let found = find_nearest(&stations, GeoPoint::new(48.87, 2.35).unwrap()).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.station.name, "first");
    }

    #[test]
    fn predicate_skips_rows_but_keeps_indices() {
        let mut broken = station("broken", 48.8611, 2.3358);
        broken.status = StationStatus::Other("Hors service".to_string());
        let stations = vec![broken, station("working", 48.8421, 2.3219)];

        let point = GeoPoint::new(48.8611, 2.3358).unwrap();
        let found = find_nearest_matching(&stations, point, Station::is_in_service).unwrap();
        assert_eq!(found.station.name, "working");
        assert_eq!(found.index, 1);

        assert!(find_nearest_matching(&stations, point, |_| false).is_none());
    }
}
