//! Address → nearest station → route pipeline.
//!
//! Each step runs after the previous one completes: the address is resolved
//! (with an optional correction the caller must confirm), then the dataset is
//! scanned for the nearest station, then a route to it is requested.
//! "Not found" results are outcome variants, not errors. A failed route
//! request keeps the station and records why no route is available.

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::{PlugType, Station, StationDataset};
use crate::error::Result;
use crate::geo::GeoPoint;
use crate::geocoding::Geocoder;
use crate::nearest::find_nearest_matching;
use crate::routing::{Route, RouteProvider};

/// Address the user's text resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAddress {
    /// Text as typed by the user.
    pub query: String,
    /// Normalized label returned by the geocoder.
    pub label: String,
    /// True when the user accepted a correction that differs from `query`.
    pub corrected: bool,
    pub point: GeoPoint,
}

/// Outcome of [`resolve_address`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddressResolution {
    Resolved(ResolvedAddress),
    NotFound { query: String },
    /// The user declined the suggested correction.
    Rejected { query: String, suggestion: String },
}

/// Knobs for the nearest-station and route steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripOptions {
    /// Only consider stations whose status is `En service`.
    pub in_service_only: bool,
    /// Request a route to the station (disable for a distance-only answer).
    pub with_route: bool,
    /// Only consider stations offering this plug.
    pub required_plug: Option<PlugType>,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            in_service_only: false,
            with_route: true,
            required_plug: None,
        }
    }
}

impl TripOptions {
    /// Whether `station` passes the status and plug filters.
    pub fn accepts(&self, station: &Station) -> bool {
        (!self.in_service_only || station.is_in_service())
            && self
                .required_plug
                .map_or(true, |plug| station.plugs.has(plug))
    }
}

/// Route part of a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    Found(Route),
    /// The routing service failed; the station is still reported.
    Unavailable { reason: String },
    /// No route was requested.
    Skipped,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            _ => None,
        }
    }
}

/// Nearest station to an origin, with the route to reach it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ResolvedAddress>,
    pub origin: GeoPoint,
    pub station: Station,
    /// Row of the station in dataset order.
    pub station_index: usize,
    /// Straight-line geodesic distance to the station, in meters.
    pub distance_m: f64,
    pub route: RouteOutcome,
}

/// Outcome of a full trip request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TripOutcome {
    Found(Box<Trip>),
    AddressNotFound { query: String },
    CorrectionRejected { query: String, suggestion: String },
    /// The dataset (after filtering) holds no station.
    NoStation { origin: GeoPoint },
}

/// Resolve free text to coordinates.
///
/// The geocoder is first asked for a correction. If it matches the input
/// (ignoring case and spacing) the input is geocoded directly; otherwise
/// `confirm(original, suggestion)` decides whether the suggestion is geocoded
/// or the request ends as [`AddressResolution::Rejected`].
pub fn resolve_address<G, C>(geocoder: &G, address: &str, confirm: C) -> Result<AddressResolution>
where
    G: Geocoder + ?Sized,
    C: FnOnce(&str, &str) -> bool,
{
    let query = address.trim().to_string();

    let Some(suggestion) = geocoder.suggest_correction(&query)? else {
        return Ok(AddressResolution::NotFound { query });
    };

    let corrected = !same_address(&query, &suggestion);
    if corrected && !confirm(&query, &suggestion) {
        info!(%query, %suggestion, "address correction declined");
        return Ok(AddressResolution::Rejected { query, suggestion });
    }

    let chosen = if corrected { suggestion.as_str() } else { query.as_str() };
    match geocoder.geocode(chosen)? {
        Some(point) => Ok(AddressResolution::Resolved(ResolvedAddress {
            query,
            label: suggestion,
            corrected,
            point,
        })),
        None => Ok(AddressResolution::NotFound { query }),
    }
}

/// Resolve `address`, find the nearest station and fetch a route to it.
pub fn plan_trip<G, R, C>(
    dataset: &StationDataset,
    geocoder: &G,
    router: &R,
    address: &str,
    options: &TripOptions,
    confirm: C,
) -> Result<TripOutcome>
where
    G: Geocoder + ?Sized,
    R: RouteProvider + ?Sized,
    C: FnOnce(&str, &str) -> bool,
{
    let resolved = match resolve_address(geocoder, address, confirm)? {
        AddressResolution::Resolved(resolved) => resolved,
        AddressResolution::NotFound { query } => {
            return Ok(TripOutcome::AddressNotFound { query })
        }
        AddressResolution::Rejected { query, suggestion } => {
            return Ok(TripOutcome::CorrectionRejected { query, suggestion })
        }
    };

    let origin = resolved.point;
    plan_from(dataset, router, origin, Some(resolved), options)
}

/// Find the nearest station to known coordinates and fetch a route to it.
pub fn plan_trip_from_point<R>(
    dataset: &StationDataset,
    router: &R,
    origin: GeoPoint,
    options: &TripOptions,
) -> Result<TripOutcome>
where
    R: RouteProvider + ?Sized,
{
    plan_from(dataset, router, origin, None, options)
}

fn plan_from<R>(
    dataset: &StationDataset,
    router: &R,
    origin: GeoPoint,
    address: Option<ResolvedAddress>,
    options: &TripOptions,
) -> Result<TripOutcome>
where
    R: RouteProvider + ?Sized,
{
    let Some(nearest) = find_nearest_matching(dataset.stations(), origin, |station| {
        options.accepts(station)
    }) else {
        return Ok(TripOutcome::NoStation { origin });
    };

    let route = if options.with_route {
        match router.route(origin, nearest.station.position) {
            Ok(route) => RouteOutcome::Found(route),
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "route unavailable, reporting station only");
                RouteOutcome::Unavailable {
                    reason: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        }
    } else {
        RouteOutcome::Skipped
    };

    Ok(TripOutcome::Found(Box::new(Trip {
        address,
        origin,
        station: nearest.station.clone(),
        station_index: nearest.index,
        distance_m: nearest.distance_m,
        route,
    })))
}

fn same_address(a: &str, b: &str) -> bool {
    let normalize = |s: &str| {
        s.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    };
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::error::{Error, Service};
    use crate::geocoding::GeocodeMatch;

    /// Geocoder answering from a fixed table and recording every lookup.
    struct TableGeocoder {
        entries: Vec<(&'static str, &'static str, f64, f64)>,
        calls: RefCell<Vec<String>>,
    }

    impl TableGeocoder {
        fn new(entries: Vec<(&'static str, &'static str, f64, f64)>) -> Self {
            Self {
                entries,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Geocoder for TableGeocoder {
        fn fetch(&self, address: &str) -> Result<Option<GeocodeMatch>> {
            self.calls.borrow_mut().push(address.to_string());
            Ok(self
                .entries
                .iter()
                .find(|(query, ..)| query.eq_ignore_ascii_case(address))
                .map(|(_, label, lat, lon)| GeocodeMatch {
                    label: label.to_string(),
                    point: GeoPoint::new(*lat, *lon).unwrap(),
                    score: None,
                    postcode: None,
                    city: None,
                }))
        }
    }

    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        fn fetch(&self, _address: &str) -> Result<Option<GeocodeMatch>> {
            Err(Error::ServiceUnreachable {
                service: Service::Geocoding,
                message: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn exact_label_needs_no_confirmation() {
        let geocoder = TableGeocoder::new(vec![(
            "10 Rue de Rivoli 75004 Paris",
            "10 Rue de Rivoli 75004 Paris",
            48.8556,
            2.3594,
        )]);
        let resolution = resolve_address(&geocoder, " 10 rue de Rivoli 75004 paris ", |_, _| {
            panic!("confirmation must not be asked")
        })
        .unwrap();
        match resolution {
            AddressResolution::Resolved(resolved) => {
                assert!(!resolved.corrected);
                assert_eq!(resolved.label, "10 Rue de Rivoli 75004 Paris");
            }
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn accepted_correction_geocodes_the_suggestion() {
        let geocoder = TableGeocoder::new(vec![
            ("10 rue rivoli", "10 Rue de Rivoli 75004 Paris", 48.8556, 2.3594),
            ("10 Rue de Rivoli 75004 Paris", "10 Rue de Rivoli 75004 Paris", 48.8556, 2.3594),
        ]);
        let mut asked = None;
        let resolution = resolve_address(&geocoder, "10 rue rivoli", |original, suggestion| {
            asked = Some((original.to_string(), suggestion.to_string()));
            true
        })
        .unwrap();

        assert_eq!(
            asked,
            Some((
                "10 rue rivoli".to_string(),
                "10 Rue de Rivoli 75004 Paris".to_string()
            ))
        );
        assert!(matches!(
            resolution,
            AddressResolution::Resolved(ResolvedAddress { corrected: true, .. })
        ));
        assert_eq!(
            *geocoder.calls.borrow(),
            vec!["10 rue rivoli".to_string(), "10 Rue de Rivoli 75004 Paris".to_string()]
        );
    }

    #[test]
    fn declined_correction_stops_before_geocoding() {
        let geocoder = TableGeocoder::new(vec![(
            "rue de la paix",
            "Rue de la Paix 75002 Paris",
            48.8687,
            2.3316,
        )]);
        let resolution = resolve_address(&geocoder, "rue de la paix", |_, _| false).unwrap();
        assert_eq!(
            resolution,
            AddressResolution::Rejected {
                query: "rue de la paix".to_string(),
                suggestion: "Rue de la Paix 75002 Paris".to_string(),
            }
        );
        assert_eq!(geocoder.calls.borrow().len(), 1);
    }

    #[test]
    fn unknown_address_is_not_found() {
        let geocoder = TableGeocoder::new(vec![]);
        let resolution = resolve_address(&geocoder, "qsdfghjklm", |_, _| true).unwrap();
        assert_eq!(
            resolution,
            AddressResolution::NotFound {
                query: "qsdfghjklm".to_string()
            }
        );
    }

    #[test]
    fn transport_failure_is_recoverable() {
        let err = resolve_address(&FailingGeocoder, "anything", |_, _| true).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn options_filter_status_and_plug() {
        let mut station = Station {
            id: None,
            name: "Grenelle".to_string(),
            address: "80 Boulevard de Grenelle".to_string(),
            status: crate::dataset::StationStatus::InService,
            nominal_power_kw: 50.0,
            plugs: crate::dataset::PlugTypes {
                type_2: true,
                combo_ccs: true,
                ..Default::default()
            },
            district: "15e Arrondissement".to_string(),
            position: GeoPoint::new(48.8496, 2.2946).unwrap(),
            charge_points: None,
            pmr_accessibility: None,
            access_condition: None,
            pricing: None,
        };
        let ccs = TripOptions {
            in_service_only: true,
            required_plug: Some(PlugType::ComboCcs),
            ..TripOptions::default()
        };
        assert!(ccs.accepts(&station));

        let chademo = TripOptions {
            required_plug: Some(PlugType::Chademo),
            ..TripOptions::default()
        };
        assert!(!chademo.accepts(&station));

        station.status = crate::dataset::StationStatus::Other("En maintenance".to_string());
        assert!(!ccs.accepts(&station));
        assert!(TripOptions::default().accepts(&station));
    }

    #[test]
    fn same_address_ignores_case_and_spacing() {
        assert!(same_address("10  rue de RIVOLI", "10 Rue de Rivoli"));
        assert!(!same_address("10 rue rivoli", "10 Rue de Rivoli"));
    }
}
