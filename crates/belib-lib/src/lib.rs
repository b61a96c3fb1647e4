//! Belib' station locator library entry points.
//!
//! This crate loads the Paris charging-station dataset, resolves free-text
//! addresses through the national address API, finds the geodesic-nearest
//! station and fetches a driving route to it from OSRM. Higher-level
//! consumers (the CLI) should only depend on the functions exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod dataset;
pub mod district;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod nearest;
pub mod polyline;
pub mod routing;
pub mod stats;
pub mod trip;

pub use config::{GeocoderConfig, RouterConfig, ServiceConfig};
pub use dataset::{
    default_dataset_path, resolve_dataset_path, PlugType, PlugTypes, Station, StationDataset,
    StationStatus,
};
pub use error::{Error, Result, Service};
pub use geo::{GeoPoint, PARIS_CENTER};
pub use geocoding::{AdresseClient, GeocodeMatch, Geocoder};
pub use nearest::{find_nearest, find_nearest_matching, NearestStation};
pub use routing::{OsrmClient, Route, RouteProvider};
pub use stats::DatasetStats;
pub use trip::{
    plan_trip, plan_trip_from_point, resolve_address, AddressResolution, ResolvedAddress,
    RouteOutcome, Trip, TripOptions, TripOutcome,
};
