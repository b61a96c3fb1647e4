#![allow(dead_code)]

use std::path::PathBuf;

use belib_lib::{GeoPoint, PlugTypes, Station, StationDataset, StationStatus};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn sample_dataset() -> StationDataset {
    StationDataset::from_path(&fixtures_dir().join("stations_sample.csv"))
        .expect("load fixture stations_sample.csv")
}

/// Address of the Rivoli fixture request, as returned by the geocoder.
pub const RIVOLI_LABEL: &str = "10 Rue de Rivoli 75004 Paris";
pub const RIVOLI_LAT: f64 = 48.855584;
pub const RIVOLI_LON: f64 = 2.359392;

pub fn rivoli() -> GeoPoint {
    GeoPoint::new(RIVOLI_LAT, RIVOLI_LON).expect("valid coordinates")
}

/// Single-feature `/search/` reply in api-adresse format.
pub fn adresse_reply(label: &str, latitude: f64, longitude: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "version": "draft",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [longitude, latitude]},
            "properties": {
                "label": label,
                "score": 0.96,
                "postcode": "75004",
                "city": "Paris",
                "type": "housenumber"
            }
        }],
        "query": label,
        "limit": 1
    })
}

/// Successful OSRM reply carrying the given encoded geometry.
pub fn osrm_reply(geometry: &str, distance: f64, duration: f64) -> serde_json::Value {
    serde_json::json!({
        "code": "Ok",
        "routes": [{
            "geometry": geometry,
            "legs": [],
            "distance": distance,
            "duration": duration,
            "weight_name": "routability",
            "weight": duration
        }],
        "waypoints": []
    })
}

pub fn station(name: &str, latitude: f64, longitude: f64) -> Station {
    Station {
        id: None,
        name: name.to_string(),
        address: format!("{name} address"),
        status: StationStatus::InService,
        nominal_power_kw: 22.0,
        plugs: PlugTypes {
            type_2: true,
            ..Default::default()
        },
        district: "Paris centre".to_string(),
        position: GeoPoint::new(latitude, longitude).expect("valid coordinates"),
        charge_points: None,
        pmr_accessibility: None,
        access_condition: None,
        pricing: None,
    }
}
