//! Address resolution through the French national address API
//! (`api-adresse.data.gouv.fr`).
//!
//! A single lookup returns the best matching feature. Callers either take its
//! coordinates ([`Geocoder::geocode`]) or its normalized label
//! ([`Geocoder::suggest_correction`]); keeping the two apart lets the caller
//! ask the user to confirm a correction before committing to coordinates.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeocoderConfig;
use crate::error::{Error, Result, Service};
use crate::geo::GeoPoint;

/// Top feature returned for an address lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeMatch {
    /// Normalized label, e.g. `10 Rue de Rivoli 75004 Paris`.
    pub label: String,
    pub point: GeoPoint,
    /// Relevance score in [0, 1] as reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Free-text address lookup.
///
/// Only [`Geocoder::fetch`] talks to the service; the other two methods are
/// views over its result.
pub trait Geocoder {
    /// Look up the single best match for `address`.
    ///
    /// `Ok(None)` means the service answered but found nothing. Transport
    /// problems are returned as recoverable errors.
    fn fetch(&self, address: &str) -> Result<Option<GeocodeMatch>>;

    /// Coordinates of the best match.
    fn geocode(&self, address: &str) -> Result<Option<GeoPoint>> {
        Ok(self.fetch(address)?.map(|found| found.point))
    }

    /// Normalized label of the best match, whether or not the caller uses it.
    fn suggest_correction(&self, address: &str) -> Result<Option<String>> {
        Ok(self.fetch(address)?.map(|found| found.label))
    }
}

/// Blocking client for `GET /search/?q=...&limit=1`.
#[derive(Debug, Clone)]
pub struct AdresseClient {
    http: Client,
    base_url: String,
    timeout_secs: u64,
}

impl AdresseClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| Error::InvalidConfig {
                message: format!("failed to build geocoding HTTP client: {err}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn http_error(&self, err: reqwest::Error) -> Error {
        Error::from_http(Service::Geocoding, self.timeout_secs, err)
    }
}

impl Geocoder for AdresseClient {
    fn fetch(&self, address: &str) -> Result<Option<GeocodeMatch>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search/", self.base_url);
        debug!(%url, %address, "geocoding address");

        let response = self
            .http
            .get(&url)
            .query(&[("q", address), ("limit", "1")])
            .send()
            .map_err(|err| self.http_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ServiceStatus {
                service: Service::Geocoding,
                status: status.as_u16(),
            });
        }

        let collection: FeatureCollection = response.json().map_err(|err| self.http_error(err))?;
        let found = collection.into_best_match()?;
        match &found {
            Some(m) => debug!(label = %m.label, point = %m.point, "address resolved"),
            None => debug!(%address, "no feature returned for address"),
        }
        Ok(found)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: `[longitude, latitude]`.
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    label: Option<String>,
    score: Option<f64>,
    postcode: Option<String>,
    city: Option<String>,
}

impl FeatureCollection {
    fn into_best_match(self) -> Result<Option<GeocodeMatch>> {
        let Some(feature) = self.features.into_iter().next() else {
            return Ok(None);
        };

        let malformed = |message: String| Error::MalformedResponse {
            service: Service::Geocoding,
            message,
        };

        let (longitude, latitude) = match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            other => {
                return Err(malformed(format!(
                    "expected [longitude, latitude], got {} values",
                    other.len()
                )))
            }
        };
        let point = GeoPoint::new(latitude, longitude).map_err(|err| malformed(err.to_string()))?;
        let label = feature
            .properties
            .label
            .ok_or_else(|| malformed("feature has no label".to_string()))?;

        Ok(Some(GeocodeMatch {
            label,
            point,
            score: feature.properties.score,
            postcode: feature.properties.postcode,
            city: feature.properties.city,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIVOLI: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.359392, 48.855584]},
            "properties": {
                "label": "10 Rue de Rivoli 75004 Paris",
                "score": 0.97,
                "postcode": "75004",
                "city": "Paris"
            }
        }],
        "query": "10 rue de rivoli paris"
    }"#;

    #[test]
    fn best_match_swaps_geojson_order() {
        let collection: FeatureCollection = serde_json::from_str(RIVOLI).unwrap();
        let found = collection.into_best_match().unwrap().expect("one feature");
        assert_eq!(found.label, "10 Rue de Rivoli 75004 Paris");
        assert_eq!(found.point, GeoPoint::new(48.855584, 2.359392).unwrap());
        assert_eq!(found.score, Some(0.97));
        assert_eq!(found.postcode.as_deref(), Some("75004"));
        assert_eq!(found.city.as_deref(), Some("Paris"));
    }

    #[test]
    fn empty_collection_is_not_found() {
        let collection: FeatureCollection =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(collection.into_best_match().unwrap().is_none());
    }

    #[test]
    fn short_coordinate_array_is_malformed() {
        let collection: FeatureCollection = serde_json::from_str(
            r#"{"features": [{"geometry": {"coordinates": [2.35]}, "properties": {"label": "x"}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            collection.into_best_match(),
            Err(Error::MalformedResponse {
                service: Service::Geocoding,
                ..
            })
        ));
    }

    #[test]
    fn blank_address_skips_the_request() {
        // Port 9 (discard) is never contacted: a blank query returns early.
        let config = GeocoderConfig::default().with_base_url("http://127.0.0.1:9");
        let client = AdresseClient::new(&config).unwrap();
        assert_eq!(client.fetch("   ").unwrap(), None);
    }
}
