//! Validated WGS-84 coordinates and geodesic distance.

use std::fmt;
use std::str::FromStr;

use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Centre of Paris (Hôtel de Ville), used as the default map centre.
pub const PARIS_CENTER: GeoPoint = GeoPoint::known(48.8566, 2.3522);

/// A latitude/longitude pair in decimal degrees.
///
/// Construct through [`GeoPoint::new`] or [`str::parse`]; both reject values
/// that are not finite or fall outside [-90, 90] / [-180, 180]. Deserializing
/// goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawPoint) -> Result<Self> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// In-range constants only; callers hold the invariant themselves.
    pub(crate) const fn known(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(Error::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Ellipsoidal (Karney) distance to `other`, in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        Geodesic::distance(self.to_point(), other.to_point())
    }

    /// `lon,lat` as used in OSRM request paths.
    pub fn to_lon_lat(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Parses `"lat, lon"` (the dataset's `coordonneesxy` format) as well as the
/// tighter `"lat,lon"` accepted on the command line.
impl FromStr for GeoPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCoordinateText {
            text: s.to_string(),
        };
        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
        GeoPoint::new(latitude, longitude)
    }
}
