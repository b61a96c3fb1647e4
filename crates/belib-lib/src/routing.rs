//! Driving routes from an OSRM server.
//!
//! The component speaks `(lat, lon)` like the rest of the crate, while OSRM
//! expects `lon,lat` pairs separated by `;` in the request path. The first
//! route candidate is used; its polyline geometry is decoded into points.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RouterConfig;
use crate::error::{Error, Result, Service};
use crate::geo::GeoPoint;
use crate::polyline;

/// Decoded route between two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Ordered `(lat, lon)` points of the route geometry.
    pub path: Vec<GeoPoint>,
    /// Total length in meters.
    pub distance_m: f64,
    /// Total travel time in seconds.
    pub duration_s: f64,
}

impl Route {
    /// Route with no geometry and zero length, for callers that render a
    /// missing route as an empty path.
    pub fn empty() -> Self {
        Self {
            path: Vec::new(),
            distance_m: 0.0,
            duration_s: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Source of routes between two coordinates.
pub trait RouteProvider {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route>;
}

/// Blocking client for `GET /route/v1/{profile}/{lon},{lat};{lon},{lat}`.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: Client,
    base_url: String,
    profile: String,
    timeout_secs: u64,
}

impl OsrmClient {
    pub fn new(config: &RouterConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| Error::InvalidConfig {
                message: format!("failed to build routing HTTP client: {err}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Request URL without the query string.
    fn route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{};{}",
            self.base_url,
            self.profile,
            start.to_lon_lat(),
            end.to_lon_lat()
        )
    }
}

impl RouteProvider for OsrmClient {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route> {
        let url = self.route_url(start, end);
        debug!(%url, "requesting route");

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "polyline")])
            .send()
            .map_err(|err| Error::from_http(Service::Routing, self.timeout_secs, err))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| Error::from_http(Service::Routing, self.timeout_secs, err))?;

        if !status.is_success() {
            // OSRM reports unroutable input as 400 with a JSON `code`.
            if let Ok(reply) = serde_json::from_str::<OsrmResponse>(&body) {
                if reply.is_no_route() {
                    return Err(reply.no_route_error());
                }
            }
            warn!(status = status.as_u16(), "routing service rejected request");
            return Err(Error::ServiceStatus {
                service: Service::Routing,
                status: status.as_u16(),
            });
        }

        let reply: OsrmResponse =
            serde_json::from_str(&body).map_err(|err| Error::MalformedResponse {
                service: Service::Routing,
                message: err.to_string(),
            })?;
        reply.into_route()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    duration: f64,
}

impl OsrmResponse {
    fn is_no_route(&self) -> bool {
        matches!(self.code.as_str(), "NoRoute" | "NoSegment")
    }

    fn no_route_error(&self) -> Error {
        Error::NoRouteFound {
            reason: match &self.message {
                Some(message) => format!("{}: {}", self.code, message),
                None => self.code.clone(),
            },
        }
    }

    fn into_route(self) -> Result<Route> {
        if self.code != "Ok" {
            return Err(self.no_route_error());
        }
        let Some(best) = self.routes.into_iter().next() else {
            return Err(Error::NoRouteFound {
                reason: "response contained no routes".to_string(),
            });
        };

        let path = polyline::decode(&best.geometry).map_err(|err| Error::MalformedResponse {
            service: Service::Routing,
            message: err.to_string(),
        })?;
        debug!(
            points = path.len(),
            distance_m = best.distance,
            duration_s = best.duration,
            "route decoded"
        );

        Ok(Route {
            path,
            distance_m: best.distance,
            duration_s: best.duration,
        })
    }
}
