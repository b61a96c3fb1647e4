use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Convenient result alias for the Belib' library.
pub type Result<T> = std::result::Result<T, Error>;

/// External service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Address geocoding (api-adresse.data.gouv.fr).
    Geocoding,
    /// Road routing (OSRM).
    Routing,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Geocoding => write!(f, "geocoding service"),
            Service::Routing => write!(f, "routing service"),
        }
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be located at the resolved path.
    #[error("station dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the station dataset")]
    ProjectDirsUnavailable,

    /// The dataset header lacks columns the loader cannot do without.
    #[error("station dataset missing required columns: {}. Available: {}", .columns.join(", "), .available.join(", "))]
    MissingColumns {
        columns: Vec<String>,
        available: Vec<String>,
    },

    /// A dataset row holds a value that cannot be parsed.
    #[error("invalid value in row {row}, column {column}: {message}")]
    InvalidRecord {
        row: usize,
        column: String,
        message: String,
    },

    /// Coordinates outside the valid latitude/longitude ranges.
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Text that does not read as a `lat, lon` pair.
    #[error("cannot read '{text}' as a 'latitude, longitude' pair")]
    InvalidCoordinateText { text: String },

    /// Raised when an encoded polyline cannot be decoded.
    #[error("invalid encoded polyline at byte {position}: {reason}")]
    InvalidPolyline { position: usize, reason: String },

    /// Polyline precision outside the supported digit range.
    #[error("unsupported polyline precision {precision} (expected 1 to {max})")]
    UnsupportedPrecision { precision: u32, max: u32 },

    /// Raised when a district label is not present in the dataset.
    #[error("unknown district: {name}{}", format_suggestions(.suggestions))]
    UnknownDistrict {
        name: String,
        suggestions: Vec<String>,
    },

    /// Plug type name not recognised on input.
    #[error("unknown plug type '{name}' (expected ef, type2, combo-ccs or chademo)")]
    UnknownPlugType { name: String },

    /// Raised when service configuration fails validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The service could not be reached (DNS, connection refused, TLS...).
    #[error("{service} unreachable: {message}")]
    ServiceUnreachable { service: Service, message: String },

    /// The service did not answer within the configured timeout.
    #[error("{service} timed out after {timeout_secs} seconds")]
    ServiceTimeout { service: Service, timeout_secs: u64 },

    /// The service answered with a non-success HTTP status.
    #[error("{service} returned HTTP {status}")]
    ServiceStatus { service: Service, status: u16 },

    /// The service answered with a body that could not be understood.
    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse { service: Service, message: String },

    /// The routing service found no route between the two points.
    #[error("no route found: {reason}")]
    NoRouteFound { reason: String },

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON errors (configuration files).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure came from an external service and the caller can
    /// report it and carry on with an empty result.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ServiceUnreachable { .. }
                | Error::ServiceTimeout { .. }
                | Error::ServiceStatus { .. }
                | Error::MalformedResponse { .. }
                | Error::NoRouteFound { .. }
        )
    }

    /// Classify a transport-level HTTP error for `service`.
    pub(crate) fn from_http(service: Service, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::ServiceTimeout {
                service,
                timeout_secs,
            }
        } else if let Some(status) = err.status() {
            Error::ServiceStatus {
                service,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Error::MalformedResponse {
                service,
                message: err.to_string(),
            }
        } else {
            Error::ServiceUnreachable {
                service,
                message: err.to_string(),
            }
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_failures_are_recoverable() {
        let errors = [
            Error::ServiceUnreachable {
                service: Service::Geocoding,
                message: "connection refused".to_string(),
            },
            Error::ServiceTimeout {
                service: Service::Routing,
                timeout_secs: 10,
            },
            Error::ServiceStatus {
                service: Service::Routing,
                status: 503,
            },
            Error::MalformedResponse {
                service: Service::Geocoding,
                message: "expected value".to_string(),
            },
            Error::NoRouteFound {
                reason: "NoRoute".to_string(),
            },
        ];
        for err in errors {
            assert!(err.is_recoverable(), "{err} should be recoverable");
        }
    }

    #[test]
    fn data_errors_are_not_recoverable() {
        assert!(!Error::InvalidCoordinateText {
            text: "nowhere".to_string()
        }
        .is_recoverable());
        assert!(!Error::MissingColumns {
            columns: vec!["coordonneesxy".to_string()],
            available: vec![],
        }
        .is_recoverable());
    }

    #[test]
    fn unknown_district_lists_suggestions() {
        let single = Error::UnknownDistrict {
            name: "15e".to_string(),
            suggestions: vec!["15e Arrondissement".to_string()],
        };
        assert_eq!(
            single.to_string(),
            "unknown district: 15e. Did you mean '15e Arrondissement'?"
        );

        let many = Error::UnknownDistrict {
            name: "1e".to_string(),
            suggestions: vec![
                "11e Arrondissement".to_string(),
                "12e Arrondissement".to_string(),
            ],
        };
        assert!(many
            .to_string()
            .contains("Did you mean one of: '11e Arrondissement', '12e Arrondissement'?"));
    }

    #[test]
    fn timeout_message_names_service() {
        let err = Error::ServiceTimeout {
            service: Service::Routing,
            timeout_secs: 7,
        };
        assert_eq!(err.to_string(), "routing service timed out after 7 seconds");
    }
}
