//! HTTP-level tests of the address client against a mock api-adresse server.
//!
//! The client is blocking, so each test drives it from `spawn_blocking` while
//! the mock server runs on the async runtime.

mod common;

use std::net::TcpListener;
use std::time::Duration;

use belib_lib::{AdresseClient, Error, GeoPoint, Geocoder, GeocoderConfig, Service};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{adresse_reply, RIVOLI_LABEL, RIVOLI_LAT, RIVOLI_LON};

fn client_for(base_url: String) -> AdresseClient {
    AdresseClient::new(&GeocoderConfig::default().with_base_url(base_url)).expect("client builds")
}

#[tokio::test(flavor = "multi_thread")]
async fn geocode_reads_best_feature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", "10 rue de rivoli paris"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(adresse_reply(
                RIVOLI_LABEL,
                RIVOLI_LAT,
                RIVOLI_LON,
            )),
        )
        .expect(2)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (point, label) = tokio::task::spawn_blocking(move || {
        let client = client_for(uri);
        let point = client.geocode("10 rue de rivoli paris").unwrap();
        let label = client.suggest_correction("10 rue de rivoli paris").unwrap();
        (point, label)
    })
    .await
    .unwrap();

    assert_eq!(point, Some(GeoPoint::new(RIVOLI_LAT, RIVOLI_LON).unwrap()));
    assert_eq!(label.as_deref(), Some(RIVOLI_LABEL));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_feature_list_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "FeatureCollection",
            "features": [],
            "query": "qsdfghjklm"
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let found = tokio::task::spawn_blocking(move || client_for(uri).fetch("qsdfghjklm"))
        .await
        .unwrap()
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_is_a_recoverable_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || client_for(uri).geocode("1 rue de la paix"))
        .await
        .unwrap()
        .unwrap_err();

    assert!(err.is_recoverable());
    assert!(matches!(
        err,
        Error::ServiceStatus {
            service: Service::Geocoding,
            status: 503
        }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || client_for(uri).fetch("1 rue de la paix"))
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }), "{err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(adresse_reply(RIVOLI_LABEL, RIVOLI_LAT, RIVOLI_LON))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = GeocoderConfig::default().with_base_url(server.uri());
    config.timeout_secs = 1;
    let err = tokio::task::spawn_blocking(move || {
        AdresseClient::new(&config).unwrap().geocode("10 rue de rivoli")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(
        err,
        Error::ServiceTimeout {
            service: Service::Geocoding,
            timeout_secs: 1
        }
    ));
}

#[test]
fn refused_connection_is_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client_for(format!("http://127.0.0.1:{port}"));
    let err = client.geocode("10 rue de rivoli").unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(
        err,
        Error::ServiceUnreachable {
            service: Service::Geocoding,
            ..
        }
    ));
}
