//! HTTP archive fetching against a mock server.

mod common;

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{WGS84_PRJ, fire, shapefile_zip};
use nfdb_fires::config::LoaderConfig;
use nfdb_fires::data::{ArchiveSource, HttpArchiveSource};
use nfdb_fires::{ErrorKind, FireDataLoader};

fn archive() -> Vec<u8> {
    shapefile_zip(
        "",
        "NFDB_point",
        Some(WGS84_PRJ),
        &[
            fire("A001", "Rouge", "2023/06/12", Some(48.25), Some(-70.1)),
            fire("A002", "Bleu", "", Some(47.7), Some(-72.5)),
        ],
    )
}

async fn serve(status: u16, body: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nfdb/NFDB_point.zip"))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn downloads_and_loads_archive() {
    let server = serve(200, archive()).await;
    let config = LoaderConfig::default()
        .with_url(format!("{}/nfdb/NFDB_point.zip", server.uri()))
        .with_timeout(Some(Duration::from_secs(10)));

    // the blocking client must live and die off the async runtime
    let (rows, pass_rate) = tokio::task::spawn_blocking(move || {
        let mut loader = FireDataLoader::new(&config).unwrap();
        let rows = loader.load(false, true).unwrap().len();
        (rows, loader.last_report().unwrap().pass_rate)
    })
    .await
    .unwrap();

    assert_eq!(rows, 2);
    assert_eq!(pass_rate, 1.0);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_is_network_error() {
    let server = serve(503, Vec::new()).await;
    let config = LoaderConfig::default().with_url(format!("{}/nfdb/NFDB_point.zip", server.uri()));

    let err = tokio::task::spawn_blocking(move || {
        HttpArchiveSource::new(&config).unwrap().fetch().unwrap_err()
    })
    .await
    .unwrap();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.message().contains("503"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_path_is_network_error() {
    let server = serve(200, archive()).await;
    let config = LoaderConfig::default().with_url(format!("{}/elsewhere.zip", server.uri()));

    let err = tokio::task::spawn_blocking(move || {
        let mut loader = FireDataLoader::new(&config).unwrap();
        let err = loader.load(false, true).unwrap_err();
        assert!(loader.data().is_none());
        err
    })
    .await
    .unwrap();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn unreachable_host_is_network_error() {
    let config = LoaderConfig::default()
        .with_url("http://127.0.0.1:9/NFDB_point.zip")
        .with_timeout(Some(Duration::from_secs(2)));
    let err = HttpArchiveSource::new(&config).unwrap().fetch().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
