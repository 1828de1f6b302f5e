//! Integration tests for the net crate

use httpmock::prelude::*;
use keg_net::{download_to_path, NetClient, NetConfig};
use std::time::Duration;

fn test_client() -> NetClient {
    NetClient::new(NetConfig {
        retry_count: 1,
        retry_delay: Duration::from_millis(10),
        ..NetConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_download_to_path() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/archive.tar.gz");
        then.status(200).body(b"archive bytes");
    });

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("archive.tar.gz");

    let client = test_client();
    let bytes = download_to_path(&client, &server.url("/archive.tar.gz"), &dest, None)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(bytes, 13);
    assert_eq!(std::fs::read(&dest).unwrap(), b"archive bytes");
}

#[tokio::test]
async fn test_download_emits_events() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a.tar.gz");
        then.status(200).body(b"payload");
    });

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("a.tar.gz");
    let (tx, mut rx) = keg_events::channel();

    let client = test_client();
    download_to_path(&client, &server.url("/a.tar.gz"), &dest, Some(&tx))
        .await
        .unwrap();
    drop(tx);

    let mut saw_started = false;
    let mut saw_completed = false;
    while let Some(event) = rx.recv().await {
        match event {
            keg_events::AppEvent::Download(keg_events::DownloadEvent::Started { .. }) => {
                saw_started = true;
            }
            keg_events::AppEvent::Download(keg_events::DownloadEvent::Completed {
                bytes_downloaded,
                ..
            }) => {
                assert_eq!(bytes_downloaded, 7);
                saw_completed = true;
            }
            _ => {}
        }
    }
    assert!(saw_started);
    assert!(saw_completed);
}

#[tokio::test]
async fn test_download_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.tar.gz");
        then.status(404);
    });

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("missing.tar.gz");

    let client = test_client();
    let result = download_to_path(&client, &server.url("/missing.tar.gz"), &dest, None).await;

    match result {
        Err(keg_errors::Error::Network(keg_errors::NetworkError::HttpError {
            status, ..
        })) => assert_eq!(status, 404),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_download_rejects_bad_scheme() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("x");

    let client = test_client();
    let result = download_to_path(&client, "ftp://example.com/x", &dest, None).await;
    assert!(matches!(
        result,
        Err(keg_errors::Error::Network(
            keg_errors::NetworkError::UnsupportedProtocol { .. }
        ))
    ));
    // Nothing was written
    assert!(!dest.exists());
}
