use std::time::Duration;

use httpmock::prelude::*;
use signalboard::source::{Payload, Request, SourceError};
use signalboard::{Classification, Classified, HttpSource, SignalClient, SignalSource};

fn client_for(server: &MockServer) -> SignalClient {
    SignalClient::builder()
        .endpoint(server.base_url())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn fetch_all_returns_signals_in_order() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signal/all");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":"api","value":1},{"id":"db","value":0.4},{"id":"queue"}]"#);
        })
        .await;

    let signals = client_for(&server).fetch_all().await.unwrap();

    let ids: Vec<_> = signals.iter().map(|s| s.id.as_deref().unwrap()).collect();
    assert_eq!(ids, ["api", "db", "queue"]);
    assert_eq!(signals[0].classification(), Classification::Success);
    assert_eq!(signals[1].classification(), Classification::Error);
    assert_eq!(signals[2].classification(), Classification::Undefined);
}

#[tokio::test]
async fn fetch_full_returns_dependency_tree() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signal/db-primary/full");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"id":"db-primary","value":0.9,
                        "dependencies":[{"id":"disk","value":0.3}]}"#,
                );
        })
        .await;

    let signal = client_for(&server).fetch_full("db-primary").await.unwrap();

    mock.assert_async().await;
    assert!(signal.is_warning());
    let deps = signal.dependencies.unwrap();
    assert_eq!(deps[0].id.as_deref(), Some("disk"));
    assert!(deps[0].is_error());
}

#[tokio::test]
async fn fetch_full_maps_404_to_not_found() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signal/ghost/full");
            then.status(404);
        })
        .await;

    let err = client_for(&server).fetch_full("ghost").await.unwrap_err();
    assert!(matches!(err, SourceError::NotFound(ref id) if id == "ghost"));
}

#[tokio::test]
async fn fetch_all_reports_server_error_status() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signal/all");
            then.status(500);
        })
        .await;

    let err = client_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Status(500)));
}

#[tokio::test]
async fn fetch_all_rejects_malformed_body() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signal/all");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":"api","value":"high"}]"#);
        })
        .await;

    let err = client_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_source_delivers_completion_through_poll() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signal/all");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":"api","value":0.75}]"#);
        })
        .await;

    let mut source = HttpSource::new(client_for(&server), tokio::runtime::Handle::current());
    assert!(source.description().contains(&server.base_url()));

    source.request(Request::All);

    let mut completion = None;
    for _ in 0..100 {
        if let Some(done) = source.poll() {
            completion = Some(done);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let completion = completion.expect("no completion within 2s");
    assert_eq!(completion.request, Request::All);
    match completion.result.unwrap() {
        Payload::List(signals) => assert_eq!(signals[0].id.as_deref(), Some("api")),
        other => panic!("unexpected payload: {:?}", other),
    }
    assert_eq!(source.in_flight(), 0);

    source.shutdown();
}
