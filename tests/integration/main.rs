//! End-to-end tests for `GET /api/fetch-data` against local fake upstreams.


use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use concurrent_api::aggregate::{DataAggregator, MergedResponse};
use concurrent_api::api::{create_router, AppState, FETCH_FAILED_MESSAGE};
use concurrent_api::upstream::UpstreamClient;

use upstream::{Behavior, FakeUpstream, SLOW};

const TIMEOUT: Duration = Duration::from_millis(300);

fn aggregator(
    server: &FakeUpstream,
    api1: Behavior,
    api2: Behavior,
    timeout: Duration,
) -> DataAggregator {
    let client = UpstreamClient::with_timeout(timeout).unwrap();
    DataAggregator::with_client(client, server.url(api1), server.url(api2))
}

fn app(server: &FakeUpstream, api1: Behavior, api2: Behavior) -> Router {
    create_router(AppState::new(aggregator(server, api1, api2, TIMEOUT)))
}

async fn get_fetch_data(app: Router) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/fetch-data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    (status, content_type, body)
}

fn one() -> Value {
    json!({"source": "one", "values": [1, 2]})
}

fn two() -> Value {
    json!({"source": "two", "nested": {"flag": true}})
}

fn both_failed() -> Value {
    json!({"Error": "Both API Calls failed due to network connection"})
}

#[tokio::test]
async fn both_succeed_returns_both_objects() {
    let server = FakeUpstream::start().await;

    let (status, content_type, body) =
        get_fetch_data(app(&server, Behavior::OkOne, Behavior::OkTwo)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"api1Response": one(), "api2Response": two()}));
}

#[tokio::test]
async fn second_timeout_returns_first_only() {
    let server = FakeUpstream::start().await;

    let (status, _, body) = get_fetch_data(app(&server, Behavior::OkOne, Behavior::Hang)).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"api1Response": one()}));
}

#[tokio::test]
async fn first_error_returns_second_only() {
    let server = FakeUpstream::start().await;

    let (status, _, body) =
        get_fetch_data(app(&server, Behavior::Unavailable, Behavior::OkTwo)).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"api2Response": two()}));
}

#[tokio::test]
async fn both_fail_returns_400() {
    let server = FakeUpstream::start().await;

    let (status, content_type, body) =
        get_fetch_data(app(&server, Behavior::Refused, Behavior::Hang)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, both_failed());
}

#[tokio::test]
async fn blank_body_counts_as_failure() {
    let server = FakeUpstream::start().await;

    let (status, _, body) = get_fetch_data(app(&server, Behavior::Blank, Behavior::OkTwo)).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"api2Response": two()}));
}

#[tokio::test]
async fn malformed_body_returns_500_without_details() {
    let server = FakeUpstream::start().await;

    let (status, content_type, body) =
        get_fetch_data(app(&server, Behavior::OkOne, Behavior::Malformed)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(String::from_utf8(body).unwrap(), FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn non_object_body_returns_500() {
    let server = FakeUpstream::start().await;

    let (status, _, body) = get_fetch_data(app(&server, Behavior::Array, Behavior::Refused)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn outcome_matrix_follows_merge_precedence() {
    let server = FakeUpstream::start().await;

    let first = [
        (Behavior::OkOne, true),
        (Behavior::Unavailable, false),
        (Behavior::Hang, false),
    ];
    let second = [
        (Behavior::OkTwo, true),
        (Behavior::Refused, false),
        (Behavior::Hang, false),
    ];

    for (api1, api1_ok) in first {
        for (api2, api2_ok) in second {
            let merged = aggregator(&server, api1, api2, TIMEOUT)
                .fetch_data()
                .await
                .unwrap();

            let expected = match (api1_ok, api2_ok) {
                (true, true) => "both",
                (true, false) => "api1",
                (false, true) => "api2",
                (false, false) => "error",
            };
            let actual = match &merged {
                MergedResponse::Both { .. } => "both",
                MergedResponse::Api1Only(_) => "api1",
                MergedResponse::Api2Only(_) => "api2",
                MergedResponse::BothFailed => "error",
            };
            assert_eq!(actual, expected, "api1={api1:?} api2={api2:?}");
        }
    }
}

#[tokio::test]
async fn slow_calls_run_concurrently() {
    let server = FakeUpstream::start().await;
    let aggregator = aggregator(
        &server,
        Behavior::SlowOne,
        Behavior::SlowTwo,
        Duration::from_secs(5),
    );

    let start = Instant::now();
    let merged = aggregator.fetch_data().await.unwrap();
    let elapsed = start.elapsed();

    assert!(matches!(merged, MergedResponse::Both { .. }));
    assert!(elapsed >= SLOW);
    assert!(elapsed < SLOW * 2, "calls ran sequentially: {elapsed:?}");
}

#[tokio::test]
async fn both_timeouts_bounded_by_single_timeout() {
    let server = FakeUpstream::start().await;
    let timeout = Duration::from_millis(500);
    let aggregator = aggregator(&server, Behavior::Hang, Behavior::Hang, timeout);

    let start = Instant::now();
    let merged = aggregator.fetch_data().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(merged, MergedResponse::BothFailed);
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout * 2, "timeouts were sequential: {elapsed:?}");
}

#[tokio::test]
async fn dropping_fetch_cancels_both_upstream_calls() {
    let server = FakeUpstream::start().await;
    let aggregator = aggregator(
        &server,
        Behavior::Hang,
        Behavior::Hang,
        Duration::from_secs(10),
    );

    let result = tokio::time::timeout(Duration::from_millis(200), aggregator.fetch_data()).await;
    assert!(result.is_err(), "fetch should still be pending");
    assert_eq!(server.hangs_started(), 2);

    // The server notices the closed connections asynchronously.
    let deadline = Instant::now() + Duration::from_secs(5);
    while server.hangs_cancelled() < 2 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(server.hangs_cancelled(), 2);
}
