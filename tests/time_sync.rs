mod common;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::{closed_addr, init_logging, spawn_router};
use parkreserve::protocol::TimeResponse;
use parkreserve::sync::{ManualClock, ProbeSource};
use chrono::TimeDelta;
use parkreserve::{
    ClientConfig, ClockService, ReservationWindow, TimeServer, TimeServerConfig, TimeSynchronizer,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const CLIENT_NOW: i64 = 1_700_000_000_000;

/// Run a TimeServer reporting `server_now` on an ephemeral port
async fn spawn_time_server(server_now: i64) -> (SocketAddr, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let token = CancellationToken::new();
    let shutdown = token.clone();

    let server = TimeServer::with_config(TimeServerConfig::new(addr).timezone("UTC"))
        .with_clock(Arc::new(ManualClock::new(server_now)));
    tokio::spawn(async move {
        server
            .serve(listener, async move { shutdown.cancelled().await })
            .await
            .unwrap();
    });
    (addr, token)
}

fn frozen_clock() -> Arc<ClockService> {
    Arc::new(ClockService::new(Arc::new(ManualClock::new(CLIENT_NOW))))
}

fn local_only(addr: SocketAddr) -> ClientConfig {
    ClientConfig::default().time_url(format!("http://{addr}/api/time"))
}

fn synchronizer(config: ClientConfig, clock: Arc<ClockService>) -> TimeSynchronizer {
    TimeSynchronizer::new(config, clock).unwrap()
}

#[tokio::test]
async fn test_local_probe_sets_offset() {
    init_logging();
    let (addr, _server) = spawn_time_server(CLIENT_NOW + 90_000).await;
    let clock = frozen_clock();
    let sync = synchronizer(local_only(addr), clock.clone());

    assert!(sync.synchronize().await);

    // Frozen client clock: zero latency, so offset = T - t0
    let status = clock.status();
    assert_eq!(status.offset_ms, 90_000);
    assert_eq!(status.source, Some(ProbeSource::Local));
    assert!(status.attempted);
    assert_eq!(clock.adjusted_now_millis(), CLIENT_NOW + 90_000);
}

#[tokio::test]
async fn test_system_clocks_agree() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(TimeServer::new().serve(listener, std::future::pending()));

    let clock = Arc::new(ClockService::system());
    let sync = synchronizer(local_only(addr), clock.clone());

    assert!(sync.synchronize().await);
    assert!(clock.offset_ms().abs() < 1_000, "offset was {}ms", clock.offset_ms());
}

#[tokio::test]
async fn test_local_failure_without_remote_reports_failure() {
    init_logging();
    let clock = frozen_clock();
    let sync = synchronizer(local_only(closed_addr().await), clock.clone());

    assert!(!sync.synchronize().await);
    assert!(clock.has_attempted());
    assert_eq!(clock.offset_ms(), 0);
    assert_eq!(clock.status().source, None);
}

#[tokio::test]
async fn test_remote_probe_used_when_local_fails() {
    init_logging();
    let (remote, _server) = spawn_time_server(CLIENT_NOW - 4_000).await;
    let clock = frozen_clock();
    let config = local_only(closed_addr().await).api_url(format!("http://{remote}/api"));
    let sync = synchronizer(config, clock.clone());

    assert!(sync.synchronize().await);
    assert_eq!(clock.offset_ms(), -4_000);
    assert_eq!(clock.status().source, Some(ProbeSource::Remote));
}

#[tokio::test]
async fn test_non_success_status_is_a_probe_failure() {
    init_logging();
    let router = Router::new().route(
        "/api/time",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let (addr, _server) = spawn_router(router).await;
    let clock = frozen_clock();

    assert!(!synchronizer(local_only(addr), clock.clone()).synchronize().await);
    assert_eq!(clock.offset_ms(), 0);
}

#[tokio::test]
async fn test_failed_sync_keeps_previous_offset() {
    init_logging();
    let (addr, server) = spawn_time_server(CLIENT_NOW + 30_000).await;
    let clock = frozen_clock();

    assert!(synchronizer(local_only(addr), clock.clone()).synchronize().await);
    assert_eq!(clock.offset_ms(), 30_000);
    server.cancel();

    let dead = synchronizer(local_only(closed_addr().await), clock.clone());
    assert!(!dead.synchronize().await);
    assert_eq!(clock.offset_ms(), 30_000);
}

#[tokio::test]
async fn test_probe_timeout_aborts_slow_endpoint() {
    init_logging();
    let router = Router::new().route(
        "/api/time",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(TimeResponse {
                timestamp: 0,
                iso8601: None,
                timezone: None,
            })
        }),
    );
    let (addr, _server) = spawn_router(router).await;
    let clock = frozen_clock();
    let config = local_only(addr).probe_timeout(Duration::from_millis(100));

    let started = Instant::now();
    assert!(!synchronizer(config, clock.clone()).synchronize().await);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(clock.offset_ms(), 0);
}

#[tokio::test]
async fn test_overall_timeout_runs_fallback() {
    init_logging();
    let (good, _good_server) = spawn_time_server(CLIENT_NOW + 12_000).await;
    let clock = frozen_clock();
    assert!(synchronizer(local_only(good), clock.clone()).synchronize().await);

    let router = Router::new().route(
        "/api/time",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let (slow, _slow_server) = spawn_router(router).await;
    let sync = synchronizer(local_only(slow), clock.clone());

    let started = Instant::now();
    assert!(!sync.synchronize_within(Duration::from_millis(200)).await);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(clock.offset_ms(), 12_000);
}

#[tokio::test]
async fn test_overall_timeout_skips_remaining_endpoints() {
    init_logging();
    let slow = Router::new().route(
        "/api/time",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let (slow, _slow_server) = spawn_router(slow).await;

    let remote_hits = Arc::new(AtomicUsize::new(0));
    let counter = remote_hits.clone();
    let remote = Router::new().route(
        "/api/time/server-time",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(TimeResponse {
                    timestamp: CLIENT_NOW + 7_000,
                    iso8601: None,
                    timezone: None,
                })
            }
        }),
    );
    let (remote, _remote_server) = spawn_router(remote).await;

    let clock = frozen_clock();
    let config = local_only(slow).api_url(format!("http://{remote}/api"));
    let sync = synchronizer(config, clock.clone());

    let started = Instant::now();
    assert!(!sync.synchronize_within(Duration::from_millis(200)).await);
    assert!(started.elapsed() < Duration::from_secs(2));

    let status = clock.status();
    assert!(status.attempted);
    assert_eq!(status.offset_ms, 0);
    assert_eq!(status.source, None);
    assert_eq!(remote_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unrepresentable_server_time_is_rejected() {
    init_logging();
    let router = Router::new().route(
        "/api/time",
        get(|| async {
            Json(TimeResponse {
                timestamp: i64::MIN,
                iso8601: None,
                timezone: None,
            })
        }),
    );
    let (addr, _server) = spawn_router(router).await;
    let clock = frozen_clock();

    assert!(!synchronizer(local_only(addr), clock.clone()).synchronize().await);
    assert_eq!(clock.offset_ms(), 0);
    assert_eq!(clock.status().source, None);

    let start = clock.adjusted_now() + TimeDelta::minutes(10);
    let window = ReservationWindow::new(start, start + TimeDelta::hours(1));
    assert_eq!(window.validate(&clock), Ok(()));
}

#[tokio::test]
async fn test_synchronize_once_only_probes_once() {
    init_logging();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/api/time",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(TimeResponse {
                    timestamp: CLIENT_NOW + 500,
                    iso8601: None,
                    timezone: None,
                })
            }
        }),
    );
    let (addr, _server) = spawn_router(router).await;
    let clock = frozen_clock();
    let sync = synchronizer(local_only(addr), clock.clone());

    assert_eq!(sync.synchronize_once().await, Some(true));
    assert_eq!(sync.synchronize_once().await, None);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(clock.offset_ms(), 500);
}

#[tokio::test]
async fn test_concurrent_synchronize_calls_are_serialized() {
    init_logging();
    let (addr, _server) = spawn_time_server(CLIENT_NOW + 1_000).await;
    let clock = frozen_clock();
    let sync = synchronizer(local_only(addr), clock.clone());

    let (a, b) = tokio::join!(sync.synchronize(), sync.synchronize());
    assert!(a && b);
    assert_eq!(clock.offset_ms(), 1_000);
}

#[tokio::test]
async fn test_time_endpoint_shape() {
    init_logging();
    let (addr, _server) = spawn_time_server(1_735_732_800_123).await;

    for path in ["/api/time", "/api/time/server-time"] {
        let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );

        let body: TimeResponse = response.json().await.unwrap();
        assert_eq!(body.timestamp, 1_735_732_800_123);
        assert_eq!(body.iso8601.as_deref(), Some("2025-01-01T12:00:00.123Z"));
        assert_eq!(body.timezone.as_deref(), Some("UTC"));
    }
}
