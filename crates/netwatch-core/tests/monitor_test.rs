#![cfg(unix)]
#![allow(clippy::unwrap_used)]
// End-to-end sampling cycle tests: a canned connection table, a temp-dir
// statistics tree, and wiremock standing in for both lookup services.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwatch_core::{
    Connection, LOCATION_UNKNOWN, Monitor, MonitorConfig, PUBLIC_IP_ERROR, Resolver,
};

// ── Helpers ─────────────────────────────────────────────────────────

const ROW_A: &str = "tcp 0 0 10.0.0.5:4521 93.1.2.3:443 ESTABLISHED";
const ROW_B: &str = "tcp 0 0 10.0.0.5:4522 93.1.2.3:8443 ESTABLISHED";
const ROW_C: &str = "tcp 0 0 10.0.0.5:22 198.51.100.20:50122 ESTABLISHED";
const ROW_LOOPBACK: &str = "tcp 0 0 127.0.0.1:5432 127.0.0.1:41122 ESTABLISHED";

fn stats_tree(tx: u64, rx: u64) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let stats = dir.path().join("eth0").join("statistics");
    std::fs::create_dir_all(&stats).unwrap();
    std::fs::write(stats.join("tx_bytes"), format!("{tx}\n")).unwrap();
    std::fs::write(stats.join("rx_bytes"), format!("{rx}\n")).unwrap();
    dir
}

fn config(server: &MockServer, stats: &TempDir, rows: &[&str]) -> MonitorConfig {
    let mut command = vec!["printf".to_owned(), "%s\\n".to_owned()];
    command.extend(rows.iter().map(|r| (*r).to_owned()));
    MonitorConfig {
        stats_root: stats.path().to_path_buf(),
        connection_command: command,
        sample_window: Duration::from_millis(10),
        refresh_interval: Duration::from_millis(10),
        public_ip_url: format!("{}/ip", server.uri()),
        geo_url: server.uri(),
        timeout: Duration::from_secs(5),
        ..MonitorConfig::default()
    }
}

async fn mount_geo(server: &MockServer, address: &str, city: &str, country: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/json/{address}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "city": city,
            "country": country,
        })))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_public_ip(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// ── Full cycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_snapshot_enriches_every_connection() {
    let server = MockServer::start().await;
    let stats = stats_tree(1_000, 2_000);
    mount_public_ip(&server, "203.0.113.7\n").await;
    mount_geo(&server, "93.1.2.3", "Paris", "France", 1).await;
    mount_geo(&server, "198.51.100.20", "Oslo", "Norway", 1).await;

    let monitor =
        Monitor::new(config(&server, &stats, &[ROW_A, ROW_B, ROW_C, ROW_LOOPBACK])).unwrap();
    let snapshot = monitor.snapshot().await;

    assert_eq!(snapshot.public_address, "203.0.113.7");
    assert_eq!(snapshot.connection_count(), 3);

    let rows: Vec<(&str, &str, &str)> = snapshot
        .connections
        .iter()
        .map(|c| {
            (
                c.connection.peer_address.as_str(),
                c.connection.peer_port.as_str(),
                c.location.as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("93.1.2.3", "443", "Paris, France"),
            ("93.1.2.3", "8443", "Paris, France"),
            ("198.51.100.20", "50122", "Oslo, Norway"),
        ]
    );

    // Static counters: zero throughput, but still a measurement.
    let total = snapshot.total.unwrap();
    assert!(total.tx_kbps.abs() < f64::EPSILON);
    assert!(!total.clamped);
    assert!(snapshot.connections.iter().all(|c| c.share.is_some()));
    assert_eq!(monitor.lookup_failures().geolocation, 0);
}

#[tokio::test]
async fn test_snapshot_degrades_when_lookups_fail() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let monitor = Monitor::new(config(&server, &stats, &[ROW_A, ROW_C])).unwrap();
    let snapshot = monitor.snapshot().await;

    assert_eq!(snapshot.public_address, PUBLIC_IP_ERROR);
    assert!(
        snapshot
            .connections
            .iter()
            .all(|c| c.location == LOCATION_UNKNOWN)
    );

    let failures = monitor.lookup_failures();
    assert_eq!(failures.geolocation, 2);
    assert_eq!(failures.public_address, 1);
}

#[tokio::test]
async fn test_snapshot_without_interface_has_no_bandwidth() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    mount_public_ip(&server, "203.0.113.7").await;
    mount_geo(&server, "93.1.2.3", "Paris", "France", 1).await;

    let mut cfg = config(&server, &stats, &[ROW_A]);
    cfg.interface = "wlan9".into();
    let monitor = Monitor::new(cfg).unwrap();

    let snapshot = monitor.snapshot().await;
    assert!(snapshot.total.is_none());
    assert_eq!(snapshot.connections.len(), 1);
    assert!(snapshot.connections[0].share.is_none());
    assert!(monitor.measure().await.is_err());
}

#[tokio::test]
async fn test_snapshot_with_failing_sampler_is_empty() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    mount_public_ip(&server, "203.0.113.7").await;

    let mut cfg = config(&server, &stats, &[]);
    cfg.connection_command = vec!["false".into()];
    let monitor = Monitor::new(cfg).unwrap();

    let snapshot = monitor.snapshot().await;
    assert!(snapshot.connections.is_empty());
    assert_eq!(snapshot.public_address, "203.0.113.7");
}

// ── Resolver fan-out ────────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_all_queries_each_address_once() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    mount_geo(&server, "93.1.2.3", "Paris", "France", 1).await;
    mount_geo(&server, "198.51.100.20", "Oslo", "Norway", 1).await;

    let resolver = Resolver::from_config(&config(&server, &stats, &[])).unwrap();
    let connections = vec![
        Connection::new("93.1.2.3", "443"),
        Connection::new("198.51.100.20", "22"),
        Connection::new("93.1.2.3", "80"),
        Connection::new("93.1.2.3", "8080"),
    ];

    let locations = resolver.resolve_all(&connections).await;
    let keys: Vec<&str> = locations.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["93.1.2.3", "198.51.100.20"]);
    assert_eq!(locations["198.51.100.20"], "Oslo, Norway");
    // `expect(1)` on each mock is verified when `server` drops.
}

#[tokio::test]
async fn test_resolve_fail_status_falls_back() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    Mock::given(method("GET"))
        .and(path("/json/10.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "fail"})))
        .mount(&server)
        .await;

    let resolver = Resolver::from_config(&config(&server, &stats, &[])).unwrap();
    assert_eq!(resolver.resolve("10.0.0.1").await, LOCATION_UNKNOWN);
}

#[tokio::test]
async fn test_resolve_success_formats_city_country() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    mount_geo(&server, "93.1.2.3", "Paris", "France", 1).await;

    let resolver = Resolver::from_config(&config(&server, &stats, &[])).unwrap();
    assert_eq!(resolver.resolve("93.1.2.3").await, "Paris, France");
}

#[tokio::test]
async fn test_resolve_self_network_error_falls_back() {
    let server = MockServer::start().await;
    let stats = stats_tree(0, 0);
    let cfg = config(&server, &stats, &[]);
    drop(server);

    let resolver = Resolver::from_config(&cfg).unwrap();
    assert_eq!(resolver.resolve_self().await, PUBLIC_IP_ERROR);
    assert_eq!(resolver.resolve("93.1.2.3").await, LOCATION_UNKNOWN);
}
