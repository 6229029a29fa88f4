//! End-to-end tests: the generator against a real backend router, and the
//! binary's startup behavior.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use podscope_api::{Backend, build_router};
use podscope_cluster::{ConfigData, FakeControlPlane};
use podscope_metrics::MetricsRegistry;
use podscope_traffic::config::ENDPOINTS;
use podscope_traffic::{GeneratorConfig, PollScheduler, TrafficGenerator};

fn app_config() -> ConfigData {
    BTreeMap::from([
        ("APP_NAME".to_string(), "x".to_string()),
        ("ENVIRONMENT".to_string(), "prod".to_string()),
        ("LOG_LEVEL".to_string(), "info".to_string()),
    ])
}

async fn spawn_backend(cp: FakeControlPlane) -> (SocketAddr, Arc<MetricsRegistry>) {
    let metrics = Arc::new(MetricsRegistry::new());
    let backend = Backend::new(cp, metrics.clone(), "default", "app-config");
    let router = build_router(Arc::new(backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, metrics)
}

fn generator_for(addr: SocketAddr) -> TrafficGenerator {
    TrafficGenerator::new(&GeneratorConfig {
        backend_url: format!("http://{addr}"),
        interval: Duration::from_millis(100),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        request_timeout: Duration::from_secs(10),
        cycle_timeout: Duration::from_secs(30),
    })
}

#[tokio::test]
async fn one_cycle_hits_every_backend_route() {
    let cp = FakeControlPlane::new().with_config("default", "app-config", app_config());
    let (addr, metrics) = spawn_backend(cp).await;

    let report = generator_for(addr).run_cycle().await;

    assert_eq!(report.completed(), 5);
    assert!(report.outcomes.iter().all(|o| o.status() == Some(200)));

    for path in ENDPOINTS {
        assert_eq!(metrics.request_count(path, 200).await, 1, "{path}");
    }
    assert_eq!(metrics.configmap_reads(), 1);
}

#[tokio::test]
async fn missing_configmap_shows_up_as_error_status() {
    // No config registered: /config answers 500, the cycle carries on.
    let (addr, metrics) = spawn_backend(FakeControlPlane::new()).await;

    let report = generator_for(addr).run_cycle().await;

    assert_eq!(report.completed(), 5);
    assert_eq!(report.error_statuses(), 1);
    assert_eq!(report.outcomes[2].status(), Some(500));
    assert_eq!(metrics.request_count("/config", 500).await, 1);
    assert_eq!(metrics.request_count("/pods", 200).await, 1);
    assert_eq!(metrics.configmap_reads(), 0);
}

#[tokio::test]
async fn scheduled_cycles_accumulate_on_backend() {
    let cp = FakeControlPlane::new().with_config("default", "app-config", app_config());
    let (addr, metrics) = spawn_backend(cp).await;
    let generator = &generator_for(addr);

    let (tx, rx) = tokio::sync::watch::channel(false);
    let cycles = Arc::new(AtomicUsize::new(0));

    let done = cycles.clone();
    let stopper = async move {
        while done.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tx.send(true).unwrap();
    };

    let counted = cycles.clone();
    let scheduler = PollScheduler::new(Duration::from_millis(100));
    let scheduled = scheduler.run(rx, move || {
        let counted = counted.clone();
        async move {
            generator.run_cycle().await;
            counted.fetch_add(1, Ordering::SeqCst);
        }
    });

    let (runs, ()) = tokio::join!(scheduled, stopper);

    assert!(runs >= 3);
    assert_eq!(metrics.request_count("/health", 200).await, runs);
    assert_eq!(metrics.configmap_reads(), runs);
}

#[test]
fn bad_interval_exits_before_any_request() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_traffic-gen"))
        .env("BACKEND_URL", format!("http://{addr}"))
        .env("INTERVAL", "bad-value")
        .env("LOG_FORMAT", "text")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let errors: Vec<&str> = stdout.lines().filter(|l| l.contains("ERROR")).collect();
    assert_eq!(errors.len(), 1, "{stdout}");
    assert!(errors[0].contains("invalid INTERVAL"), "{stdout}");
    // The error is reported once, through the log only.
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));

    // Nothing ever connected.
    assert!(listener.accept().is_err());
}
