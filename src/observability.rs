use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "roomledger_bookings_created_total";

/// Counter: bookings cancelled.
pub const BOOKINGS_CANCELLED_TOTAL: &str = "roomledger_bookings_cancelled_total";

/// Counter: bookings auto-completed by the sweep.
pub const BOOKINGS_COMPLETED_TOTAL: &str = "roomledger_bookings_completed_total";

/// Counter: availability checks served.
pub const AVAILABILITY_QUERIES_TOTAL: &str = "roomledger_availability_queries_total";

/// Counter: capacity searches served.
pub const SEARCH_QUERIES_TOTAL: &str = "roomledger_search_queries_total";

/// Histogram: availability query latency in seconds.
pub const QUERY_DURATION_SECONDS: &str = "roomledger_query_duration_seconds";

// ── Reconciliation metrics ──────────────────────────────────────

/// Counter: unit-calendar repair failures swallowed during cancellation.
pub const RECONCILE_FAILURES_TOTAL: &str = "roomledger_reconcile_failures_total";

/// Counter: stale unavailable-date entries dropped by the prune pass.
pub const CALENDAR_DAYS_PRUNED_TOTAL: &str = "roomledger_calendar_days_pruned_total";

/// Histogram: auto-complete sweep duration in seconds.
pub const SWEEP_DURATION_SECONDS: &str = "roomledger_sweep_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Line-oriented tracing output for embedders that don't bring their own
/// subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
