use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

// Prometheus metrics (default registry)
pub static UPLOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "json_inbox_uploads_total",
        "Total payloads accepted by /upload"
    )
    .expect("register uploads_total")
});

pub static UPLOADS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "json_inbox_uploads_rejected_total",
        "Total /upload requests rejected as missing or invalid JSON"
    )
    .expect("register uploads_rejected_total")
});

pub static STORED_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "json_inbox_stored_items",
        "Number of payloads currently held in memory"
    )
    .expect("register stored_items")
});

/// Count an accepted upload; `total` is the store length right after it.
/// Must run under the store's write lock so the gauge never moves backwards.
pub fn record_stored(total: usize) {
    UPLOADS_TOTAL.inc();
    STORED_ITEMS.set(i64::try_from(total).unwrap_or(i64::MAX));
}

pub fn record_rejected() {
    UPLOADS_REJECTED_TOTAL.inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    // register eagerly so a fresh process exposes zeroed series
    Lazy::force(&UPLOADS_TOTAL);
    Lazy::force(&UPLOADS_REJECTED_TOTAL);
    Lazy::force(&STORED_ITEMS);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
