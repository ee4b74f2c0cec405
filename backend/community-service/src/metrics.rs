//! Prometheus metrics for community-service.
//!
//! Listing and notification collectors plus the `/metrics` handler.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Paginated listings served, by listing name.
    pub static ref LISTING_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "community_listing_requests_total",
        "Paginated listings served segmented by listing",
        &["listing"]
    )
    .expect("failed to register community_listing_requests_total");

    /// Number of items returned per listing page.
    pub static ref LISTING_PAGE_SIZE: HistogramVec = register_histogram_vec!(
        "community_listing_page_size",
        "Items returned per listing page",
        &["listing"],
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]
    )
    .expect("failed to register community_listing_page_size");

    /// Rejected page requests (conflicting_cursors / invalid_cursor).
    pub static ref PAGINATION_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "community_pagination_errors_total",
        "Rejected page requests segmented by listing and reason",
        &["listing", "reason"]
    )
    .expect("failed to register community_pagination_errors_total");

    /// Notification dispatcher outcomes (stored, pushed, push_failed, store_failed, dropped).
    pub static ref NOTIFICATION_DISPATCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "community_notification_dispatch_total",
        "Notification dispatch outcomes segmented by event kind",
        &["kind", "outcome"]
    )
    .expect("failed to register community_notification_dispatch_total");
}

pub fn record_listing(listing: &str, items: usize) {
    LISTING_REQUESTS_TOTAL.with_label_values(&[listing]).inc();
    LISTING_PAGE_SIZE
        .with_label_values(&[listing])
        .observe(items as f64);
}

pub fn record_pagination_error(listing: &str, reason: &str) {
    PAGINATION_ERRORS_TOTAL
        .with_label_values(&[listing, reason])
        .inc();
}

pub fn record_dispatch(kind: &str, outcome: &str, count: u64) {
    NOTIFICATION_DISPATCH_TOTAL
        .with_label_values(&[kind, outcome])
        .inc_by(count);
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_counter_accumulates() {
        let before = NOTIFICATION_DISPATCH_TOTAL
            .with_label_values(&["test_kind", "stored"])
            .get();
        record_dispatch("test_kind", "stored", 3);
        let after = NOTIFICATION_DISPATCH_TOTAL
            .with_label_values(&["test_kind", "stored"])
            .get();
        assert_eq!(after - before, 3);
    }

    #[actix_web::test]
    async fn metrics_endpoint_renders_text() {
        record_listing("metrics_test", 2);
        let response = serve_metrics().await;
        assert!(response.status().is_success());
    }
}
