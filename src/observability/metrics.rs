//! Prometheus counters for refreshes and upstream calls.
//!
//! Recording is a no-op until `init_exporter` installs a recorder, so library
//! code and tests can call these freely.

use std::fmt;
use std::net::SocketAddr;
use tracing::{info, warn};

/// Every metric name the service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RefreshSuccess,
    RefreshError,
    VerseRequestsSuccess,
    VerseRequestsError,
    ImageHits,
    ImageMisses,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RefreshSuccess => "ayah_refresh_success_total",
            MetricName::RefreshError => "ayah_refresh_error_total",
            MetricName::VerseRequestsSuccess => "ayah_verse_requests_success_total",
            MetricName::VerseRequestsError => "ayah_verse_requests_error_total",
            MetricName::ImageHits => "ayah_background_image_hits_total",
            MetricName::ImageMisses => "ayah_background_image_misses_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn increment(name: MetricName) {
    ::metrics::counter!(name.as_str()).increment(1);
}

pub fn refresh(ok: bool) {
    increment(if ok { MetricName::RefreshSuccess } else { MetricName::RefreshError });
}

pub fn verse_request(ok: bool) {
    increment(if ok { MetricName::VerseRequestsSuccess } else { MetricName::VerseRequestsError });
}

pub fn background_image(hit: bool) {
    increment(if hit { MetricName::ImageHits } else { MetricName::ImageMisses });
}

/// Starts the Prometheus scrape listener on `0.0.0.0:{port}`.
pub fn init_exporter(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!(%addr, "Prometheus exporter listening on /metrics"),
        Err(e) => warn!(%addr, error = %e, "Prometheus exporter install failed"),
    }
}
