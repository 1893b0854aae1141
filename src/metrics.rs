//! Prometheus metrics collection for chatterd.
//!
//! Tracks connection counts, roster size, event throughput, rejection
//! rates, and broadcast fan-out, exposed on an HTTP endpoint for scraping.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Total server events successfully queued to clients.
pub static EVENTS_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Total events dropped because a client's send queue was full.
pub static SEND_QUEUE_DROPPED: OnceLock<IntCounter> = OnceLock::new();

/// Session events processed by kind.
pub static EVENT_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Session event rejections by kind and error code.
pub static EVENT_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently connected clients.
pub static CONNECTED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

/// Distinct display names currently in the roster.
pub static ROSTER_NAMES: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Session event processing latency by kind.
pub static EVENT_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Recipients per broadcast.
pub static BROADCAST_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(
        EVENTS_SENT,
        IntCounter::new("chat_events_sent_total", "Events queued to clients")
    );
    register!(
        SEND_QUEUE_DROPPED,
        IntCounter::new(
            "chat_send_queue_dropped_total",
            "Events dropped due to send-queue overflow"
        )
    );
    register!(
        CONNECTED_CLIENTS,
        IntGauge::new("chat_connected_clients", "Currently connected clients")
    );
    register!(
        ROSTER_NAMES,
        IntGauge::new("chat_roster_names", "Distinct display names in the roster")
    );
    register!(
        EVENT_COUNTER,
        IntCounterVec::new(
            Opts::new("chat_event_total", "Session events processed by kind"),
            &["event"]
        )
    );
    register!(
        EVENT_LATENCY,
        HistogramVec::new(
            HistogramOpts::new(
                "chat_event_duration_seconds",
                "Session event latency by kind"
            )
            .buckets(vec![
                0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5
            ]),
            &["event"]
        )
    );
    register!(
        EVENT_ERRORS,
        IntCounterVec::new(
            Opts::new(
                "chat_event_errors_total",
                "Session event rejections by kind and error"
            ),
            &["event", "error"]
        )
    );
    register!(
        BROADCAST_FANOUT,
        Histogram::with_opts(
            HistogramOpts::new("chat_broadcast_fanout", "Recipients per broadcast").buckets(vec![
                1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0
            ])
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a processed session event with latency.
#[inline]
pub fn record_event(event: &str, duration_secs: f64) {
    if let Some(c) = EVENT_COUNTER.get() {
        c.with_label_values(&[event]).inc();
    }
    if let Some(h) = EVENT_LATENCY.get() {
        h.with_label_values(&[event]).observe(duration_secs);
    }
}

/// Record a rejected session event.
#[inline]
pub fn record_event_error(event: &str, error: &str) {
    if let Some(c) = EVENT_ERRORS.get() {
        c.with_label_values(&[event, error]).inc();
    }
}

/// Record broadcast fan-out (how many recipients received an event).
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = BROADCAST_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

/// Update the roster-size gauge.
#[inline]
pub fn set_roster_size(names: usize) {
    if let Some(g) = ROSTER_NAMES.get() {
        g.set(names as i64);
    }
}

#[inline]
pub fn inc_connected() {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.inc();
    }
}

#[inline]
pub fn dec_connected() {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.dec();
    }
}

#[inline]
pub fn inc_sent() {
    if let Some(c) = EVENTS_SENT.get() {
        c.inc();
    }
}

#[inline]
pub fn inc_send_queue_dropped() {
    if let Some(c) = SEND_QUEUE_DROPPED.get() {
        c.inc();
    }
}
