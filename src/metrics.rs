//! Prometheus metrics collection for roomcast.
//!
//! Exposed by the gateway on `GET /metrics`.
//!
//! - `roomcast_messages_persisted_total` - messages stored and broadcast
//! - `roomcast_store_failures_total{error}` - appends that failed
//! - `roomcast_frames_rejected_total{reason}` - inbound frames answered with an error
//! - `roomcast_slow_evictions_total` - sessions evicted on full outbound queues
//! - `roomcast_connections_refused_total{status}` - refused upgrade attempts
//! - `roomcast_active_rooms` / `roomcast_live_sessions` - current gauges
//! - `roomcast_message_fanout` - recipients per broadcast
//! - `roomcast_frame_duration_seconds{kind}` - coordinator time per inbound frame

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

/// Messages persisted (or accepted, for ephemeral rooms) and broadcast.
pub static MESSAGES_PERSISTED: OnceLock<IntCounter> = OnceLock::new();

/// Failed store appends by error code.
pub static STORE_FAILURES: OnceLock<IntCounterVec> = OnceLock::new();

/// Rejected inbound frames by reason.
pub static FRAMES_REJECTED: OnceLock<IntCounterVec> = OnceLock::new();

/// Sessions evicted because their outbound queue was full.
pub static SLOW_EVICTIONS: OnceLock<IntCounter> = OnceLock::new();

/// Refused connection attempts by HTTP status.
pub static CONNECTIONS_REFUSED: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Room coordinators currently running.
pub static ACTIVE_ROOMS: OnceLock<IntGauge> = OnceLock::new();

/// Sessions currently live across all rooms.
pub static LIVE_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Recipients per broadcast.
pub static MESSAGE_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Coordinator processing time per inbound frame kind.
pub static FRAME_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before any metrics are recorded. Updates
/// made before `init()` are silently skipped.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                let m = $init.expect(concat!(stringify!($metric), " creation failed"));
                if let Err(e) = r.register(Box::new(m.clone())) {
                    tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                }
                let _ = $metric.set(m);
            }
        };
    }

    register!(MESSAGES_PERSISTED, IntCounter::new("roomcast_messages_persisted_total", "Messages persisted and broadcast"));
    register!(STORE_FAILURES, IntCounterVec::new(Opts::new("roomcast_store_failures_total", "Failed message appends"), &["error"]));
    register!(FRAMES_REJECTED, IntCounterVec::new(Opts::new("roomcast_frames_rejected_total", "Inbound frames rejected"), &["reason"]));
    register!(SLOW_EVICTIONS, IntCounter::new("roomcast_slow_evictions_total", "Sessions evicted on full outbound queues"));
    register!(CONNECTIONS_REFUSED, IntCounterVec::new(Opts::new("roomcast_connections_refused_total", "Refused connection attempts"), &["status"]));
    register!(ACTIVE_ROOMS, IntGauge::new("roomcast_active_rooms", "Room coordinators running"));
    register!(LIVE_SESSIONS, IntGauge::new("roomcast_live_sessions", "Live sessions across all rooms"));
    register!(MESSAGE_FANOUT, Histogram::with_opts(
        HistogramOpts::new("roomcast_message_fanout", "Recipients per broadcast")
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0])));
    register!(FRAME_LATENCY, HistogramVec::new(
        HistogramOpts::new("roomcast_frame_duration_seconds", "Coordinator time per inbound frame")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["kind"]));
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

#[inline]
pub fn inc_messages_persisted() {
    if let Some(c) = MESSAGES_PERSISTED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_store_failure(error: &str) {
    if let Some(c) = STORE_FAILURES.get() {
        c.with_label_values(&[error]).inc();
    }
}

#[inline]
pub fn record_rejected_frame(reason: &str) {
    if let Some(c) = FRAMES_REJECTED.get() {
        c.with_label_values(&[reason]).inc();
    }
}

#[inline]
pub fn inc_slow_evictions() {
    if let Some(c) = SLOW_EVICTIONS.get() {
        c.inc();
    }
}

#[inline]
pub fn record_refusal(status: u16) {
    if let Some(c) = CONNECTIONS_REFUSED.get() {
        c.with_label_values(&[&status.to_string()]).inc();
    }
}

#[inline]
pub fn inc_active_rooms() {
    if let Some(g) = ACTIVE_ROOMS.get() {
        g.inc();
    }
}

#[inline]
pub fn inc_live_sessions() {
    if let Some(g) = LIVE_SESSIONS.get() {
        g.inc();
    }
}

#[inline]
pub fn dec_live_sessions() {
    if let Some(g) = LIVE_SESSIONS.get() {
        g.dec();
    }
}

/// Record message fan-out (how many sessions received a broadcast).
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = MESSAGE_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

/// Record coordinator processing time for one inbound frame.
#[inline]
pub fn record_frame(kind: &str, duration_secs: f64) {
    if let Some(h) = FRAME_LATENCY.get() {
        h.with_label_values(&[kind]).observe(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();
        // Second call must not double-register.
        init();

        record_rejected_frame("malformed");
        record_refusal(403);
        record_frame("message", 0.001);

        let output = gather_metrics();
        assert!(output.contains("roomcast_frames_rejected_total"));
        assert!(output.contains("roomcast_connections_refused_total"));
        assert!(output.contains("roomcast_frame_duration_seconds"));
    }
}
