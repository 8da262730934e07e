//! Telemetry utilities for frame timing and log correlation.

use std::time::Instant;

/// Guard for timing inbound frame processing and recording metrics.
///
/// Records latency when dropped, so early returns are measured too.
pub struct FrameTimer {
    kind: &'static str,
    start: Instant,
}

impl FrameTimer {
    /// Start timing a frame of the given kind.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            start: Instant::now(),
        }
    }

    /// Relabel the frame once its kind is known.
    pub fn set_kind(&mut self, kind: &'static str) {
        self.kind = kind;
    }
}

impl Drop for FrameTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_frame(self.kind, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span for one upgraded connection.
    pub fn connection(room: &str, session: &str, user: &str) -> Span {
        info_span!("connection", room = %room, session = %session, user = %user)
    }

    /// Span for one room coordinator task.
    pub fn room(room: &str) -> Span {
        info_span!("room", room = %room)
    }
}
