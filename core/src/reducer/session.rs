use crate::diagnostics::{LogManager, MetricsRecorder};
use crate::prelude::{Clock, DisplayAdapter, ReduceError, TelemetrySubscriber};
use crate::reducer::{reduce, DisplayState};
use std::sync::Arc;

/// Binds the reducer to a display for the lifetime of one subscription.
///
/// Messages are handled one at a time; a rejected message is logged, counted
/// and dropped, and never ends the session.
pub struct Session<A: DisplayAdapter, C: Clock> {
    state: DisplayState,
    adapter: A,
    clock: C,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl<A: DisplayAdapter, C: Clock> Session<A, C> {
    pub fn new(adapter: A, clock: C) -> Self {
        Self::with_metrics(adapter, clock, Arc::new(MetricsRecorder::new()))
    }

    pub fn with_metrics(adapter: A, clock: C, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            state: DisplayState::new(),
            adapter,
            clock,
            logger: LogManager::for_target("gpstrack::session"),
            metrics,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }
}

impl<A: DisplayAdapter, C: Clock> TelemetrySubscriber for Session<A, C> {
    fn on_connect(&mut self) {
        self.logger.record("connected to telemetry feed");
    }

    fn on_message(&mut self, payload: &[u8]) {
        self.metrics.record_received();
        if self.logger.debug_enabled() {
            self.logger.debug(&format!(
                "received GPS data: {}",
                String::from_utf8_lossy(payload)
            ));
        }

        match reduce(&self.state, payload, self.clock.now_millis()) {
            Ok(reduction) => {
                if !self.state.gps_ready_seen {
                    if let Some(position) = reduction.state.last_known_position {
                        self.logger.record(&format!("first GPS fix at {}", position));
                    }
                }
                self.adapter.apply_all(&reduction.commands);
                self.state = reduction.state;
                self.metrics.record_rendered();
            }
            Err(err @ ReduceError::Malformed(_)) => {
                self.metrics.record_malformed();
                self.logger
                    .error(&format!("error processing GPS message: {}", err));
            }
            Err(err @ ReduceError::NotAnObject) => {
                self.metrics.record_malformed();
                self.logger.warn(&format!("invalid GPS data: {}", err));
            }
            Err(err @ ReduceError::MissingCoordinates { .. }) => {
                self.metrics.record_missing_coordinates();
                self.logger.warn(&format!("invalid GPS data: {}", err));
            }
        }
    }
}
