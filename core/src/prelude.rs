use crate::display::RenderCommand;
use std::cell::Cell;
use std::time::Instant;

/// Reasons a single feed message is dropped without touching the display.
#[derive(thiserror::Error, Debug)]
pub enum ReduceError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("missing coordinates (lat={lat:?}, lon={lon:?})")]
    MissingCoordinates {
        lat: Option<String>,
        lon: Option<String>,
    },
}

pub type ReduceResult<T> = Result<T, ReduceError>;

/// Anything that can turn render commands into visible output.
pub trait DisplayAdapter {
    fn apply(&mut self, command: &RenderCommand);

    fn apply_all(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// Callback surface of a publish/subscribe session.
pub trait TelemetrySubscriber {
    fn on_connect(&mut self);
    fn on_message(&mut self, payload: &[u8]);
}

/// Millisecond time source used by the recenter throttle.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Monotonic clock measured from its own creation.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to; used for replays and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn starting_at(millis: u64) -> Self {
        Self {
            now: Cell::new(millis),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_only_on_request() {
        let clock = ManualClock::starting_at(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance(250);
        assert_eq!(clock.now_millis(), 1_250);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn missing_coordinates_message_names_fields() {
        let err = ReduceError::MissingCoordinates {
            lat: None,
            lon: Some("12.5".into()),
        };
        assert!(err.to_string().contains("lat=None"));
    }
}
