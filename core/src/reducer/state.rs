use crate::geo::LatLon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerPhase {
    #[default]
    Absent,
    Present,
}

/// Reducer state for one viewing session.
///
/// `gps_ready_seen` and `marker` only ever move forward; nothing resets them
/// short of starting a new session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub last_known_position: Option<LatLon>,
    pub gps_ready_seen: bool,
    pub last_pan_ms: Option<u64>,
    pub marker: MarkerPhase,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recenter_due(&self, now_ms: u64, interval_ms: u64) -> bool {
        match self.last_pan_ms {
            Some(last) => now_ms.saturating_sub(last) >= interval_ms,
            None => true,
        }
    }
}
