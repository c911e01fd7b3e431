use serde::{Deserialize, Serialize};

/// Feed message in the wire shape published by the vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsPayload {
    pub lat: f64,
    pub lon: f64,
    pub heading: f64,
    pub speed: f64,
    pub hdop: f64,
    pub vdop: f64,
    pub altitude: f64,
    pub sats: u32,
    pub fix: String,
    pub actual: String,
}

impl GpsPayload {
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
