use crate::feed::TelemetrySample;
use serde::{Deserialize, Serialize};

/// Three-tier quality scale for dilution-of-precision readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DopTier {
    Good,
    Fair,
    Poor,
}

impl DopTier {
    pub const GOOD_MAX: f64 = 1.5;
    pub const FAIR_MAX: f64 = 3.0;

    pub fn classify(dop: f64) -> Self {
        if dop <= Self::GOOD_MAX {
            DopTier::Good
        } else if dop <= Self::FAIR_MAX {
            DopTier::Fair
        } else {
            DopTier::Poor
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            DopTier::Good => "#0f0",
            DopTier::Fair => "#ff0",
            DopTier::Poor => "#f00",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            DopTier::Good => (0x00, 0xff, 0x00),
            DopTier::Fair => (0xff, 0xff, 0x00),
            DopTier::Poor => (0xff, 0x00, 0x00),
        }
    }
}

/// Piece of the overlay line; dilution readings carry their tier colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySegment {
    pub text: String,
    pub tier: Option<DopTier>,
}

impl OverlaySegment {
    fn plain(text: String) -> Self {
        Self { text, tier: None }
    }

    fn tiered(text: String, dop: f64) -> Self {
        Self {
            text,
            tier: Some(DopTier::classify(dop)),
        }
    }
}

/// Text block shown over the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub speed_mph: f64,
    pub hdop: f64,
    pub vdop: f64,
    pub altitude_ft: f64,
    pub satellites: u32,
    pub fix: String,
}

impl Overlay {
    pub fn from_sample(sample: &TelemetrySample) -> Self {
        Self {
            speed_mph: sample.speed_mph,
            hdop: sample.horizontal_dilution,
            vdop: sample.vertical_dilution,
            altitude_ft: sample.altitude_ft,
            satellites: sample.satellite_count,
            fix: sample.fix_quality.clone(),
        }
    }

    pub fn speed_text(&self) -> String {
        fixed(self.speed_mph, 1)
    }

    pub fn altitude_text(&self) -> String {
        fixed(self.altitude_ft, 0)
    }

    pub fn hdop_tier(&self) -> DopTier {
        DopTier::classify(self.hdop)
    }

    pub fn vdop_tier(&self) -> DopTier {
        DopTier::classify(self.vdop)
    }

    pub fn segments(&self) -> Vec<OverlaySegment> {
        vec![
            OverlaySegment::plain(format!("Speed: {} mph", self.speed_text())),
            OverlaySegment::tiered(format!("HDOP: {}", self.hdop), self.hdop),
            OverlaySegment::tiered(format!("VDOP: {}", self.vdop), self.vdop),
            OverlaySegment::plain(format!("ALT: {} ft", self.altitude_text())),
            OverlaySegment::plain(format!("SATS: {}", self.satellites)),
            OverlaySegment::plain(format!("FIX: {}", self.fix)),
        ]
    }

    pub fn text(&self) -> String {
        self.segments()
            .into_iter()
            .map(|segment| segment.text)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Fixed-point text with exact ties rounded away from zero and `-0` shown as `0`.
fn fixed(value: f64, places: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    let tie = scaled.trunc() + 0.5f64.copysign(scaled);
    // Fused multiply-add is exact here, so zero means the value sits on the midpoint.
    if value.mul_add(factor, -tie) == 0.0 {
        let away = scaled.trunc() + 1.0f64.copysign(scaled);
        return format!("{:.*}", places, away / factor);
    }
    format!("{:.*}", places, value)
}
