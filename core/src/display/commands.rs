use crate::display::Overlay;
use crate::geo::LatLon;
use serde::{Deserialize, Serialize};

/// Status glyph in the corner of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixGlyph {
    RealFix,
    Simulated,
}

impl FixGlyph {
    pub fn from_flag(flag: &str) -> Self {
        if flag == crate::feed::sample::REAL_FIX_FLAG {
            FixGlyph::RealFix
        } else {
            FixGlyph::Simulated
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            FixGlyph::RealFix => "\u{1F4E1}",
            FixGlyph::Simulated => "\u{1F697}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    ForwardClosedArrow,
}

/// Vehicle marker symbol; only the rotation varies between samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub shape: MarkerShape,
    pub scale: f32,
    pub rotation: f64,
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_weight: f32,
}

impl MarkerIcon {
    pub fn with_rotation(heading: f64) -> Self {
        Self {
            shape: MarkerShape::ForwardClosedArrow,
            scale: 5.0,
            rotation: heading,
            fill_color: "#00F".into(),
            fill_opacity: 1.0,
            stroke_weight: 1.0,
        }
    }
}

/// Display mutation derived from one telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderCommand {
    SetOverlay(Overlay),
    SetFixIcon { glyph: FixGlyph },
    HideLoading,
    CreateMarker { position: LatLon, icon: MarkerIcon },
    MoveMarker { position: LatLon, icon: MarkerIcon },
    PanTo { position: LatLon },
}
