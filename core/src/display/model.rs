use crate::diagnostics::LogManager;
use crate::display::{FixGlyph, MarkerIcon, Overlay, RenderCommand};
use crate::geo::{LatLon, MapType};
use crate::prelude::DisplayAdapter;
use serde::{Deserialize, Serialize};

pub const INITIAL_CENTER: LatLon = LatLon::new(39.8283, -98.5795);
pub const INITIAL_ZOOM: u8 = 18;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub position: LatLon,
    pub icon: MarkerIcon,
}

/// Everything a viewer needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayModel {
    pub map_type: MapType,
    pub zoom: u8,
    pub view_center: LatLon,
    pub loading_visible: bool,
    pub overlay: Option<Overlay>,
    pub fix_glyph: Option<FixGlyph>,
    pub marker: Option<MarkerView>,
    pub marker_creations: u32,
    pub recenter_count: u32,
}

impl Default for DisplayModel {
    fn default() -> Self {
        Self {
            map_type: MapType::default(),
            zoom: INITIAL_ZOOM,
            view_center: INITIAL_CENTER,
            loading_visible: true,
            overlay: None,
            fix_glyph: None,
            marker: None,
            marker_creations: 0,
            recenter_count: 0,
        }
    }
}

impl DisplayModel {
    pub fn new(map_type: MapType) -> Self {
        Self {
            map_type,
            ..Default::default()
        }
    }

    pub fn overlay_text(&self) -> Option<String> {
        self.overlay.as_ref().map(Overlay::text)
    }
}

impl DisplayAdapter for DisplayModel {
    fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::SetOverlay(overlay) => self.overlay = Some(overlay.clone()),
            RenderCommand::SetFixIcon { glyph } => self.fix_glyph = Some(*glyph),
            RenderCommand::HideLoading => self.loading_visible = false,
            RenderCommand::CreateMarker { position, icon } => {
                if self.marker.is_some() {
                    LogManager::for_target("gpstrack::display")
                        .warn("marker already exists; repositioning instead");
                } else {
                    self.marker_creations += 1;
                }
                self.marker = Some(MarkerView {
                    position: *position,
                    icon: icon.clone(),
                });
            }
            RenderCommand::MoveMarker { position, icon } => match self.marker.as_mut() {
                Some(marker) => {
                    marker.position = *position;
                    marker.icon = icon.clone();
                }
                None => LogManager::for_target("gpstrack::display")
                    .warn("move requested before the marker exists"),
            },
            RenderCommand::PanTo { position } => {
                self.view_center = *position;
                self.recenter_count += 1;
            }
        }
    }
}
