use crate::geo::LatLon;
use std::f64::consts::PI;

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Web-Mercator projection into world pixel space at a fixed zoom level.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    zoom: u8,
}

impl WebMercator {
    pub fn new(zoom: u8) -> Self {
        Self { zoom }
    }

    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powi(self.zoom as i32)
    }

    pub fn to_world(&self, position: LatLon) -> (f64, f64) {
        let size = self.world_size();
        let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (position.lon + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    /// Pixel offset of `position` relative to `center`, east and south positive.
    pub fn offset(&self, center: LatLon, position: LatLon) -> (f64, f64) {
        let (cx, cy) = self.to_world(center);
        let (px, py) = self.to_world(position);
        (px - cx, py - cy)
    }

    /// Ground resolution in meters per pixel at the given latitude.
    pub fn meters_per_pixel(&self, lat: f64) -> f64 {
        const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;
        EARTH_CIRCUMFERENCE_M * lat.to_radians().cos() / self.world_size()
    }
}
