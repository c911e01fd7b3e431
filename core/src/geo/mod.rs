pub mod map_type;
pub mod position;
pub mod projection;

pub use map_type::MapType;
pub use position::LatLon;
pub use projection::WebMercator;
