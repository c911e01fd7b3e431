pub mod commands;
pub mod model;
pub mod overlay;

pub use commands::{FixGlyph, MarkerIcon, MarkerShape, RenderCommand};
pub use model::{DisplayModel, MarkerView};
pub use overlay::{DopTier, Overlay, OverlaySegment};
