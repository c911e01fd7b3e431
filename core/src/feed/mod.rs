pub mod coerce;
pub mod payload;
pub mod sample;

pub use payload::GpsPayload;
pub use sample::TelemetrySample;
