//! Core telemetry reducer and display model for the live GPS track viewer.
//!
//! Inbound feed payloads are normalized into [`feed::TelemetrySample`]s, reduced
//! against an explicit [`reducer::DisplayState`], and turned into render
//! commands that any [`prelude::DisplayAdapter`] can apply.

pub mod diagnostics;
pub mod display;
pub mod feed;
pub mod geo;
pub mod prelude;
pub mod reducer;

pub use prelude::{Clock, DisplayAdapter, ReduceError, ReduceResult, TelemetrySubscriber};
