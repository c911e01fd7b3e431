pub mod reduce;
pub mod session;
pub mod state;

pub use reduce::{apply_sample, reduce, Reduction, RECENTER_INTERVAL_MS};
pub use session::Session;
pub use state::{DisplayState, MarkerPhase};
