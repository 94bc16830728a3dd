pub mod controller;
pub mod state;

pub use controller::{HighlightEvent, HighlightOrigin, HighlightScheduler, DEFAULT_ADVANCE_INTERVAL};
pub use state::HighlightState;
