//! Streaming playback core

pub mod cursor;
pub mod drain;
pub mod engine;
pub mod reader;

pub use cursor::{PlaybackCursor, StreamPhase};
pub use engine::{PlaybackEngine, StepOutcome};
