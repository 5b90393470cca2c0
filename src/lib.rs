//! # wavloop
//!
//! Streams a PCM WAV file from disk into the system audio output in
//! bounded, non-blocking steps, looping the file indefinitely.
//!
//! The core is a two-phase state machine ([`PlaybackEngine`]): pull a
//! bounded chunk from storage, then drain it into a partial-accepting
//! sink across as many calls as backpressure demands. Each
//! [`PlaybackEngine::step`] performs exactly one bounded I/O operation,
//! so the owning poll loop is never blocked for more than one scheduling
//! tick.

pub mod audio;
pub mod config;
pub mod error;
pub mod playback;
pub mod wav;

pub use error::{Error, Result};
pub use playback::{PlaybackEngine, StepOutcome};
