//! Audio sink interface
//!
//! The seam between the playback engine and the output device. A sink is
//! configured exactly once, after the file's header has been validated,
//! and is then fed raw PCM bytes through bounded, partial-accepting
//! writes.

use crate::error::Result;
use crate::wav::WavHeader;

/// PCM stream parameters handed to the sink's one-time clock setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// 1 = mono, 2 = stereo.
    pub channels: u16,
    /// 8 (unsigned) or 16 (signed little-endian).
    pub bits_per_sample: u16,
}

impl StreamFormat {
    /// Stream parameters of a validated header.
    pub fn from_header(header: &WavHeader) -> Self {
        Self {
            sample_rate: header.sample_rate,
            channels: header.channels,
            bits_per_sample: header.bits_per_sample,
        }
    }
}

/// A bounded-capacity PCM byte sink.
pub trait PcmSink {
    /// One-time stream setup from the validated format. Called before the
    /// first [`offer`](Self::offer).
    fn configure(&mut self, format: StreamFormat) -> Result<()>;

    /// Offer up to `bytes.len()` bytes, returning how many were accepted.
    ///
    /// May accept fewer than offered, including zero; that is
    /// backpressure, and the caller resumes with the remainder on a later
    /// call. Implementations wait at most one bounded timeout, never
    /// indefinitely.
    fn offer(&mut self, bytes: &[u8]) -> Result<usize>;
}
