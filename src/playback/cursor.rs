//! Streaming cursor state
//!
//! The handful of bytes of persistent state the playback engine carries
//! between `step()` calls. Owned and mutated exclusively by the engine;
//! one cursor per playback session, so independent sessions never share
//! hidden state.

/// Which half of the read/drain cycle the next `step()` will perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// The chunk buffer is spent; the next step reads from storage.
    AwaitingChunk,
    /// The chunk buffer holds undelivered bytes; the next step offers
    /// them to the sink.
    DrainingChunk,
}

impl std::fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamPhase::AwaitingChunk => write!(f, "awaiting-chunk"),
            StreamPhase::DrainingChunk => write!(f, "draining-chunk"),
        }
    }
}

/// Mutable per-session streaming state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCursor {
    /// Current phase of the two-phase cycle.
    pub phase: StreamPhase,

    /// Sample-data bytes consumed since the last loop restart.
    /// Never exceeds the header's declared data length.
    pub bytes_consumed: u32,

    /// Valid bytes in the chunk buffer (the final chunk of a pass may be
    /// shorter than the buffer).
    pub chunk_len: usize,

    /// Bytes of the current chunk already accepted by the sink.
    pub drain_offset: usize,
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self {
            phase: StreamPhase::AwaitingChunk,
            bytes_consumed: 0,
            chunk_len: 0,
            drain_offset: 0,
        }
    }
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self::new()
    }
}
