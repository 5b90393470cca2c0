//! Playback engine
//!
//! Owns the storage handle, the audio sink, the validated header, the
//! chunk buffer, and the streaming cursor for one playback session.
//! Driven by repeated [`step`](PlaybackEngine::step) calls from the
//! application's polling loop: each call performs exactly one bounded I/O
//! operation (a storage read or a sink write attempt), so the caller is
//! never stalled for more than one bounded wait.
//!
//! Playback loops forever: when the data section is exhausted the reader
//! rewinds to the first sample byte and the cycle continues.

use crate::audio::sink::{PcmSink, StreamFormat};
use crate::error::{Error, Result};
use crate::playback::cursor::{PlaybackCursor, StreamPhase};
use crate::playback::{drain, reader};
use crate::wav::{WavHeader, HEADER_LEN};
use std::io::{Read, Seek};
use tracing::{debug, info, trace};

/// What a single `step()` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A chunk was pulled from storage; the count is zero only for an
    /// empty data section.
    ChunkRead(usize),
    /// Bytes of the current chunk were offered to the sink. `accepted`
    /// may be zero under backpressure.
    Drained { accepted: usize, chunk_complete: bool },
}

/// Streaming state machine for one WAV file and one sink.
#[derive(Debug)]
pub struct PlaybackEngine<S, K> {
    storage: S,
    sink: K,
    header: WavHeader,
    cursor: PlaybackCursor,
    chunk: Box<[u8]>,
}

impl<S: Read + Seek, K: PcmSink> PlaybackEngine<S, K> {
    /// Set up a playback session.
    ///
    /// Reads and parses the 44-byte header, validates it, and configures
    /// the sink clock from the validated sample rate. On any failure the
    /// sink is never configured and no sample data has been consumed.
    ///
    /// `chunk_bytes` is the storage read granularity; the buffer is
    /// allocated once here and reused for the life of the session.
    pub fn new(mut storage: S, mut sink: K, chunk_bytes: usize) -> Result<Self> {
        if chunk_bytes == 0 {
            return Err(Error::Config("chunk_bytes must be non-zero".to_string()));
        }

        let mut raw = [0u8; HEADER_LEN];
        storage.read_exact(&mut raw).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::TruncatedHeader
            } else {
                Error::StorageRead(e)
            }
        })?;

        let header = WavHeader::parse(&raw);
        header.validate()?;

        debug!(
            sample_rate = header.sample_rate,
            channels = header.channels,
            bits_per_sample = header.bits_per_sample,
            byte_rate = header.byte_rate,
            block_align = header.block_align,
            data_len = header.data_len,
            "parsed wav header"
        );

        sink.configure(StreamFormat::from_header(&header))?;
        info!(
            "Playback session ready: {} Hz, {} channel(s), {} bit, {} data bytes",
            header.sample_rate, header.channels, header.bits_per_sample, header.data_len
        );

        Ok(Self {
            storage,
            sink,
            header,
            cursor: PlaybackCursor::new(),
            chunk: vec![0u8; chunk_bytes].into_boxed_slice(),
        })
    }

    /// Advance the stream by one bounded I/O operation.
    ///
    /// In the awaiting phase this reads the next chunk; in the draining
    /// phase it offers the chunk's undelivered tail to the sink. Keep
    /// calling to keep the sink fed; backpressure shows up as
    /// [`StepOutcome::Drained`] with few or zero accepted bytes, not as
    /// an error.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.cursor.phase {
            StreamPhase::AwaitingChunk => {
                let got = reader::read_chunk(
                    &mut self.storage,
                    self.header.data_len,
                    &mut self.cursor,
                    &mut self.chunk,
                )?;
                if got > 0 {
                    self.cursor.chunk_len = got;
                    self.cursor.drain_offset = 0;
                    self.cursor.phase = StreamPhase::DrainingChunk;
                } else {
                    // Empty data section: draining nothing would never
                    // complete, so stay here instead of wedging.
                    trace!("empty data section, nothing to drain");
                }
                Ok(StepOutcome::ChunkRead(got))
            }
            StreamPhase::DrainingChunk => {
                let (offset, complete) = drain::drain_chunk(
                    &mut self.sink,
                    &self.chunk[..self.cursor.chunk_len],
                    self.cursor.drain_offset,
                )?;
                let accepted = offset - self.cursor.drain_offset;
                self.cursor.drain_offset = offset;
                if complete {
                    self.cursor.phase = StreamPhase::AwaitingChunk;
                }
                Ok(StepOutcome::Drained {
                    accepted,
                    chunk_complete: complete,
                })
            }
        }
    }

    /// The validated header of the playing file.
    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    /// Phase the next `step()` call will execute.
    pub fn phase(&self) -> StreamPhase {
        self.cursor.phase
    }

    /// Sample-data bytes consumed in the current pass over the file.
    pub fn bytes_consumed(&self) -> u32 {
        self.cursor.bytes_consumed
    }

    /// Storage read granularity in bytes.
    pub fn chunk_capacity(&self) -> usize {
        self.chunk.len()
    }
}
