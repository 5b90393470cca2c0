//! WAV file header parsing and validation
//!
//! Handles the canonical 44-byte RIFF/WAVE header that prefixes uncompressed
//! PCM files: a RIFF container section, a 16-byte "fmt " section, and the
//! "data" section descriptor. Parsing is purely positional and performs no
//! validation; [`WavHeader::validate`] checks the parsed record against the
//! supported-format rules and reports the first one violated.
//!
//! All multi-byte integers in the header are little-endian.

use thiserror::Error;

/// Size of the fixed WAV header in bytes. Sample data starts immediately after.
pub const HEADER_LEN: usize = 44;

/// Ceiling on the declared sample rate.
pub const MAX_SAMPLE_RATE: u32 = 48_000;

/// A specific rule violated by a WAV header.
///
/// Validation stops at the first failing rule so the caller can report
/// exactly what is wrong with the file.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatViolation {
    #[error("container tag is not RIFF")]
    NotRiff,

    #[error("container format is not WAVE")]
    NotWave,

    #[error("format section tag missing")]
    NoFormatSection,

    #[error("data section tag missing")]
    NoDataSection,

    #[error("codec id {0} is not uncompressed PCM")]
    NotPcm(u16),

    #[error("format section size is {0}, expected 16")]
    BadFormatSize(u32),

    #[error("unsupported channel count {0}, only mono or stereo permitted")]
    BadChannelCount(u16),

    #[error("sample rate {0} exceeds {MAX_SAMPLE_RATE} Hz")]
    SampleRateTooHigh(u32),

    #[error("unsupported bit depth {0}, only 8 or 16 bits per sample permitted")]
    BadBitDepth(u16),
}

/// Parsed 44-byte WAV header.
///
/// Immutable once parsed. `data_len` is the authoritative length of the
/// sample data that follows the header; trailing file content beyond it
/// (e.g. metadata chunks) is never played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    /// "RIFF" container tag
    pub riff_tag: [u8; 4],
    /// Size of the entire file less 8 (not validated)
    pub riff_size: u32,
    /// "WAVE" container format tag
    pub wave_tag: [u8; 4],
    /// "fmt " section tag
    pub fmt_tag: [u8; 4],
    /// Format section size, 16 for uncompressed PCM
    pub fmt_size: u32,
    /// Codec id, 1 = uncompressed PCM
    pub audio_format: u16,
    /// 1 = mono, 2 = stereo
    pub channels: u16,
    /// Samples per second
    pub sample_rate: u32,
    /// sample_rate * channels * bytes per sample (informational)
    pub byte_rate: u32,
    /// channels * bytes per sample (informational)
    pub block_align: u16,
    /// 8 or 16
    pub bits_per_sample: u16,
    /// "data" section tag
    pub data_tag: [u8; 4],
    /// Declared sample-data length in bytes
    pub data_len: u32,
}

fn tag(bytes: &[u8], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl WavHeader {
    /// Decode the fixed header layout from exactly [`HEADER_LEN`] bytes.
    ///
    /// Purely positional; malformed input yields a record whose fields fail
    /// [`validate`](Self::validate), never a panic.
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            riff_tag: tag(bytes, 0),
            riff_size: le_u32(bytes, 4),
            wave_tag: tag(bytes, 8),
            fmt_tag: tag(bytes, 12),
            fmt_size: le_u32(bytes, 16),
            audio_format: le_u16(bytes, 20),
            channels: le_u16(bytes, 22),
            sample_rate: le_u32(bytes, 24),
            byte_rate: le_u32(bytes, 28),
            block_align: le_u16(bytes, 32),
            bits_per_sample: le_u16(bytes, 34),
            data_tag: tag(bytes, 36),
            data_len: le_u32(bytes, 40),
        }
    }

    /// Check the header against the supported-format rules.
    ///
    /// Rules are evaluated in a fixed order and the first violation is
    /// returned. A header that passes is safe to stream: PCM, mono or
    /// stereo, 8 or 16 bit, sample rate within the hardware ceiling.
    pub fn validate(&self) -> Result<(), FormatViolation> {
        if &self.riff_tag != b"RIFF" {
            return Err(FormatViolation::NotRiff);
        }
        if &self.wave_tag != b"WAVE" {
            return Err(FormatViolation::NotWave);
        }
        // Only the first three bytes are significant, the fourth is padding.
        if &self.fmt_tag[..3] != b"fmt" {
            return Err(FormatViolation::NoFormatSection);
        }
        if &self.data_tag != b"data" {
            return Err(FormatViolation::NoDataSection);
        }
        if self.audio_format != 1 {
            return Err(FormatViolation::NotPcm(self.audio_format));
        }
        if self.fmt_size != 16 {
            return Err(FormatViolation::BadFormatSize(self.fmt_size));
        }
        if self.channels != 1 && self.channels != 2 {
            return Err(FormatViolation::BadChannelCount(self.channels));
        }
        if self.sample_rate > MAX_SAMPLE_RATE {
            return Err(FormatViolation::SampleRateTooHigh(self.sample_rate));
        }
        if self.bits_per_sample != 8 && self.bits_per_sample != 16 {
            return Err(FormatViolation::BadBitDepth(self.bits_per_sample));
        }
        Ok(())
    }

    /// Bytes per PCM frame (all channels of one sample instant).
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }
}
