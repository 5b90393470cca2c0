//! Audio output using cpal
//!
//! [`CpalSink`] feeds a cpal output stream from a lock-free byte FIFO.
//! `offer` pushes raw PCM bytes into the FIFO and reports how many fit;
//! the audio callback assembles those bytes into frames at its own pace
//! and plays silence when starved. The FIFO capacity is what bounds how
//! far the file reader can run ahead of the device.

use crate::audio::sink::{PcmSink, StreamFormat};
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use ringbuf::{traits::*, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Default FIFO capacity between `offer` and the audio callback.
const DEFAULT_BUFFER_BYTES: usize = 8192;

/// Bounded wait applied once per `offer` call when the FIFO is full.
const WRITE_TIMEOUT: Duration = Duration::from_millis(1);

/// Audio sink backed by a cpal output stream.
pub struct CpalSink {
    device: Device,
    buffer_bytes: usize,
    producer: Option<ringbuf::HeapProd<u8>>,
    stream: Option<Stream>,
    underruns: Arc<AtomicU64>,
}

impl CpalSink {
    /// Open an output device.
    ///
    /// # Arguments
    /// - `device_name`: Optional device name (None = default device)
    /// - `buffer_bytes`: Optional FIFO capacity (None = 8 KiB)
    ///
    /// If the requested device is not found, falls back to the default
    /// device with a warning rather than failing.
    pub fn new(device_name: Option<String>, buffer_bytes: Option<usize>) -> Result<Self> {
        let host = cpal::default_host();

        let device = if let Some(name) = device_name.as_ref() {
            let mut devices = host
                .output_devices()
                .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?;

            match devices.find(|d| d.name().ok().as_ref() == Some(name)) {
                Some(dev) => {
                    info!("Found requested audio device: {}", name);
                    dev
                }
                None => {
                    warn!("Requested device '{}' not found, falling back to default device", name);
                    host.default_output_device().ok_or_else(|| {
                        Error::AudioOutput(format!(
                            "Device '{}' not found and no default device available",
                            name
                        ))
                    })?
                }
            }
        } else {
            host.default_output_device()
                .ok_or_else(|| Error::AudioOutput("No default output device found".to_string()))?
        };

        debug!(
            "Using audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        Ok(Self {
            device,
            buffer_bytes: buffer_bytes.unwrap_or(DEFAULT_BUFFER_BYTES),
            producer: None,
            stream: None,
            underruns: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Pick a stereo f32 device configuration covering `sample_rate`.
    ///
    /// Falls back to the device default config (with a warning, since the
    /// stream then plays at the device rate) when no match exists.
    fn pick_config(&self, sample_rate: u32) -> Result<StreamConfig> {
        let mut supported = self
            .device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("Failed to get device configs: {}", e)))?;

        let preferred = supported.find(|config| {
            config.channels() == 2
                && config.min_sample_rate().0 <= sample_rate
                && config.max_sample_rate().0 >= sample_rate
                && config.sample_format() == SampleFormat::F32
        });

        if let Some(range) = preferred {
            return Ok(range.with_sample_rate(cpal::SampleRate(sample_rate)).config());
        }

        let default = self
            .device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get default config: {}", e)))?;

        if default.sample_format() != SampleFormat::F32 {
            return Err(Error::AudioOutput(format!(
                "Unsupported device sample format: {:?}",
                default.sample_format()
            )));
        }

        warn!(
            "Device does not support {} Hz, using device default {} Hz",
            sample_rate,
            default.sample_rate().0
        );
        Ok(default.config())
    }

    /// Total underruns observed by the audio callback.
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    /// Stop the stream and drop it.
    pub fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream
                .pause()
                .map_err(|e| Error::AudioOutput(format!("Failed to pause stream: {}", e)))?;
            drop(stream);
        }
        self.producer = None;
        Ok(())
    }
}

impl PcmSink for CpalSink {
    fn configure(&mut self, format: StreamFormat) -> Result<()> {
        if self.stream.is_some() {
            return Err(Error::AudioOutput("Sink already configured".to_string()));
        }

        let config = self.pick_config(format.sample_rate)?;
        let out_channels = config.channels as usize;

        let (producer, consumer) = HeapRb::<u8>::new(self.buffer_bytes).split();
        let mut frames = FrameAssembler::new(consumer, format);
        let underruns = Arc::clone(&self.underruns);

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(out_channels) {
                        let (left, right) = match frames.next_frame() {
                            Some(samples) => samples,
                            None => {
                                let count = underruns.fetch_add(1, Ordering::Relaxed) + 1;
                                if count % 1000 == 0 {
                                    trace!("Audio FIFO underrun (total: {})", count);
                                }
                                (0.0, 0.0)
                            }
                        };
                        frame[0] = left;
                        if out_channels > 1 {
                            frame[1] = right;
                        }
                    }
                },
                move |err| {
                    warn!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {}", e)))?;

        info!(
            sample_rate = config.sample_rate.0,
            channels = format.channels,
            bits = format.bits_per_sample,
            "Audio stream started"
        );

        self.producer = Some(producer);
        self.stream = Some(stream);
        Ok(())
    }

    fn offer(&mut self, bytes: &[u8]) -> Result<usize> {
        let producer = self
            .producer
            .as_mut()
            .ok_or_else(|| Error::AudioOutput("Sink not configured".to_string()))?;

        let mut accepted = producer.push_slice(bytes);
        if accepted < bytes.len() {
            // FIFO full: give the callback one quantum to make room, then
            // take whatever now fits. Anything still unaccepted is the
            // caller's to resume.
            std::thread::sleep(WRITE_TIMEOUT);
            accepted += producer.push_slice(&bytes[accepted..]);
        }
        Ok(accepted)
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Assembles raw PCM bytes from the FIFO into (left, right) f32 frames.
///
/// Bytes arrive with no framing, so a frame may straddle two callback
/// invocations; partially assembled frames are stashed until the rest
/// arrives. Mono input is duplicated to both output channels.
struct FrameAssembler {
    bytes: ringbuf::HeapCons<u8>,
    stash: [u8; 4],
    filled: usize,
    frame_bytes: usize,
    bits_per_sample: u16,
    mono: bool,
}

impl FrameAssembler {
    fn new(bytes: ringbuf::HeapCons<u8>, format: StreamFormat) -> Self {
        let sample_bytes = format.bits_per_sample as usize / 8;
        Self {
            bytes,
            stash: [0; 4],
            filled: 0,
            frame_bytes: sample_bytes * format.channels as usize,
            bits_per_sample: format.bits_per_sample,
            mono: format.channels == 1,
        }
    }

    /// Next complete frame, or None if the FIFO cannot currently supply
    /// one (bytes pulled so far stay stashed for the next call).
    fn next_frame(&mut self) -> Option<(f32, f32)> {
        while self.filled < self.frame_bytes {
            match self.bytes.try_pop() {
                Some(b) => {
                    self.stash[self.filled] = b;
                    self.filled += 1;
                }
                None => return None,
            }
        }
        self.filled = 0;

        let raw = &self.stash[..self.frame_bytes];
        Some(match (self.bits_per_sample, self.mono) {
            (8, true) => {
                let s = sample_from_u8(raw[0]);
                (s, s)
            }
            (8, false) => (sample_from_u8(raw[0]), sample_from_u8(raw[1])),
            (_, true) => {
                let s = sample_from_i16(i16::from_le_bytes([raw[0], raw[1]]));
                (s, s)
            }
            (_, false) => (
                sample_from_i16(i16::from_le_bytes([raw[0], raw[1]])),
                sample_from_i16(i16::from_le_bytes([raw[2], raw[3]])),
            ),
        })
    }
}

/// 8-bit WAV samples are unsigned with 128 as the zero line.
fn sample_from_u8(sample: u8) -> f32 {
    (sample as f32 - 128.0) / 128.0
}

/// 16-bit WAV samples are signed little-endian.
fn sample_from_i16(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler(channels: u16, bits: u16, capacity: usize) -> (ringbuf::HeapProd<u8>, FrameAssembler) {
        let (producer, consumer) = HeapRb::<u8>::new(capacity).split();
        let format = StreamFormat {
            sample_rate: 44_100,
            channels,
            bits_per_sample: bits,
        };
        (producer, FrameAssembler::new(consumer, format))
    }

    #[test]
    fn test_sample_conversion() {
        assert_eq!(sample_from_u8(128), 0.0);
        assert_eq!(sample_from_u8(0), -1.0);
        assert!(sample_from_u8(255) > 0.99);

        assert_eq!(sample_from_i16(0), 0.0);
        assert_eq!(sample_from_i16(i16::MIN), -1.0);
        assert!(sample_from_i16(i16::MAX) > 0.99);
    }

    #[test]
    fn test_mono_8bit_duplicates_channel() {
        let (mut producer, mut frames) = assembler(1, 8, 16);
        producer.push_slice(&[128, 0]);

        assert_eq!(frames.next_frame(), Some((0.0, 0.0)));
        assert_eq!(frames.next_frame(), Some((-1.0, -1.0)));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn test_stereo_16bit_frames() {
        let (mut producer, mut frames) = assembler(2, 16, 16);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i16.to_le_bytes());
        bytes.extend_from_slice(&i16::MIN.to_le_bytes());
        producer.push_slice(&bytes);

        assert_eq!(frames.next_frame(), Some((0.0, -1.0)));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn test_frame_straddling_callback_boundary() {
        let (mut producer, mut frames) = assembler(1, 16, 16);

        // Only the low byte of a 16-bit sample: no frame, byte is stashed.
        producer.push_slice(&[0x00]);
        assert_eq!(frames.next_frame(), None);

        // High byte arrives; together they form 0x4000 = half scale.
        producer.push_slice(&[0x40]);
        assert_eq!(frames.next_frame(), Some((0.5, 0.5)));
    }

    #[test]
    fn test_partial_acceptance_at_capacity() {
        let (mut producer, _frames) = assembler(2, 16, 8);
        // FIFO holds 8 bytes; a 12-byte offer is partially accepted.
        let accepted = producer.push_slice(&[0u8; 12]);
        assert_eq!(accepted, 8);
    }
}
