//! Resumable chunk drain into the audio sink
//!
//! The sink may accept fewer bytes than offered; the caller carries the
//! returned offset into the next call so every byte is offered exactly
//! once. Short or zero acceptance is backpressure, not an error.

use crate::audio::sink::PcmSink;
use crate::error::Result;

/// Offer the undelivered tail of `chunk` to the sink once.
///
/// `offset` is the count of bytes the sink has already accepted. Returns
/// the advanced offset and whether the whole chunk has now been accepted.
pub fn drain_chunk<K: PcmSink>(
    sink: &mut K,
    chunk: &[u8],
    offset: usize,
) -> Result<(usize, bool)> {
    let accepted = sink.offer(&chunk[offset..])?;
    let offset = offset + accepted;
    Ok((offset, offset >= chunk.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::StreamFormat;

    /// Sink that accepts a fixed quota per call and records every offered
    /// range so tests can prove no byte is offered twice.
    struct QuotaSink {
        quota: usize,
        accepted: Vec<u8>,
        offered_lens: Vec<usize>,
    }

    impl QuotaSink {
        fn new(quota: usize) -> Self {
            Self {
                quota,
                accepted: Vec::new(),
                offered_lens: Vec::new(),
            }
        }
    }

    impl PcmSink for QuotaSink {
        fn configure(&mut self, _format: StreamFormat) -> Result<()> {
            Ok(())
        }

        fn offer(&mut self, bytes: &[u8]) -> Result<usize> {
            self.offered_lens.push(bytes.len());
            let n = self.quota.min(bytes.len());
            self.accepted.extend_from_slice(&bytes[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_complete_in_one_call() {
        let chunk: Vec<u8> = (0u8..32).collect();
        let mut sink = QuotaSink::new(1024);

        let (offset, complete) = drain_chunk(&mut sink, &chunk, 0).unwrap();
        assert_eq!(offset, 32);
        assert!(complete);
        assert_eq!(sink.accepted, chunk);
    }

    #[test]
    fn test_resumes_from_carried_offset() {
        let chunk: Vec<u8> = (0u8..100).collect();
        let mut sink = QuotaSink::new(30);
        let mut offset = 0;
        let mut calls = 0;

        loop {
            let (next, complete) = drain_chunk(&mut sink, &chunk, offset).unwrap();
            calls += 1;
            offset = next;
            if complete {
                break;
            }
        }

        // 30 + 30 + 30 + 10, completion reported exactly when the sum
        // reaches the chunk length.
        assert_eq!(calls, 4);
        assert_eq!(offset, 100);
        assert_eq!(sink.accepted, chunk);
        // Each call offered only the undelivered tail.
        assert_eq!(sink.offered_lens, vec![100, 70, 40, 10]);
    }

    #[test]
    fn test_zero_acceptance_holds_position() {
        let chunk = vec![5u8; 16];
        let mut sink = QuotaSink::new(0);

        let (offset, complete) = drain_chunk(&mut sink, &chunk, 4).unwrap();
        assert_eq!(offset, 4);
        assert!(!complete);
    }

    #[test]
    fn test_empty_chunk_is_immediately_complete() {
        let mut sink = QuotaSink::new(8);
        let (offset, complete) = drain_chunk(&mut sink, &[], 0).unwrap();
        assert_eq!(offset, 0);
        assert!(complete);
    }
}
