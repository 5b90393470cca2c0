//! Bounded chunk reads from the sample-data section
//!
//! One call performs one bounded read against the storage handle, clamped
//! so the declared data section is never overrun even when the file
//! carries trailing metadata. When the section is exhausted the storage
//! cursor is repositioned to the first sample byte and the consumed
//! counter reset in the same call, so loop restart can never leak bytes
//! between passes.

use crate::error::{Error, Result};
use crate::playback::cursor::PlaybackCursor;
use crate::wav::HEADER_LEN;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Read the next chunk of sample data into `buf`.
///
/// Requests `min(buf.len(), data_len - bytes_consumed)` bytes from
/// `storage` and advances `cursor.bytes_consumed` by the count actually
/// read. Returns that count; `Ok(0)` only for a zero-length data section.
///
/// A zero-byte read from storage while bytes were still owed means the
/// file is shorter than its header claims and is reported as a read
/// error, distinct from the empty-section case.
pub fn read_chunk<S: Read + Seek>(
    storage: &mut S,
    data_len: u32,
    cursor: &mut PlaybackCursor,
    buf: &mut [u8],
) -> Result<usize> {
    let remaining = data_len - cursor.bytes_consumed;
    let want = (buf.len() as u32).min(remaining) as usize;

    if want == 0 {
        // Empty data section; a valid file never reaches here with
        // bytes_consumed > 0 because the counter wraps below.
        return Ok(0);
    }

    let got = storage.read(&mut buf[..want]).map_err(Error::StorageRead)?;
    if got == 0 {
        return Err(Error::StorageRead(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("file ended with {} data bytes still declared", remaining),
        )));
    }
    cursor.bytes_consumed += got as u32;

    if cursor.bytes_consumed >= data_len {
        // Section exhausted: rewind to the first sample byte so the next
        // call starts a fresh pass.
        storage
            .seek(SeekFrom::Start(HEADER_LEN as u64))
            .map_err(Error::StorageRead)?;
        cursor.bytes_consumed = 0;
        debug!(data_len, "data section exhausted, looping to start");
    }

    Ok(got)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A file image: 44 filler bytes where the header would sit, then
    /// `data` as the sample section, positioned at the first data byte.
    fn storage_with_data(data: &[u8], trailing: &[u8]) -> Cursor<Vec<u8>> {
        let mut image = vec![0u8; HEADER_LEN];
        image.extend_from_slice(data);
        image.extend_from_slice(trailing);
        let mut cursor = Cursor::new(image);
        cursor.set_position(HEADER_LEN as u64);
        cursor
    }

    #[test]
    fn test_full_chunk_read() {
        let data: Vec<u8> = (0..=255).collect();
        let mut storage = storage_with_data(&data, &[]);
        let mut cursor = PlaybackCursor::new();
        let mut buf = [0u8; 64];

        let got = read_chunk(&mut storage, 256, &mut cursor, &mut buf).unwrap();
        assert_eq!(got, 64);
        assert_eq!(cursor.bytes_consumed, 64);
        assert_eq!(&buf[..], &data[..64]);
    }

    #[test]
    fn test_final_chunk_truncated_to_remaining() {
        // 1500 data bytes through a 1024-byte buffer: 1024 then 476.
        let data = vec![7u8; 1500];
        let mut storage = storage_with_data(&data, &[]);
        let mut cursor = PlaybackCursor::new();
        let mut buf = vec![0u8; 1024];

        assert_eq!(read_chunk(&mut storage, 1500, &mut cursor, &mut buf).unwrap(), 1024);
        assert_eq!(cursor.bytes_consumed, 1024);

        assert_eq!(read_chunk(&mut storage, 1500, &mut cursor, &mut buf).unwrap(), 476);
        // Counter reset by the wrap; never exceeded the declared size.
        assert_eq!(cursor.bytes_consumed, 0);
    }

    #[test]
    fn test_wrap_restarts_at_data_origin() {
        let data: Vec<u8> = (0u8..100).collect();
        let mut storage = storage_with_data(&data, &[]);
        let mut cursor = PlaybackCursor::new();
        let mut buf = [0u8; 100];

        assert_eq!(read_chunk(&mut storage, 100, &mut cursor, &mut buf).unwrap(), 100);
        assert_eq!(cursor.bytes_consumed, 0);

        // Next read starts a fresh pass from the first data byte.
        let got = read_chunk(&mut storage, 100, &mut cursor, &mut buf).unwrap();
        assert_eq!(got, 100);
        assert_eq!(&buf[..], &data[..]);
        assert_eq!(cursor.bytes_consumed, 0);
    }

    #[test]
    fn test_trailing_metadata_never_read() {
        let data = vec![1u8; 32];
        let trailing = vec![0xEE; 64]; // e.g. a LIST chunk after the samples
        let mut storage = storage_with_data(&data, &trailing);
        let mut cursor = PlaybackCursor::new();
        let mut buf = [0u8; 64];

        let got = read_chunk(&mut storage, 32, &mut cursor, &mut buf).unwrap();
        assert_eq!(got, 32);
        assert!(buf[..32].iter().all(|&b| b == 1));

        // Wrapped; second pass re-reads samples, not the trailing chunk.
        let got = read_chunk(&mut storage, 32, &mut cursor, &mut buf).unwrap();
        assert_eq!(got, 32);
        assert!(buf[..32].iter().all(|&b| b == 1));
    }

    #[test]
    fn test_zero_length_data_section() {
        let mut storage = storage_with_data(&[], &[]);
        let mut cursor = PlaybackCursor::new();
        let mut buf = [0u8; 16];

        assert_eq!(read_chunk(&mut storage, 0, &mut cursor, &mut buf).unwrap(), 0);
        assert_eq!(cursor.bytes_consumed, 0);
    }

    #[test]
    fn test_short_file_reports_read_error() {
        // Header claims 100 data bytes but only 10 exist.
        let data = vec![9u8; 10];
        let mut storage = storage_with_data(&data, &[]);
        let mut cursor = PlaybackCursor::new();
        let mut buf = [0u8; 64];

        assert_eq!(read_chunk(&mut storage, 100, &mut cursor, &mut buf).unwrap(), 10);
        assert_eq!(cursor.bytes_consumed, 10);

        let err = read_chunk(&mut storage, 100, &mut cursor, &mut buf).unwrap_err();
        assert!(matches!(err, Error::StorageRead(_)));
        // Accounting untouched by the failed read.
        assert_eq!(cursor.bytes_consumed, 10);
    }

    struct FailingStorage;

    impl Read for FailingStorage {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "bad sector"))
        }
    }

    impl Seek for FailingStorage {
        fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn test_device_error_is_distinct_from_empty_section() {
        let mut cursor = PlaybackCursor::new();
        let mut buf = [0u8; 16];

        let err = read_chunk(&mut FailingStorage, 100, &mut cursor, &mut buf).unwrap_err();
        assert!(matches!(err, Error::StorageRead(_)));
        assert_eq!(cursor.bytes_consumed, 0);
    }
}
