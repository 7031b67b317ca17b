//! Seekable sample source with an end-of-input indicator.

use std::io::{self, Read, Seek, SeekFrom};

/// Reads sample bytes in chunks.
///
/// A read that returns fewer bytes than requested sets the end-of-input
/// indicator; any seek clears it again.
pub struct SampleSource<R> {
    inner: R,
    eof: bool,
}

impl<R: Read + Seek> SampleSource<R> {
    /// Wrap a reader positioned at the first sample byte.
    pub fn new(inner: R) -> Self {
        Self { inner, eof: false }
    }

    /// Whether the last read hit end of input.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Fill as much of `buf` as the input allows.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Move the cursor relative to its current position.
    pub fn seek_relative(&mut self, offset: i64) -> io::Result<u64> {
        let position = self.inner.seek(SeekFrom::Current(offset))?;
        self.eof = false;
        Ok(position)
    }

    /// Current cursor position.
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_short_read_sets_eof() {
        let mut source = SampleSource::new(Cursor::new(vec![1u8; 10]));
        let mut buf = [0u8; 8];

        assert_eq!(source.read_chunk(&mut buf).unwrap(), 8);
        assert!(!source.is_eof());
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 2);
        assert!(source.is_eof());
    }

    #[test]
    fn test_exact_read_needs_another_read_for_eof() {
        let mut source = SampleSource::new(Cursor::new(vec![1u8; 8]));
        let mut buf = [0u8; 8];

        assert_eq!(source.read_chunk(&mut buf).unwrap(), 8);
        assert!(!source.is_eof());
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 0);
        assert!(source.is_eof());
    }

    #[test]
    fn test_seek_clears_eof() {
        let mut source = SampleSource::new(Cursor::new((0u8..10).collect::<Vec<_>>()));
        let mut buf = [0u8; 16];
        source.read_chunk(&mut buf).unwrap();
        assert!(source.is_eof());

        assert_eq!(source.seek_relative(-4).unwrap(), 6);
        assert!(!source.is_eof());
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[6, 7, 8, 9]);
    }

    #[test]
    fn test_seek_before_start_fails() {
        let mut source = SampleSource::new(Cursor::new(vec![0u8; 4]));
        assert!(source.seek_relative(-10).is_err());
    }
}
