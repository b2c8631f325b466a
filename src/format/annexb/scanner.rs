use bytes::{Buf, Bytes, BytesMut};
use log::{debug, trace, warn};
use memchr::memmem;

use super::source::ByteSource;
use crate::config::ScannerConfig;
use crate::error::{DemuxError, Result};

/// The 3-byte start code. The 4-byte form is this pattern behind one more zero.
pub const START_CODE: [u8; 3] = [0x00, 0x00, 0x01];

/// A unit's own start code occupies at least this many bytes, so the search
/// for the following one begins here.
const MIN_SEARCH_OFFSET: usize = START_CODE.len();

/// One start-code-delimited unit exactly as it appeared in the stream.
///
/// The data includes the unit's leading start code and stops right before the
/// next unit's start code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUnit {
    offset: u64,
    data: Bytes,
}

impl RawUnit {
    /// Creates a unit found at stream offset `offset`.
    pub fn new(offset: u64, data: Bytes) -> Self {
        Self { offset, data }
    }

    /// Stream offset of the first byte, start code included.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Stream offset one past the last byte.
    pub fn end_offset(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// All bytes of the unit, start code included.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consumes the unit, returning its bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Length in bytes, start code included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the unit holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 4 for `00 00 00 01`, 3 for `00 00 01`.
    ///
    /// 0 only for the remainder of a stream that never contained a start code.
    pub fn start_code_len(&self) -> usize {
        if self.data.starts_with(&[0x00, 0x00, 0x00, 0x01]) {
            4
        } else if self.data.starts_with(&START_CODE) {
            3
        } else {
            0
        }
    }

    /// The bytes following the start code: NAL header plus payload.
    pub fn payload(&self) -> Bytes {
        self.data.slice(self.start_code_len()..)
    }

    /// The first `n` payload bytes, which hold the unit header.
    pub fn header_bytes(&self, n: usize) -> Result<&[u8]> {
        let start = self.start_code_len();
        self.data.get(start..start + n).ok_or_else(|| {
            DemuxError::InvalidData(format!(
                "unit at offset {} has {} payload bytes, header needs {}",
                self.offset,
                self.data.len() - start,
                n
            ))
        })
    }
}

/// Splits an Annex-B byte stream into [`RawUnit`]s.
///
/// The scanner pulls fixed-size chunks from its [`ByteSource`] into one owned
/// buffer. Emitted units are split off the front of that buffer without
/// copying, and each reload appends behind whatever is still unscanned, so a
/// start code straddling two reads is matched as one contiguous pattern. The
/// resulting segmentation is the same for every chunk size.
///
/// ```
/// use esdemux::format::annexb::{MemorySource, StartCodeScanner};
///
/// # fn main() -> esdemux::Result<()> {
/// let stream = vec![0xAA, 0x00, 0x00, 0x00, 0x01, 0x67, 0x00, 0x00, 0x01, 0x68];
/// let mut scanner = StartCodeScanner::new(MemorySource::new(stream));
///
/// let sps = scanner.next_unit()?.unwrap();
/// assert_eq!(scanner.bytes_before_first_unit(), Some(1));
/// assert_eq!(&sps.data()[..], &[0x00, 0x00, 0x00, 0x01, 0x67]);
/// let pps = scanner.next_unit()?.unwrap();
/// assert_eq!(&pps.payload()[..], &[0x68]);
/// assert!(scanner.next_unit()?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StartCodeScanner<S> {
    source: S,
    config: ScannerConfig,
    /// Unscanned bytes; index 0 is the start of the next unit once located.
    buffer: BytesMut,
    /// Stream offset of `buffer[0]`.
    buffer_offset: u64,
    /// Buffer index where the next start code search resumes.
    search_from: usize,
    bytes_before_first_unit: Option<u64>,
    source_exhausted: bool,
    units_emitted: u64,
}

impl<S: ByteSource> StartCodeScanner<S> {
    /// Creates a scanner with the default configuration.
    pub fn new(source: S) -> Self {
        Self::build(source, ScannerConfig::default())
    }

    /// Creates a scanner with an explicit configuration.
    ///
    /// Fails if the configuration does not validate.
    pub fn with_config(source: S, config: ScannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(source, config))
    }

    fn build(source: S, config: ScannerConfig) -> Self {
        Self {
            source,
            buffer: BytesMut::with_capacity(config.chunk_size),
            config,
            buffer_offset: 0,
            search_from: 0,
            bytes_before_first_unit: None,
            source_exhausted: false,
            units_emitted: 0,
        }
    }

    /// Number of bytes in front of the first start code.
    ///
    /// `None` until the first unit has been requested. A stream without any
    /// start code reports `Some(0)` and comes out as a single unit.
    pub fn bytes_before_first_unit(&self) -> Option<u64> {
        self.bytes_before_first_unit
    }

    /// Units returned so far.
    pub fn units_emitted(&self) -> u64 {
        self.units_emitted
    }

    /// Total bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.buffer_offset + self.buffer.len() as u64
    }

    /// The active configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Releases the byte source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Returns the next unit, or `None` once the stream is exhausted.
    pub fn next_unit(&mut self) -> Result<Option<RawUnit>> {
        if self.bytes_before_first_unit.is_none() {
            self.seek_first_start_code()?;
        }

        loop {
            if let Some(end) = find_start_code(&self.buffer, self.search_from) {
                return Ok(Some(self.emit(end)));
            }
            self.search_from = self.search_from.max(resume_index(self.buffer.len()));

            if self.source_exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let len = self.buffer.len();
                return Ok(Some(self.emit(len)));
            }
            self.reload()?;
        }
    }

    fn seek_first_start_code(&mut self) -> Result<()> {
        let mut search_from = 0;
        loop {
            if let Some(start) = find_start_code(&self.buffer, search_from) {
                self.buffer.advance(start);
                self.buffer_offset += start as u64;
                self.bytes_before_first_unit = Some(self.buffer_offset);
                self.search_from = MIN_SEARCH_OFFSET;
                debug!("first start code at offset {}", self.buffer_offset);
                return Ok(());
            }
            search_from = search_from.max(resume_index(self.buffer.len()));

            if self.source_exhausted {
                if !self.buffer.is_empty() {
                    warn!(
                        "no start code in {} bytes, returning the stream as one unit",
                        self.buffer.len()
                    );
                }
                self.bytes_before_first_unit = Some(0);
                self.search_from = self.buffer.len();
                return Ok(());
            }
            self.reload()?;
        }
    }

    fn reload(&mut self) -> Result<()> {
        let chunk = self.source.read(self.config.chunk_size)?;
        if chunk.is_empty() || self.source.at_end() {
            self.source_exhausted = true;
        }
        self.buffer.extend_from_slice(&chunk);
        debug!(
            "read {} bytes at offset {}, {} bytes buffered",
            chunk.len(),
            self.bytes_read() - chunk.len() as u64,
            self.buffer.len()
        );
        Ok(())
    }

    fn emit(&mut self, len: usize) -> RawUnit {
        let unit = RawUnit::new(self.buffer_offset, self.buffer.split_to(len).freeze());
        self.buffer_offset += len as u64;
        self.search_from = MIN_SEARCH_OFFSET;
        self.units_emitted += 1;
        trace!("unit {} at offset {}, {} bytes", self.units_emitted, unit.offset(), unit.len());
        unit
    }
}

impl<S: ByteSource> Iterator for StartCodeScanner<S> {
    type Item = Result<RawUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_unit().transpose()
    }
}

/// Finds the first start code matching at or after `from`.
///
/// Returns the index of its first byte, which includes one leading zero
/// when the code has the 4-byte form.
fn find_start_code(buf: &[u8], from: usize) -> Option<usize> {
    let window = buf.get(from..)?;
    let idx = from + memmem::find(window, &START_CODE)?;
    if idx > 0 && buf[idx - 1] == 0x00 {
        Some(idx - 1)
    } else {
        Some(idx)
    }
}

/// After a failed search over `len` bytes, a match can only begin in the last
/// two of them once more data arrives.
fn resume_index(len: usize) -> usize {
    len.saturating_sub(START_CODE.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_start_code_forms() {
        assert_eq!(find_start_code(&[0x80, 0x00, 0x00, 0x01], 0), Some(1));
        assert_eq!(find_start_code(&[0x80, 0x00, 0x00, 0x00, 0x01], 0), Some(1));
        // only one extra zero joins the start code
        assert_eq!(find_start_code(&[0x00, 0x00, 0x00, 0x00, 0x01], 0), Some(1));
        assert_eq!(find_start_code(&[0x00, 0x00, 0x02, 0x00, 0x00], 0), None);
        assert_eq!(find_start_code(&[0x00, 0x00, 0x01], 1), None);
        assert_eq!(find_start_code(&[0x00, 0x00], 5), None);
    }

    #[test]
    fn test_raw_unit_accessors() {
        let unit = RawUnit::new(10, Bytes::from_static(&[0, 0, 0, 1, 0x40, 0x01, 0xAB]));
        assert_eq!(unit.start_code_len(), 4);
        assert_eq!(&unit.payload()[..], &[0x40, 0x01, 0xAB]);
        assert_eq!(unit.header_bytes(2).unwrap(), &[0x40, 0x01]);
        assert!(unit.header_bytes(4).is_err());
        assert_eq!(unit.end_offset(), 17);

        let short = RawUnit::new(0, Bytes::from_static(&[0, 0, 1]));
        assert_eq!(short.start_code_len(), 3);
        assert!(short.payload().is_empty());

        let headerless = RawUnit::new(0, Bytes::from_static(&[0x12, 0x34]));
        assert_eq!(headerless.start_code_len(), 0);
        assert_eq!(headerless.header_bytes(1).unwrap(), &[0x12]);
    }
}
