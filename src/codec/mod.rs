//! # Codec Unit Classification
//!
//! Each supported codec provides a unit header type implementing
//! [`NalHeaderClassifier`] and a stateful [`AccessUnitDetector`]. The
//! [`classify`] entry point dispatches on [`CodecType`] for callers that only
//! know the codec at runtime.
//!
//! ```rust
//! use esdemux::codec::{classify, CodecType, UnitHeader};
//! use esdemux::codec::h265::NALUnitType;
//!
//! # fn main() -> esdemux::Result<()> {
//! let header = classify(CodecType::H265, &[0x40, 0x01])?;
//! match header {
//!     UnitHeader::H265(h) => assert_eq!(h.nal_unit_type, NALUnitType::Vps),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::error::Result;
use crate::format::annexb::RawUnit;

/// H.264/AVC unit headers, access unit detection and SEI elements
pub mod h264;
/// H.265/HEVC unit headers, access unit detection and SEI elements
pub mod h265;
/// H.266/VVC unit headers and access unit detection
pub mod h266;
/// MPEG-2 video start codes and access unit detection
pub mod mpeg2;

/// Video codecs whose elementary streams use start code framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    /// H.264 / AVC
    H264,
    /// H.265 / HEVC
    H265,
    /// H.266 / VVC
    H266,
    /// MPEG-2 video (H.262)
    Mpeg2,
}

impl CodecType {
    /// Number of bytes after the start code that make up the unit header.
    pub fn header_len(self) -> usize {
        match self {
            CodecType::H264 => h264::NALUnitHeader::HEADER_LEN,
            CodecType::H265 => h265::NALUnitHeader::HEADER_LEN,
            CodecType::H266 => h266::NALUnitHeader::HEADER_LEN,
            CodecType::Mpeg2 => mpeg2::StartCodeHeader::HEADER_LEN,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecType::H264 => "H.264/AVC",
            CodecType::H265 => "H.265/HEVC",
            CodecType::H266 => "H.266/VVC",
            CodecType::Mpeg2 => "MPEG-2 Video",
        };
        f.write_str(name)
    }
}

/// Maps the header bytes that follow a start code to a closed set of kinds.
///
/// Classification is a pure function of the bytes. Unknown type codes land
/// in explicit reserved/unspecified kinds; only a header shorter than
/// [`HEADER_LEN`](Self::HEADER_LEN) is an error.
pub trait NalHeaderClassifier: Sized {
    /// Header size in bytes.
    const HEADER_LEN: usize;

    /// Classifies `header`, which must hold at least `HEADER_LEN` bytes.
    fn classify(header: &[u8]) -> Result<Self>;

    /// Whether the unit carries coded slice data.
    fn is_slice(&self) -> bool;

    /// Classifies the header of a unit returned by the scanner.
    fn classify_unit(unit: &RawUnit) -> Result<Self> {
        Self::classify(unit.header_bytes(Self::HEADER_LEN)?)
    }
}

/// Decides, unit by unit, where access units begin.
///
/// Detectors are per-stream session objects. Start a new stream with a new
/// detector. The first unit a detector sees is always reported as a boundary.
pub trait AccessUnitDetector {
    /// Unit header type consumed by this detector.
    type Header;
    /// Slice-level information needed by the codec's rule.
    type SliceContext;

    /// Returns true if `header` opens a new access unit.
    fn is_start_of_new_access_unit(&mut self, header: &Self::Header, slice: Self::SliceContext)
        -> bool;
}

/// A classified unit header for any supported codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitHeader {
    /// H.264 NAL unit header
    H264(h264::NALUnitHeader),
    /// H.265 NAL unit header
    H265(h265::NALUnitHeader),
    /// H.266 NAL unit header
    H266(h266::NALUnitHeader),
    /// MPEG-2 start code
    Mpeg2(mpeg2::StartCodeHeader),
}

impl UnitHeader {
    /// The codec this header belongs to.
    pub fn codec(&self) -> CodecType {
        match self {
            UnitHeader::H264(_) => CodecType::H264,
            UnitHeader::H265(_) => CodecType::H265,
            UnitHeader::H266(_) => CodecType::H266,
            UnitHeader::Mpeg2(_) => CodecType::Mpeg2,
        }
    }

    /// Whether the unit carries coded slice data.
    pub fn is_slice(&self) -> bool {
        match self {
            UnitHeader::H264(h) => h.is_slice(),
            UnitHeader::H265(h) => h.is_slice(),
            UnitHeader::H266(h) => h.is_slice(),
            UnitHeader::Mpeg2(h) => h.is_slice(),
        }
    }

    /// Layer id for layered codecs, 0 otherwise.
    pub fn layer_id(&self) -> u8 {
        match self {
            UnitHeader::H265(h) => h.nuh_layer_id,
            UnitHeader::H266(h) => h.nuh_layer_id,
            UnitHeader::H264(_) | UnitHeader::Mpeg2(_) => 0,
        }
    }
}

/// Classifies `header` bytes according to `codec`.
pub fn classify(codec: CodecType, header: &[u8]) -> Result<UnitHeader> {
    Ok(match codec {
        CodecType::H264 => UnitHeader::H264(h264::NALUnitHeader::classify(header)?),
        CodecType::H265 => UnitHeader::H265(h265::NALUnitHeader::classify(header)?),
        CodecType::H266 => UnitHeader::H266(h266::NALUnitHeader::classify(header)?),
        CodecType::Mpeg2 => UnitHeader::Mpeg2(mpeg2::StartCodeHeader::classify(header)?),
    })
}

/// Classifies the header of a scanned unit according to `codec`.
pub fn classify_unit(codec: CodecType, unit: &RawUnit) -> Result<UnitHeader> {
    classify(codec, unit.header_bytes(codec.header_len())?)
}

/// Error for a header slice shorter than the codec requires.
pub(crate) fn short_header(codec: CodecType, got: usize) -> crate::error::DemuxError {
    crate::error::DemuxError::InvalidData(format!(
        "{} unit header needs {} bytes, got {}",
        codec,
        codec.header_len(),
        got
    ))
}
