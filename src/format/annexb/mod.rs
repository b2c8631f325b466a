//! # Annex-B Byte Stream Format
//!
//! Start code framing as defined in Annex B of H.264/H.265/H.266 and used by
//! MPEG-2 video elementary streams. The module provides:
//!
//! - [`ByteSource`] with file/reader and in-memory implementations
//! - [`StartCodeScanner`] splitting the stream into [`RawUnit`]s
//! - [`AccessUnitAccumulator`] grouping units into [`AccessUnit`]s
//!
//! ## Example: Reading an H.264 file
//!
//! ```rust,no_run
//! use std::fs::File;
//!
//! use esdemux::codec::h264::{H264AccessUnitDetector, NALUnitHeader};
//! use esdemux::codec::{AccessUnitDetector, NalHeaderClassifier};
//! use esdemux::format::annexb::{AccessUnitAccumulator, ReaderSource, StartCodeScanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = StartCodeScanner::new(ReaderSource::new(File::open("stream.264")?));
//! let mut detector = H264AccessUnitDetector::new();
//! let mut frames = AccessUnitAccumulator::new();
//!
//! for unit in scanner {
//!     let unit = unit?;
//!     let header = NALUnitHeader::classify(unit.header_bytes(1)?)?;
//!     // picture order counts come from slice header parsing, not done here
//!     let starts_new = detector.is_start_of_new_access_unit(&header, None);
//!     if let Some(frame) = frames.push(unit, starts_new) {
//!         println!("frame {} has {} bytes", frame.index(), frame.byte_len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod access_unit;
mod scanner;
mod source;


pub use access_unit::{AccessUnit, AccessUnitAccumulator};
pub use scanner::{RawUnit, StartCodeScanner, START_CODE};
pub use source::{ByteSource, MemorySource, ReaderSource};
