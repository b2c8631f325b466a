#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # esdemux - Elementary Stream Demultiplexing
//!
//! `esdemux` splits raw video elementary streams into units and access
//! units without decoding them. It targets the start code framed formats
//! used by H.264/AVC, H.265/HEVC, H.266/VVC and MPEG-2 video.
//!
//! ## Features
//!
//! - Chunked start code scanning with zero-copy unit extraction
//! - Per-codec unit header classification
//! - Access unit boundary detection following each codec's ordering rules
//! - Deferred parsing of syntax elements that reference parameter sets not
//!   yet seen in the stream, such as buffering period SEI messages
//!
//! ## Example
//!
//! ```rust
//! use esdemux::codec::h264::{H264AccessUnitDetector, NALUnitHeader};
//! use esdemux::codec::{AccessUnitDetector, NalHeaderClassifier};
//! use esdemux::format::annexb::{AccessUnitAccumulator, MemorySource, StartCodeScanner};
//!
//! # fn main() -> esdemux::Result<()> {
//! let stream: &[u8] = &[
//!     0, 0, 0, 1, 0x67, 0x42, // SPS
//!     0, 0, 1, 0x68, 0xCE,    // PPS
//!     0, 0, 1, 0x65, 0x88,    // IDR slice
//!     0, 0, 1, 0x09, 0xF0,    // access unit delimiter
//!     0, 0, 1, 0x41, 0x9A,    // non-IDR slice
//! ];
//!
//! let mut detector = H264AccessUnitDetector::new();
//! let mut frames = AccessUnitAccumulator::new();
//! let mut completed = Vec::new();
//! for unit in StartCodeScanner::new(MemorySource::new(stream.to_vec())) {
//!     let unit = unit?;
//!     let header = NALUnitHeader::classify_unit(&unit)?;
//!     let starts_new = detector.is_start_of_new_access_unit(&header, None);
//!     completed.extend(frames.push(unit, starts_new));
//! }
//! completed.extend(frames.finish());
//!
//! assert_eq!(completed.len(), 2);
//! assert_eq!(completed[0].units().len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - `format`: Annex-B byte sources, the start code scanner and access unit
//!   grouping
//! - `codec`: unit header classifiers and access unit detectors per codec,
//!   plus codec specific SEI elements
//! - `syntax`: the deferred parsing protocol, parameter set store, reparse
//!   queue and inspection sinks
//! - `utils`: bit reading and emulation prevention removal
//! - `config`: scanner configuration
//! - `error`: the crate error type

/// Codec unit classification and access unit detection
pub mod codec;

/// Error types and utilities
pub mod error;

/// Elementary stream framing
pub mod format;

/// Deferred syntax parsing
pub mod syntax;

/// Bit reading helpers
pub mod utils;

/// Configuration module
pub mod config;

pub use error::{DemuxError, Result};
