//! # H.265/HEVC
//!
//! This module provides the HEVC specific pieces of the demuxer:
//!
//! - NAL unit header classification, including layer and temporal ids
//! - Access unit boundary detection driven by `first_slice_segment_in_pic_flag`
//! - Buffering period SEI parsing against stored SPS HRD parameters
//!
//! ## Example: Classifying a NAL unit header
//!
//! ```rust
//! use esdemux::codec::h265::{NALUnitHeader, NALUnitType};
//! use esdemux::codec::NalHeaderClassifier;
//!
//! # fn main() -> esdemux::Result<()> {
//! let header = NALUnitHeader::classify(&[0x26, 0x01])?;
//! assert_eq!(header.nal_unit_type, NALUnitType::IdrWRadl);
//! assert_eq!(header.nuh_layer_id, 0);
//! assert_eq!(header.nuh_temporal_id_plus1, 1);
//! # Ok(())
//! # }
//! ```

/// Access unit boundary detection
pub mod access_unit;
/// SEI messages parsed against parameter sets
pub mod sei;
/// NAL unit types and parameter set values
pub mod types;


pub use access_unit::H265AccessUnitDetector;
pub use sei::{BufferingPeriod, InitialCpbRemoval};
pub use types::{HrdParameters, NALUnitHeader, NALUnitType, SPSInfo};
