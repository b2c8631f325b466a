//! # H.264/AVC
//!
//! - NAL unit header classification ([`NALUnitHeader`], [`NALUnitType`])
//! - Access unit boundary detection ([`H264AccessUnitDetector`])
//! - Buffering period SEI parsing against stored SPS values ([`BufferingPeriod`])
//!
//! ## Example: Grouping NAL units into pictures
//!
//! ```rust
//! use esdemux::codec::h264::{H264AccessUnitDetector, NALUnitHeader};
//! use esdemux::codec::{AccessUnitDetector, NalHeaderClassifier};
//!
//! # fn main() -> esdemux::Result<()> {
//! let mut detector = H264AccessUnitDetector::new();
//! // SPS, PPS, IDR slice, then a non-IDR slice of the next picture
//! let units = [(0x67, None), (0x68, None), (0x65, Some(0)), (0x41, Some(2))];
//!
//! let mut flags = Vec::new();
//! for (byte, poc) in units {
//!     let header = NALUnitHeader::classify(&[byte])?;
//!     flags.push(detector.is_start_of_new_access_unit(&header, poc));
//! }
//! assert_eq!(flags, vec![true, false, false, true]);
//! # Ok(())
//! # }
//! ```

/// Access unit boundary detection
pub mod access_unit;
/// SEI messages parsed against parameter sets
pub mod sei;
/// NAL unit types and parameter set values
pub mod types;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use access_unit::H264AccessUnitDetector;
#[doc(inline)]
pub use sei::{BufferingPeriod, InitialCpbRemoval};
#[doc(inline)]
pub use types::{HrdParameters, NALUnitHeader, NALUnitType, SPSInfo};
