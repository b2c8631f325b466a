//! # H.266/VVC
//!
//! NAL unit header classification and access unit boundary detection for
//! Versatile Video Coding streams.

/// Access unit boundary detection
pub mod access_unit;
/// NAL unit types
pub mod types;

pub use access_unit::H266AccessUnitDetector;
pub use types::{NALUnitHeader, NALUnitType};
