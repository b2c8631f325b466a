//! # MPEG-2 Video
//!
//! MPEG-2 video reuses the `00 00 01` prefix, followed by a single start
//! code value byte instead of a NAL header.

/// Access unit boundary detection
pub mod access_unit;
/// Start code kinds
pub mod types;

pub use access_unit::Mpeg2AccessUnitDetector;
pub use types::{StartCodeHeader, StartCodeType};
