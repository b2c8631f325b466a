//! # Utility Functions and Types
//!
//! Bit-level helpers shared by the codec parsers:
//!
//! - [`BitReader`] for u(n), ue(v) and se(v) reads with cursor snapshots
//! - [`remove_emulation_prevention`] to turn NAL payloads into RBSP
//!
//! ```rust
//! use esdemux::utils::{remove_emulation_prevention, BitReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rbsp = remove_emulation_prevention(&[0x00, 0x00, 0x03, 0x01, 0b1010_0000]);
//! let mut reader = BitReader::new(&rbsp);
//! assert_eq!(reader.read_bits(24)?, 0x000001);
//! assert_eq!(reader.read_golomb()?, 0);
//! # Ok(())
//! # }
//! ```

/// Bit manipulation and bitstream reading utilities
pub mod bits;

/// Raw byte sequence payload helpers
pub mod rbsp;

pub use bits::{BitReader, Cursor};
pub use rbsp::remove_emulation_prevention;
