use bytes::{BufMut, Bytes, BytesMut};
use log::trace;

use super::scanner::RawUnit;

const LONG_START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// The units making up one coded picture plus its associated non-VCL units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessUnit {
    index: u64,
    units: Vec<RawUnit>,
}

impl AccessUnit {
    /// Position of this access unit in the stream, counting from 0.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The units in stream order.
    pub fn units(&self) -> &[RawUnit] {
        &self.units
    }

    /// Stream offset of the first unit.
    pub fn start_offset(&self) -> u64 {
        self.units.first().map_or(0, RawUnit::offset)
    }

    /// Bytes covered in the stream, start codes included.
    pub fn byte_len(&self) -> usize {
        self.units.iter().map(RawUnit::len).sum()
    }

    /// Serializes the units with every start code in its 4-byte form, the
    /// layout decoders expect for a frame.
    pub fn to_annexb_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.byte_len() + self.units.len());
        for unit in &self.units {
            out.put_slice(&LONG_START_CODE);
            out.put_slice(&unit.payload());
        }
        out.freeze()
    }
}

/// Groups units into access units, driven by a boundary detector's verdicts.
///
/// ```
/// use bytes::Bytes;
/// use esdemux::format::annexb::{AccessUnitAccumulator, RawUnit};
///
/// let mut acc = AccessUnitAccumulator::new();
/// let unit = |offset| RawUnit::new(offset, Bytes::from_static(&[0, 0, 1, 0x65]));
/// assert!(acc.push(unit(0), true).is_none());
/// assert!(acc.push(unit(4), false).is_none());
/// let first = acc.push(unit(8), true).unwrap();
/// assert_eq!(first.units().len(), 2);
/// assert_eq!(acc.finish().unwrap().index(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AccessUnitAccumulator {
    current: Vec<RawUnit>,
    next_index: u64,
}

impl AccessUnitAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit. When `starts_new` is set and units are pending, the
    /// pending access unit is closed and returned.
    pub fn push(&mut self, unit: RawUnit, starts_new: bool) -> Option<AccessUnit> {
        let closed = if starts_new { self.take() } else { None };
        self.current.push(unit);
        closed
    }

    /// Closes the access unit in progress, if any. Call at end of stream.
    pub fn finish(&mut self) -> Option<AccessUnit> {
        self.take()
    }

    /// Units waiting for the next boundary.
    pub fn pending_units(&self) -> usize {
        self.current.len()
    }

    fn take(&mut self) -> Option<AccessUnit> {
        if self.current.is_empty() {
            return None;
        }
        let access_unit = AccessUnit {
            index: self.next_index,
            units: std::mem::take(&mut self.current),
        };
        self.next_index += 1;
        trace!(
            "access unit {} closed with {} units",
            access_unit.index,
            access_unit.units.len()
        );
        Some(access_unit)
    }
}
