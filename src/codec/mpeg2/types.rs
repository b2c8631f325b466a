use std::fmt;

use crate::codec::{short_header, CodecType, NalHeaderClassifier};
use crate::error::Result;

/// MPEG-2 video start code kinds (ISO/IEC 13818-2 Table 6-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartCodeType {
    /// picture_start_code
    Picture,
    /// slice_start_code 0x01..=0xAF
    Slice {
        /// The value minus one
        slice_id: u8,
    },
    /// 0xB0, 0xB1 and 0xB6
    Reserved(u8),
    /// user_data_start_code
    UserData,
    /// sequence_header_code
    SequenceHeader,
    /// sequence_error_code
    SequenceError,
    /// extension_start_code
    ExtensionStart,
    /// sequence_end_code
    SequenceEnd,
    /// group_start_code
    GroupStart,
    /// system start codes 0xB9..=0xFF
    SystemStartCode {
        /// Counts from 0xB9
        index: u8,
    },
}

impl From<u8> for StartCodeType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => StartCodeType::Picture,
            0x01..=0xAF => StartCodeType::Slice {
                slice_id: value - 1,
            },
            0xB0 | 0xB1 | 0xB6 => StartCodeType::Reserved(value),
            0xB2 => StartCodeType::UserData,
            0xB3 => StartCodeType::SequenceHeader,
            0xB4 => StartCodeType::SequenceError,
            0xB5 => StartCodeType::ExtensionStart,
            0xB7 => StartCodeType::SequenceEnd,
            0xB8 => StartCodeType::GroupStart,
            _ => StartCodeType::SystemStartCode {
                index: value - 0xB9,
            },
        }
    }
}

impl fmt::Display for StartCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartCodeType::Slice { slice_id } => write!(f, "Slice({})", slice_id),
            StartCodeType::Reserved(v) => write!(f, "Reserved(0x{:02X})", v),
            StartCodeType::SystemStartCode { index } => write!(f, "System(0x{:02X})", 0xB9 + *index as u32),
            other => write!(f, "{:?}", other),
        }
    }
}

/// The start code value byte following `00 00 01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartCodeHeader {
    /// The raw value byte
    pub start_code_value: u8,
    /// What the value announces
    pub kind: StartCodeType,
}

impl NalHeaderClassifier for StartCodeHeader {
    const HEADER_LEN: usize = 1;

    fn classify(header: &[u8]) -> Result<Self> {
        let &value = header
            .first()
            .ok_or_else(|| short_header(CodecType::Mpeg2, header.len()))?;
        Ok(Self {
            start_code_value: value,
            kind: StartCodeType::from(value),
        })
    }

    fn is_slice(&self) -> bool {
        matches!(self.kind, StartCodeType::Slice { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_mapping() {
        let cases = [
            (0x00, StartCodeType::Picture),
            (0x01, StartCodeType::Slice { slice_id: 0 }),
            (0xAF, StartCodeType::Slice { slice_id: 0xAE }),
            (0xB0, StartCodeType::Reserved(0xB0)),
            (0xB1, StartCodeType::Reserved(0xB1)),
            (0xB2, StartCodeType::UserData),
            (0xB3, StartCodeType::SequenceHeader),
            (0xB4, StartCodeType::SequenceError),
            (0xB5, StartCodeType::ExtensionStart),
            (0xB6, StartCodeType::Reserved(0xB6)),
            (0xB7, StartCodeType::SequenceEnd),
            (0xB8, StartCodeType::GroupStart),
            (0xB9, StartCodeType::SystemStartCode { index: 0 }),
            (0xFF, StartCodeType::SystemStartCode { index: 0x46 }),
        ];
        for (value, kind) in cases {
            assert_eq!(StartCodeType::from(value), kind, "value 0x{:02X}", value);
        }
    }

    #[test]
    fn test_header_is_slice() {
        assert!(StartCodeHeader::classify(&[0x10]).unwrap().is_slice());
        assert!(!StartCodeHeader::classify(&[0x00]).unwrap().is_slice());
        assert!(StartCodeHeader::classify(&[]).is_err());
        assert_eq!(StartCodeType::from(0xBA).to_string(), "System(0xBA)");
    }
}
