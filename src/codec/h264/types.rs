use std::fmt;

use crate::codec::{short_header, CodecType, NalHeaderClassifier};
use crate::error::Result;

/// nal_unit_type values of H.264 Table 7-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NALUnitType {
    /// 1: coded slice of a non-IDR picture
    CodedSliceNonIDR,
    /// 2: slice data partition A
    CodedSliceDataPartitionA,
    /// 3: slice data partition B
    CodedSliceDataPartitionB,
    /// 4: slice data partition C
    CodedSliceDataPartitionC,
    /// 5: coded slice of an IDR picture
    CodedSliceIDR,
    /// 6: supplemental enhancement information
    SEI,
    /// 7: sequence parameter set
    SPS,
    /// 8: picture parameter set
    PPS,
    /// 9
    AccessUnitDelimiter,
    /// 10
    EndOfSequence,
    /// 11
    EndOfStream,
    /// 12
    FillerData,
    /// 13: sequence parameter set extension
    SPSExtension,
    /// 14: prefix NAL unit (SVC/MVC)
    PrefixNal,
    /// 15: subset sequence parameter set
    SubsetSPS,
    /// 16
    DepthParameterSet,
    /// 19: slice of an auxiliary coded picture
    AuxiliarySlice,
    /// 20: coded slice extension
    SliceExtension,
    /// 21: coded slice extension for depth views
    SliceExtensionDepth,
    /// 17, 18, 22 and 23
    Reserved(u8),
    /// 0 and 24..=31
    Unspecified(u8),
}

impl From<u8> for NALUnitType {
    fn from(value: u8) -> Self {
        match value & 0x1F {
            1 => NALUnitType::CodedSliceNonIDR,
            2 => NALUnitType::CodedSliceDataPartitionA,
            3 => NALUnitType::CodedSliceDataPartitionB,
            4 => NALUnitType::CodedSliceDataPartitionC,
            5 => NALUnitType::CodedSliceIDR,
            6 => NALUnitType::SEI,
            7 => NALUnitType::SPS,
            8 => NALUnitType::PPS,
            9 => NALUnitType::AccessUnitDelimiter,
            10 => NALUnitType::EndOfSequence,
            11 => NALUnitType::EndOfStream,
            12 => NALUnitType::FillerData,
            13 => NALUnitType::SPSExtension,
            14 => NALUnitType::PrefixNal,
            15 => NALUnitType::SubsetSPS,
            16 => NALUnitType::DepthParameterSet,
            19 => NALUnitType::AuxiliarySlice,
            20 => NALUnitType::SliceExtension,
            21 => NALUnitType::SliceExtensionDepth,
            v @ (17 | 18 | 22 | 23) => NALUnitType::Reserved(v),
            v => NALUnitType::Unspecified(v),
        }
    }
}

impl NALUnitType {
    /// The numeric nal_unit_type.
    pub fn id(self) -> u8 {
        match self {
            NALUnitType::CodedSliceNonIDR => 1,
            NALUnitType::CodedSliceDataPartitionA => 2,
            NALUnitType::CodedSliceDataPartitionB => 3,
            NALUnitType::CodedSliceDataPartitionC => 4,
            NALUnitType::CodedSliceIDR => 5,
            NALUnitType::SEI => 6,
            NALUnitType::SPS => 7,
            NALUnitType::PPS => 8,
            NALUnitType::AccessUnitDelimiter => 9,
            NALUnitType::EndOfSequence => 10,
            NALUnitType::EndOfStream => 11,
            NALUnitType::FillerData => 12,
            NALUnitType::SPSExtension => 13,
            NALUnitType::PrefixNal => 14,
            NALUnitType::SubsetSPS => 15,
            NALUnitType::DepthParameterSet => 16,
            NALUnitType::AuxiliarySlice => 19,
            NALUnitType::SliceExtension => 20,
            NALUnitType::SliceExtensionDepth => 21,
            NALUnitType::Reserved(v) | NALUnitType::Unspecified(v) => v,
        }
    }

    /// Slices of the primary coded picture: IDR and non-IDR.
    pub fn is_slice(self) -> bool {
        matches!(
            self,
            NALUnitType::CodedSliceNonIDR | NALUnitType::CodedSliceIDR
        )
    }

    /// Types that, once a primary picture has been seen, begin the next access
    /// unit (7.4.1.2.3).
    pub fn opens_access_unit(self) -> bool {
        matches!(
            self,
            NALUnitType::AccessUnitDelimiter
                | NALUnitType::SPS
                | NALUnitType::PPS
                | NALUnitType::SEI
                | NALUnitType::PrefixNal
                | NALUnitType::SubsetSPS
                | NALUnitType::DepthParameterSet
                | NALUnitType::Reserved(17)
                | NALUnitType::Reserved(18)
        )
    }
}

impl fmt::Display for NALUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NALUnitType::Reserved(v) => write!(f, "Reserved({})", v),
            NALUnitType::Unspecified(v) => write!(f, "Unspecified({})", v),
            other => write!(f, "{:?}", other),
        }
    }
}

/// The one-byte H.264 NAL unit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NALUnitHeader {
    /// Must be zero in a conforming stream
    pub forbidden_zero_bit: bool,
    /// Non-zero when the unit carries reference data
    pub nal_ref_idc: u8,
    /// Kind of the unit
    pub nal_unit_type: NALUnitType,
}

impl NalHeaderClassifier for NALUnitHeader {
    const HEADER_LEN: usize = 1;

    fn classify(header: &[u8]) -> Result<Self> {
        let &byte = header
            .first()
            .ok_or_else(|| short_header(CodecType::H264, header.len()))?;
        Ok(Self {
            forbidden_zero_bit: byte & 0x80 != 0,
            nal_ref_idc: (byte >> 5) & 0x03,
            nal_unit_type: NALUnitType::from(byte),
        })
    }

    fn is_slice(&self) -> bool {
        self.nal_unit_type.is_slice()
    }
}

impl NALUnitHeader {
    /// Whether the unit starts a random access point.
    pub fn is_keyframe(&self) -> bool {
        self.nal_unit_type == NALUnitType::CodedSliceIDR
    }
}

/// The subset of hrd_parameters() (E.1.2) needed to read SEI timing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrdParameters {
    /// Number of CPB schedules minus one
    pub cpb_cnt_minus1: u32,
    /// Bit length of the initial removal delays, minus one
    pub initial_cpb_removal_delay_length_minus1: u32,
    /// Bit length of cpb_removal_delay, minus one
    pub cpb_removal_delay_length_minus1: u32,
    /// Bit length of dpb_output_delay, minus one
    pub dpb_output_delay_length_minus1: u32,
    /// Bit length of time_offset
    pub time_offset_length: u32,
}

impl Default for HrdParameters {
    // values inferred when the syntax elements are absent
    fn default() -> Self {
        Self {
            cpb_cnt_minus1: 0,
            initial_cpb_removal_delay_length_minus1: 23,
            cpb_removal_delay_length_minus1: 23,
            dpb_output_delay_length_minus1: 23,
            time_offset_length: 24,
        }
    }
}

/// Sequence parameter set values referenced by other syntax structures.
///
/// Built by an SPS parser and stored in a
/// [`ParameterSetStore`](crate::syntax::ParameterSetStore) under
/// `seq_parameter_set_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SPSInfo {
    /// Store key
    pub seq_parameter_set_id: u32,
    /// profile_idc
    pub profile_idc: u8,
    /// level_idc
    pub level_idc: u8,
    /// Luma width in samples
    pub width: u32,
    /// Luma height in samples
    pub height: u32,
    /// Frames per second from the VUI timing info, if present
    pub frame_rate: Option<f32>,
    /// VUI nal_hrd_parameters(), present when NalHrdBpPresentFlag is set
    pub nal_hrd: Option<HrdParameters>,
    /// VUI vcl_hrd_parameters(), present when VclHrdBpPresentFlag is set
    pub vcl_hrd: Option<HrdParameters>,
}
