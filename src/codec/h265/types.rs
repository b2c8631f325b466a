// esdemux/src/codec/h265/types.rs

use std::fmt;

use crate::codec::{short_header, CodecType, NalHeaderClassifier};
use crate::error::Result;

/// nal_unit_type values of H.265 Table 7-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NALUnitType {
    /// TRAIL_N
    TrailN,
    /// TRAIL_R
    TrailR,
    /// TSA_N
    TsaN,
    /// TSA_R
    TsaR,
    /// STSA_N
    StsaN,
    /// STSA_R
    StsaR,
    /// RADL_N
    RadlN,
    /// RADL_R
    RadlR,
    /// RASL_N
    RaslN,
    /// RASL_R
    RaslR,
    /// RSV_VCL_N10..RSV_VCL_R15 and RSV_VCL22..RSV_VCL31
    ReservedVcl(u8),
    /// BLA_W_LP
    BlaWLp,
    /// BLA_W_RADL
    BlaWRadl,
    /// BLA_N_LP
    BlaNLp,
    /// IDR_W_RADL
    IdrWRadl,
    /// IDR_N_LP
    IdrNLp,
    /// CRA_NUT
    CraNut,
    /// RSV_IRAP_VCL22 and RSV_IRAP_VCL23
    ReservedIrapVcl(u8),
    /// Video parameter set
    Vps,
    /// Sequence parameter set
    Sps,
    /// Picture parameter set
    Pps,
    /// Access unit delimiter
    Aud,
    /// End of sequence
    Eos,
    /// End of bitstream
    Eob,
    /// Filler data
    Fd,
    /// PREFIX_SEI_NUT
    PrefixSei,
    /// SUFFIX_SEI_NUT
    SuffixSei,
    /// RSV_NVCL41..RSV_NVCL47
    ReservedNvcl(u8),
    /// UNSPEC48..UNSPEC63
    Unspecified(u8),
}

impl NALUnitType {
    /// Maps a 6-bit nal_unit_type.
    pub fn from_u8(value: u8) -> Self {
        match value & 0x3F {
            0 => NALUnitType::TrailN,
            1 => NALUnitType::TrailR,
            2 => NALUnitType::TsaN,
            3 => NALUnitType::TsaR,
            4 => NALUnitType::StsaN,
            5 => NALUnitType::StsaR,
            6 => NALUnitType::RadlN,
            7 => NALUnitType::RadlR,
            8 => NALUnitType::RaslN,
            9 => NALUnitType::RaslR,
            16 => NALUnitType::BlaWLp,
            17 => NALUnitType::BlaWRadl,
            18 => NALUnitType::BlaNLp,
            19 => NALUnitType::IdrWRadl,
            20 => NALUnitType::IdrNLp,
            21 => NALUnitType::CraNut,
            v @ (22 | 23) => NALUnitType::ReservedIrapVcl(v),
            v @ (10..=15 | 24..=31) => NALUnitType::ReservedVcl(v),
            32 => NALUnitType::Vps,
            33 => NALUnitType::Sps,
            34 => NALUnitType::Pps,
            35 => NALUnitType::Aud,
            36 => NALUnitType::Eos,
            37 => NALUnitType::Eob,
            38 => NALUnitType::Fd,
            39 => NALUnitType::PrefixSei,
            40 => NALUnitType::SuffixSei,
            v @ 41..=47 => NALUnitType::ReservedNvcl(v),
            v => NALUnitType::Unspecified(v),
        }
    }

    /// The numeric nal_unit_type.
    pub fn id(self) -> u8 {
        match self {
            NALUnitType::TrailN => 0,
            NALUnitType::TrailR => 1,
            NALUnitType::TsaN => 2,
            NALUnitType::TsaR => 3,
            NALUnitType::StsaN => 4,
            NALUnitType::StsaR => 5,
            NALUnitType::RadlN => 6,
            NALUnitType::RadlR => 7,
            NALUnitType::RaslN => 8,
            NALUnitType::RaslR => 9,
            NALUnitType::BlaWLp => 16,
            NALUnitType::BlaWRadl => 17,
            NALUnitType::BlaNLp => 18,
            NALUnitType::IdrWRadl => 19,
            NALUnitType::IdrNLp => 20,
            NALUnitType::CraNut => 21,
            NALUnitType::Vps => 32,
            NALUnitType::Sps => 33,
            NALUnitType::Pps => 34,
            NALUnitType::Aud => 35,
            NALUnitType::Eos => 36,
            NALUnitType::Eob => 37,
            NALUnitType::Fd => 38,
            NALUnitType::PrefixSei => 39,
            NALUnitType::SuffixSei => 40,
            NALUnitType::ReservedVcl(v)
            | NALUnitType::ReservedIrapVcl(v)
            | NALUnitType::ReservedNvcl(v)
            | NALUnitType::Unspecified(v) => v,
        }
    }

    /// Coded slice segment types, reserved VCL codes excluded.
    pub fn is_slice(self) -> bool {
        matches!(self.id(), 0..=9 | 16..=21)
    }

    /// VCL types, reserved ones included.
    pub fn is_vcl(self) -> bool {
        self.id() < 32
    }

    /// IRAP pictures: BLA, IDR, CRA and the reserved IRAP codes.
    pub fn is_irap(self) -> bool {
        matches!(self.id(), 16..=23)
    }

    /// Non-VCL types that may only precede the first slice of a picture, and
    /// therefore begin a new access unit once that picture has a slice
    /// (7.4.2.4.4).
    pub fn opens_access_unit(self) -> bool {
        matches!(self.id(), 32..=35 | 39 | 41..=44 | 48..=55)
    }
}

impl fmt::Display for NALUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The two-byte H.265 NAL unit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NALUnitHeader {
    /// Must be zero in a conforming stream
    pub forbidden_zero_bit: bool,
    /// Kind of the unit
    pub nal_unit_type: NALUnitType,
    /// 0 for the base layer
    pub nuh_layer_id: u8,
    /// Temporal sub-layer id plus one
    pub nuh_temporal_id_plus1: u8,
}

impl NalHeaderClassifier for NALUnitHeader {
    const HEADER_LEN: usize = 2;

    fn classify(header: &[u8]) -> Result<Self> {
        let [b0, b1, ..] = *header else {
            return Err(short_header(CodecType::H265, header.len()));
        };
        Ok(Self {
            forbidden_zero_bit: b0 & 0x80 != 0,
            nal_unit_type: NALUnitType::from_u8((b0 >> 1) & 0x3F),
            nuh_layer_id: ((b0 & 0x01) << 5) | (b1 >> 3),
            nuh_temporal_id_plus1: b1 & 0x07,
        })
    }

    fn is_slice(&self) -> bool {
        self.nal_unit_type.is_slice()
    }
}

/// The subset of hrd_parameters() (E.2.2) needed to read SEI timing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrdParameters {
    /// NAL HRD schedules are present
    pub nal_hrd_parameters_present_flag: bool,
    /// VCL HRD schedules are present
    pub vcl_hrd_parameters_present_flag: bool,
    /// Decoding unit level timing is signalled
    pub sub_pic_hrd_params_present_flag: bool,
    /// Bit length of the initial removal fields, minus one
    pub initial_cpb_removal_delay_length_minus1: u32,
    /// Bit length of au_cpb_removal_delay, minus one
    pub au_cpb_removal_delay_length_minus1: u32,
    /// Bit length of dpb_output_delay, minus one
    pub dpb_output_delay_length_minus1: u32,
    /// cpb_cnt_minus1 of the highest sub-layer
    pub cpb_cnt_minus1: u32,
}

impl Default for HrdParameters {
    fn default() -> Self {
        Self {
            nal_hrd_parameters_present_flag: false,
            vcl_hrd_parameters_present_flag: false,
            sub_pic_hrd_params_present_flag: false,
            initial_cpb_removal_delay_length_minus1: 23,
            au_cpb_removal_delay_length_minus1: 23,
            dpb_output_delay_length_minus1: 23,
            cpb_cnt_minus1: 0,
        }
    }
}

/// Sequence parameter set values referenced by other syntax structures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SPSInfo {
    /// sps_seq_parameter_set_id, the store key
    pub sps_id: u32,
    /// sps_video_parameter_set_id
    pub vps_id: u8,
    /// chroma_format_idc
    pub chroma_format_idc: u32,
    /// pic_width_in_luma_samples
    pub pic_width_in_luma_samples: u32,
    /// pic_height_in_luma_samples
    pub pic_height_in_luma_samples: u32,
    /// VUI hrd_parameters(), when vui_hrd_parameters_present_flag is set
    pub hrd: Option<HrdParameters>,
}
