use crate::codec::{short_header, CodecType, NalHeaderClassifier};
use crate::error::Result;

/// nal_unit_type values of H.266 Table 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NALUnitType {
    /// TRAIL_NUT
    Trail,
    /// STSA_NUT
    Stsa,
    /// RADL_NUT
    Radl,
    /// RASL_NUT
    Rasl,
    /// RSV_VCL_4..RSV_VCL_6
    ReservedVcl(u8),
    /// IDR_W_RADL
    IdrWRadl,
    /// IDR_N_LP
    IdrNLp,
    /// CRA_NUT
    Cra,
    /// GDR_NUT
    Gdr,
    /// RSV_IRAP_11
    ReservedIrap,
    /// Operating point information
    Opi,
    /// Decoding capability information
    Dci,
    /// Video parameter set
    Vps,
    /// Sequence parameter set
    Sps,
    /// Picture parameter set
    Pps,
    /// PREFIX_APS_NUT
    PrefixAps,
    /// SUFFIX_APS_NUT
    SuffixAps,
    /// Picture header
    Ph,
    /// Access unit delimiter
    Aud,
    /// End of sequence
    Eos,
    /// End of bitstream
    Eob,
    /// PREFIX_SEI_NUT
    PrefixSei,
    /// SUFFIX_SEI_NUT
    SuffixSei,
    /// Filler data
    Fd,
    /// RSV_NVCL_26 and RSV_NVCL_27
    ReservedNvcl(u8),
    /// UNSPEC_28..UNSPEC_31
    Unspecified(u8),
}

impl From<u8> for NALUnitType {
    fn from(value: u8) -> Self {
        match value & 0x1F {
            0 => NALUnitType::Trail,
            1 => NALUnitType::Stsa,
            2 => NALUnitType::Radl,
            3 => NALUnitType::Rasl,
            v @ 4..=6 => NALUnitType::ReservedVcl(v),
            7 => NALUnitType::IdrWRadl,
            8 => NALUnitType::IdrNLp,
            9 => NALUnitType::Cra,
            10 => NALUnitType::Gdr,
            11 => NALUnitType::ReservedIrap,
            12 => NALUnitType::Opi,
            13 => NALUnitType::Dci,
            14 => NALUnitType::Vps,
            15 => NALUnitType::Sps,
            16 => NALUnitType::Pps,
            17 => NALUnitType::PrefixAps,
            18 => NALUnitType::SuffixAps,
            19 => NALUnitType::Ph,
            20 => NALUnitType::Aud,
            21 => NALUnitType::Eos,
            22 => NALUnitType::Eob,
            23 => NALUnitType::PrefixSei,
            24 => NALUnitType::SuffixSei,
            25 => NALUnitType::Fd,
            v @ (26 | 27) => NALUnitType::ReservedNvcl(v),
            v => NALUnitType::Unspecified(v),
        }
    }
}

impl NALUnitType {
    /// Coded slice types, reserved VCL codes excluded.
    pub fn is_slice(self) -> bool {
        matches!(
            self,
            NALUnitType::Trail
                | NALUnitType::Stsa
                | NALUnitType::Radl
                | NALUnitType::Rasl
                | NALUnitType::IdrWRadl
                | NALUnitType::IdrNLp
                | NALUnitType::Cra
                | NALUnitType::Gdr
        )
    }

    /// VCL types 0..=11.
    pub fn is_vcl(self) -> bool {
        self.is_slice() || matches!(self, NALUnitType::ReservedVcl(_) | NALUnitType::ReservedIrap)
    }

    /// Non-VCL types that begin a new access unit when they follow a VCL
    /// unit (7.4.2.4.3).
    pub fn opens_access_unit(self) -> bool {
        matches!(
            self,
            NALUnitType::Aud
                | NALUnitType::Opi
                | NALUnitType::Dci
                | NALUnitType::Vps
                | NALUnitType::Sps
                | NALUnitType::Pps
                | NALUnitType::PrefixAps
                | NALUnitType::Ph
                | NALUnitType::PrefixSei
                | NALUnitType::ReservedNvcl(26)
                | NALUnitType::Unspecified(28)
                | NALUnitType::Unspecified(29)
        )
    }
}

/// The two-byte H.266 NAL unit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NALUnitHeader {
    /// Must be zero in a conforming stream
    pub forbidden_zero_bit: bool,
    /// Reserved, zero in current streams
    pub nuh_reserved_zero_bit: bool,
    /// 0 for the base layer
    pub nuh_layer_id: u8,
    /// Kind of the unit
    pub nal_unit_type: NALUnitType,
    /// Temporal sub-layer id plus one
    pub nuh_temporal_id_plus1: u8,
}

impl NalHeaderClassifier for NALUnitHeader {
    const HEADER_LEN: usize = 2;

    fn classify(header: &[u8]) -> Result<Self> {
        let [b0, b1, ..] = *header else {
            return Err(short_header(CodecType::H266, header.len()));
        };
        Ok(Self {
            forbidden_zero_bit: b0 & 0x80 != 0,
            nuh_reserved_zero_bit: b0 & 0x40 != 0,
            nuh_layer_id: b0 & 0x3F,
            nal_unit_type: NALUnitType::from(b1 >> 3),
            nuh_temporal_id_plus1: b1 & 0x07,
        })
    }

    fn is_slice(&self) -> bool {
        self.nal_unit_type.is_slice()
    }
}
