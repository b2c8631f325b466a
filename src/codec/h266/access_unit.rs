use log::trace;

use super::types::NALUnitHeader;
use crate::codec::AccessUnitDetector;

/// Access unit boundary detection for H.266 streams.
///
/// The slice context is the picture order count taken from the picture
/// header, when known. Two consecutive VCL units belong to different access
/// units when their layer id or picture order differ; a VCL unit followed by
/// a parameter set, picture header, AUD or prefix SEI also closes the access
/// unit.
#[derive(Debug, Default, Clone)]
pub struct H266AccessUnitDetector {
    last_unit_was_vcl: bool,
    last_vcl_layer_id: u8,
    last_vcl_poc: Option<i32>,
    started: bool,
}

impl H266AccessUnitDetector {
    /// Creates a detector for a new stream.
    pub fn new() -> Self {
        Self::default()
    }

    fn decide(&mut self, header: &NALUnitHeader, poc: Option<i32>) -> bool {
        let kind = header.nal_unit_type;
        if self.last_unit_was_vcl && kind.opens_access_unit() {
            self.last_unit_was_vcl = false;
            return true;
        }

        let is_vcl = kind.is_vcl();
        let mut boundary = false;
        if is_vcl {
            if self.last_unit_was_vcl {
                let poc_changed = matches!((self.last_vcl_poc, poc), (Some(a), Some(b)) if a != b);
                boundary = header.nuh_layer_id != self.last_vcl_layer_id || poc_changed;
            }
            self.last_vcl_layer_id = header.nuh_layer_id;
            if poc.is_some() {
                self.last_vcl_poc = poc;
            }
        }
        self.last_unit_was_vcl = is_vcl;
        boundary
    }
}

impl AccessUnitDetector for H266AccessUnitDetector {
    type Header = NALUnitHeader;
    type SliceContext = Option<i32>;

    fn is_start_of_new_access_unit(&mut self, header: &NALUnitHeader, poc: Option<i32>) -> bool {
        let first = !self.started;
        self.started = true;
        let boundary = self.decide(header, poc) || first;
        trace!(
            "h266 {:?} layer {} -> new access unit: {}",
            header.nal_unit_type,
            header.nuh_layer_id,
            boundary
        );
        boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::h266::NALUnitType;
    use crate::codec::NalHeaderClassifier;
    use pretty_assertions::assert_eq;

    fn header(nal_unit_type: u8, layer_id: u8) -> NALUnitHeader {
        NALUnitHeader::classify(&[layer_id & 0x3F, (nal_unit_type << 3) | 1]).unwrap()
    }

    const IDR: u8 = 8;
    const TRAIL: u8 = 0;
    const SPS: u8 = 15;
    const PPS: u8 = 16;
    const PH: u8 = 19;
    const AUD: u8 = 20;
    const SUFFIX_SEI: u8 = 24;

    #[test]
    fn test_picture_header_closes_previous_picture() {
        let mut detector = H266AccessUnitDetector::new();
        let units = [
            (SPS, None, true),
            (PPS, None, false),
            (PH, None, false),
            (IDR, Some(0), false),
            (IDR, Some(0), false),
            (SUFFIX_SEI, None, false),
            (PH, None, false),
            (TRAIL, Some(1), false),
            (PH, None, true),
            (TRAIL, Some(2), false),
            (AUD, None, true),
        ];
        // the suffix SEI breaks the VCL run, so the following PH is no boundary
        for (i, &(t, poc, expected)) in units.iter().enumerate() {
            let got = detector.is_start_of_new_access_unit(&header(t, 0), poc);
            assert_eq!(got, expected, "unit {}", i);
        }
    }

    #[test]
    fn test_consecutive_slices_of_different_pictures() {
        let mut detector = H266AccessUnitDetector::new();
        assert!(detector.is_start_of_new_access_unit(&header(IDR, 0), Some(0)));
        assert!(!detector.is_start_of_new_access_unit(&header(IDR, 0), Some(0)));
        assert!(detector.is_start_of_new_access_unit(&header(TRAIL, 0), Some(4)));
        assert!(detector.is_start_of_new_access_unit(&header(TRAIL, 1), Some(4)));
        // no picture order supplied: only the layer is compared
        assert!(!detector.is_start_of_new_access_unit(&header(TRAIL, 1), None));
    }

    #[test]
    fn test_header_layout() {
        let h = NALUnitHeader::classify(&[0x45, (PPS << 3) | 2]).unwrap();
        assert!(h.nuh_reserved_zero_bit);
        assert_eq!(h.nuh_layer_id, 5);
        assert_eq!(h.nal_unit_type, NALUnitType::Pps);
        assert_eq!(h.nuh_temporal_id_plus1, 2);
        assert_eq!(NALUnitType::from(27), NALUnitType::ReservedNvcl(27));
        assert_eq!(NALUnitType::from(30), NALUnitType::Unspecified(30));
        assert!(NALUnitType::from(5).is_vcl());
        assert!(!NALUnitType::from(5).is_slice());
    }
}
