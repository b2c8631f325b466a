use log::trace;

use super::types::NALUnitHeader;
use crate::codec::AccessUnitDetector;

/// Access unit boundary detection for H.265 streams.
///
/// The slice context is `first_slice_segment_in_pic_flag` from the slice
/// segment header; it is ignored for non-slice units. Only base layer units
/// (nuh_layer_id 0) can open an access unit.
#[derive(Debug, Default, Clone)]
pub struct H265AccessUnitDetector {
    primary_picture_seen: bool,
    started: bool,
}

impl H265AccessUnitDetector {
    /// Creates a detector for a new stream.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessUnitDetector for H265AccessUnitDetector {
    type Header = NALUnitHeader;
    type SliceContext = bool;

    fn is_start_of_new_access_unit(
        &mut self,
        header: &NALUnitHeader,
        first_slice_segment_in_pic_flag: bool,
    ) -> bool {
        let kind = header.nal_unit_type;
        let is_slice = kind.is_slice();
        let base_layer = header.nuh_layer_id == 0;

        let mut boundary = !self.started;
        self.started = true;

        if self.primary_picture_seen && base_layer {
            if kind.opens_access_unit() || (is_slice && first_slice_segment_in_pic_flag) {
                boundary = true;
            }
        }

        if is_slice {
            self.primary_picture_seen = true;
        } else if boundary {
            self.primary_picture_seen = false;
        }

        trace!(
            "h265 {} layer {} -> new access unit: {}",
            kind,
            header.nuh_layer_id,
            boundary
        );
        boundary
    }
}
