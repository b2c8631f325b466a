use log::trace;

use super::types::NALUnitHeader;
use crate::codec::AccessUnitDetector;

/// Access unit boundary detection for H.264 streams.
///
/// The slice context is the picture order count of a slice when the caller
/// has decoded it from the slice header, `None` otherwise.
#[derive(Debug, Default, Clone)]
pub struct H264AccessUnitDetector {
    primary_picture_seen: bool,
    last_slice_poc: Option<i32>,
    started: bool,
}

impl H264AccessUnitDetector {
    /// Creates a detector for a new stream.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessUnitDetector for H264AccessUnitDetector {
    type Header = NALUnitHeader;
    type SliceContext = Option<i32>;

    fn is_start_of_new_access_unit(&mut self, header: &NALUnitHeader, poc: Option<i32>) -> bool {
        let kind = header.nal_unit_type;
        let is_slice = kind.is_slice();

        let mut boundary = !self.started;
        self.started = true;

        if self.primary_picture_seen && kind.opens_access_unit() {
            boundary = true;
        }
        // a change of picture order always starts a new picture, whether or
        // not a non-VCL unit already opened the access unit
        if let Some(poc) = poc.filter(|_| is_slice) {
            if self.last_slice_poc.is_some_and(|last| last != poc) {
                boundary = true;
            }
            self.last_slice_poc = Some(poc);
        }

        if is_slice {
            self.primary_picture_seen = true;
        } else if boundary {
            self.primary_picture_seen = false;
        }

        trace!("h264 {} -> new access unit: {}", kind, boundary);
        boundary
    }
}
