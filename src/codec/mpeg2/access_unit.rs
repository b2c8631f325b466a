use log::trace;

use super::types::{StartCodeHeader, StartCodeType};
use crate::codec::AccessUnitDetector;

/// Access unit boundary detection for MPEG-2 video.
///
/// A sequence header always opens a new access unit. A picture start code
/// does too, unless the current access unit was opened by a sequence header
/// and has not yet seen its picture.
#[derive(Debug, Default, Clone)]
pub struct Mpeg2AccessUnitDetector {
    last_au_started_by_sequence_header: bool,
    started: bool,
}

impl Mpeg2AccessUnitDetector {
    /// Creates a detector for a new stream.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessUnitDetector for Mpeg2AccessUnitDetector {
    type Header = StartCodeHeader;
    type SliceContext = ();

    fn is_start_of_new_access_unit(&mut self, header: &StartCodeHeader, _: ()) -> bool {
        let first = !self.started;
        self.started = true;

        let boundary = match header.kind {
            StartCodeType::SequenceHeader => {
                self.last_au_started_by_sequence_header = true;
                true
            }
            StartCodeType::Picture => {
                let opened = !self.last_au_started_by_sequence_header;
                self.last_au_started_by_sequence_header = false;
                opened
            }
            _ => false,
        };
        trace!("mpeg2 {} -> new access unit: {}", header.kind, boundary || first);
        boundary || first
    }
}
