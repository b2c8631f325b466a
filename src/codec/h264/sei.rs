use super::types::{HrdParameters, SPSInfo};
use crate::error::Result;
use crate::syntax::{read_bits, read_ue, DeferredSyntax, NodeId, SyntaxSink};
use crate::utils::BitReader;

/// One entry of the initial CPB removal tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialCpbRemoval {
    /// initial_cpb_removal_delay[i], in 90 kHz ticks
    pub initial_cpb_removal_delay: u32,
    /// initial_cpb_removal_delay_offset[i]
    pub initial_cpb_removal_delay_offset: u32,
}

/// Buffering period SEI message (D.1.2).
///
/// The field widths come from the HRD parameters of the SPS named by
/// `seq_parameter_set_id`, so the message is parsed through
/// [`DeferredElement`](crate::syntax::DeferredElement).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferingPeriod {
    /// Id of the SPS whose HRD parameters size the tables
    pub seq_parameter_set_id: u32,
    /// One entry per NAL HRD schedule, empty without NAL HRD
    pub nal_initial_cpb_removal: Vec<InitialCpbRemoval>,
    /// One entry per VCL HRD schedule, empty without VCL HRD
    pub vcl_initial_cpb_removal: Vec<InitialCpbRemoval>,
}

impl BufferingPeriod {
    /// An empty message ready to be parsed.
    pub fn new() -> Self {
        Self::default()
    }
}

fn read_initial_delays(
    reader: &mut BitReader<'_>,
    sink: &mut dyn SyntaxSink,
    node: NodeId,
    prefix: &str,
    hrd: &HrdParameters,
) -> Result<Vec<InitialCpbRemoval>> {
    let n = hrd.initial_cpb_removal_delay_length_minus1 + 1;
    let mut entries = Vec::with_capacity(hrd.cpb_cnt_minus1 as usize + 1);
    for i in 0..=hrd.cpb_cnt_minus1 {
        let delay_name = format!("{}_initial_cpb_removal_delay[{}]", prefix, i);
        let offset_name = format!("{}_initial_cpb_removal_delay_offset[{}]", prefix, i);
        entries.push(InitialCpbRemoval {
            initial_cpb_removal_delay: read_bits(reader, sink, node, &delay_name, n)?,
            initial_cpb_removal_delay_offset: read_bits(reader, sink, node, &offset_name, n)?,
        });
    }
    Ok(entries)
}

impl DeferredSyntax for BufferingPeriod {
    type ParameterSet = SPSInfo;

    fn name(&self) -> &'static str {
        "buffering_period"
    }

    fn read_reference_id(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut dyn SyntaxSink,
        node: NodeId,
    ) -> Result<u32> {
        self.seq_parameter_set_id = read_ue(reader, sink, node, "seq_parameter_set_id")?;
        Ok(self.seq_parameter_set_id)
    }

    fn read_remaining(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut dyn SyntaxSink,
        node: NodeId,
        sps: &SPSInfo,
    ) -> Result<()> {
        if let Some(hrd) = &sps.nal_hrd {
            self.nal_initial_cpb_removal = read_initial_delays(reader, sink, node, "nal", hrd)?;
        }
        if let Some(hrd) = &sps.vcl_hrd {
            self.vcl_initial_cpb_removal = read_initial_delays(reader, sink, node, "vcl", hrd)?;
        }
        Ok(())
    }
}
