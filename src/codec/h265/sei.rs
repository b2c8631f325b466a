use super::types::{HrdParameters, SPSInfo};
use crate::error::{DemuxError, Result};
use crate::syntax::{read_bits, read_flag, read_ue, DeferredSyntax, NodeId, SyntaxSink};
use crate::utils::BitReader;

/// One schedule of the initial CPB removal tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialCpbRemoval {
    /// initial_cpb_removal_delay[i]
    pub initial_cpb_removal_delay: u32,
    /// initial_cpb_removal_offset[i]
    pub initial_cpb_removal_offset: u32,
    /// (delay, offset) of the alternative timing, when signalled
    pub initial_alt_cpb_removal: Option<(u32, u32)>,
}

/// Buffering period SEI message (D.2.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferingPeriod {
    /// Id of the SPS that carries the HRD parameters
    pub bp_seq_parameter_set_id: u32,
    /// Set when the delay offsets below were signalled
    pub irap_cpb_params_present_flag: bool,
    /// cpb_delay_offset, 0 when not signalled
    pub cpb_delay_offset: u32,
    /// dpb_delay_offset, 0 when not signalled
    pub dpb_delay_offset: u32,
    /// concatenation_flag
    pub concatenation_flag: bool,
    /// au_cpb_removal_delay_delta_minus1
    pub au_cpb_removal_delay_delta_minus1: u32,
    /// NAL HRD schedules
    pub nal_initial_cpb_removal: Vec<InitialCpbRemoval>,
    /// VCL HRD schedules
    pub vcl_initial_cpb_removal: Vec<InitialCpbRemoval>,
}

impl BufferingPeriod {
    /// An empty message ready to be parsed.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_schedules(
        &self,
        reader: &mut BitReader<'_>,
        sink: &mut dyn SyntaxSink,
        node: NodeId,
        prefix: &str,
        hrd: &HrdParameters,
    ) -> Result<Vec<InitialCpbRemoval>> {
        let n = hrd.initial_cpb_removal_delay_length_minus1 + 1;
        let with_alt = hrd.sub_pic_hrd_params_present_flag || self.irap_cpb_params_present_flag;

        let mut schedules = Vec::with_capacity(hrd.cpb_cnt_minus1 as usize + 1);
        for i in 0..=hrd.cpb_cnt_minus1 {
            let mut field = |name: &str| -> Result<u32> {
                read_bits(reader, sink, node, &format!("{}_{}[{}]", prefix, name, i), n)
            };
            let delay = field("initial_cpb_removal_delay")?;
            let offset = field("initial_cpb_removal_offset")?;
            let alt = if with_alt {
                Some((
                    field("initial_alt_cpb_removal_delay")?,
                    field("initial_alt_cpb_removal_offset")?,
                ))
            } else {
                None
            };
            schedules.push(InitialCpbRemoval {
                initial_cpb_removal_delay: delay,
                initial_cpb_removal_offset: offset,
                initial_alt_cpb_removal: alt,
            });
        }
        Ok(schedules)
    }
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
        self.bp_seq_parameter_set_id = read_ue(reader, sink, node, "bp_seq_parameter_set_id")?;
        Ok(self.bp_seq_parameter_set_id)
    }

    fn read_remaining(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut dyn SyntaxSink,
        node: NodeId,
        sps: &SPSInfo,
    ) -> Result<()> {
        let hrd = sps.hrd.as_ref().ok_or_else(|| {
            DemuxError::InvalidData(format!(
                "SPS {} carries no HRD parameters for buffering_period",
                sps.sps_id
            ))
        })?;

        if !hrd.sub_pic_hrd_params_present_flag {
            self.irap_cpb_params_present_flag =
                read_flag(reader, sink, node, "irap_cpb_params_present_flag")?;
        }
        if self.irap_cpb_params_present_flag {
            self.cpb_delay_offset = read_bits(
                reader,
                sink,
                node,
                "cpb_delay_offset",
                hrd.au_cpb_removal_delay_length_minus1 + 1,
            )?;
            self.dpb_delay_offset = read_bits(
                reader,
                sink,
                node,
                "dpb_delay_offset",
                hrd.dpb_output_delay_length_minus1 + 1,
            )?;
        }
        self.concatenation_flag = read_flag(reader, sink, node, "concatenation_flag")?;
        self.au_cpb_removal_delay_delta_minus1 = read_bits(
            reader,
            sink,
            node,
            "au_cpb_removal_delay_delta_minus1",
            hrd.au_cpb_removal_delay_length_minus1 + 1,
        )?;

        if hrd.nal_hrd_parameters_present_flag {
            self.nal_initial_cpb_removal = self.read_schedules(reader, sink, node, "nal", hrd)?;
        }
        if hrd.vcl_hrd_parameters_present_flag {
            self.vcl_initial_cpb_removal = self.read_schedules(reader, sink, node, "vcl", hrd)?;
        }
        Ok(())
    }
}
