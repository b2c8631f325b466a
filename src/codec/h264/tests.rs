use super::*;
use crate::codec::NalHeaderClassifier;
use crate::error::DemuxError;
use crate::syntax::{
    DeferredElement, ElementIdentity, NullSink, ParameterSetStore, ParseStatus, SyntaxTree,
};
use crate::utils::bits::test_utils::BitWriter;
use crate::utils::BitReader;
use pretty_assertions::assert_eq;

#[test]
fn test_header_fields() {
    let header = NALUnitHeader::classify(&[0x65, 0x88]).unwrap();
    assert_eq!(header.nal_ref_idc, 3);
    assert_eq!(header.nal_unit_type, NALUnitType::CodedSliceIDR);
    assert!(header.is_keyframe());
    assert!(header.is_slice());
    assert!(!header.forbidden_zero_bit);

    let header = NALUnitHeader::classify(&[0x01]).unwrap();
    assert_eq!(header.nal_ref_idc, 0);
    assert_eq!(header.nal_unit_type, NALUnitType::CodedSliceNonIDR);
    assert!(!header.is_keyframe());

    assert!(NALUnitHeader::classify(&[0x80]).unwrap().forbidden_zero_bit);
}

#[test]
fn test_every_type_code_classifies() {
    for code in 0u8..32 {
        let kind = NALUnitType::from(code);
        assert_eq!(kind.id(), code, "{}", kind);
    }
    assert_eq!(NALUnitType::from(0), NALUnitType::Unspecified(0));
    assert_eq!(NALUnitType::from(24), NALUnitType::Unspecified(24));
    assert_eq!(NALUnitType::from(14), NALUnitType::PrefixNal);
    assert_eq!(NALUnitType::from(15), NALUnitType::SubsetSPS);
    assert_eq!(NALUnitType::from(16), NALUnitType::DepthParameterSet);
    assert_eq!(NALUnitType::from(23), NALUnitType::Reserved(23));
    assert_eq!(NALUnitType::from(20).to_string(), "SliceExtension");
}

fn hrd(cpb_cnt_minus1: u32, length_minus1: u32) -> HrdParameters {
    HrdParameters {
        cpb_cnt_minus1,
        initial_cpb_removal_delay_length_minus1: length_minus1,
        ..HrdParameters::default()
    }
}

fn identity() -> ElementIdentity {
    ElementIdentity {
        name: "buffering_period",
        unit_index: 3,
        position: 0,
    }
}

/// seq_parameter_set_id 0, one NAL schedule of 24 bit fields, two VCL
/// schedules of 10 bit fields.
fn buffering_period_payload() -> Vec<u8> {
    let mut writer = BitWriter::new();
    writer.put_golomb(0);
    writer.put_bits(90_000, 24).put_bits(1_234, 24);
    writer.put_bits(700, 10).put_bits(5, 10);
    writer.put_bits(300, 10).put_bits(6, 10);
    writer.finish_rbsp()
}

fn sps_with_hrd() -> SPSInfo {
    SPSInfo {
        seq_parameter_set_id: 0,
        profile_idc: 100,
        level_idc: 40,
        nal_hrd: Some(hrd(0, 23)),
        vcl_hrd: Some(hrd(1, 9)),
        ..SPSInfo::default()
    }
}

#[test]
fn test_buffering_period_blocks_until_sps_arrives() {
    let payload = buffering_period_payload();
    let mut store = ParameterSetStore::new();
    let mut tree = SyntaxTree::new();

    let mut element = DeferredElement::new(identity(), BufferingPeriod::new());
    let status = element
        .parse(&mut BitReader::new(&payload), false, &store, &mut tree)
        .unwrap();
    assert_eq!(status, ParseStatus::Blocked);
    assert_eq!(element.element().seq_parameter_set_id, 0);
    assert!(element.element().nal_initial_cpb_removal.is_empty());
    assert_eq!(element.pending().unwrap().required_parameter_set_id, 0);

    assert!(store.insert(0, sps_with_hrd()));
    let status = element
        .parse(&mut BitReader::new(&payload), true, &store, &mut tree)
        .unwrap();
    assert_eq!(status, ParseStatus::Ok);

    let bp = element.into_inner();
    assert_eq!(bp.seq_parameter_set_id, 0);
    assert_eq!(
        bp.nal_initial_cpb_removal,
        vec![InitialCpbRemoval {
            initial_cpb_removal_delay: 90_000,
            initial_cpb_removal_delay_offset: 1_234,
        }]
    );
    assert_eq!(bp.vcl_initial_cpb_removal.len(), 2);
    assert_eq!(bp.vcl_initial_cpb_removal[1].initial_cpb_removal_delay, 300);

    // the id was reported once, on the first pass
    let node = tree.roots().next().unwrap();
    let fields = &tree.node(node).unwrap().fields;
    assert_eq!(fields.iter().filter(|f| f.name == "seq_parameter_set_id").count(), 1);
    assert_eq!(fields.len(), 7);
    assert_eq!(
        tree.find_field(node, "vcl_initial_cpb_removal_delay_offset[1]").unwrap().value,
        6
    );
}

#[test]
fn test_buffering_period_without_hrd_reads_nothing_else() {
    let mut writer = BitWriter::new();
    writer.put_golomb(5);
    let payload = writer.finish_rbsp();

    let mut store = ParameterSetStore::new();
    store.insert(5, SPSInfo::default());

    let mut element = DeferredElement::new(identity(), BufferingPeriod::new());
    let mut reader = BitReader::new(&payload);
    let status = element.parse(&mut reader, false, &store, &mut NullSink).unwrap();
    assert_eq!(status, ParseStatus::Ok);
    assert_eq!(element.element().seq_parameter_set_id, 5);
    // only the trailing bits are left
    assert_eq!(reader.available_bits(), 3);
}

#[test]
fn test_truncated_payload_fails_on_resume() {
    let mut writer = BitWriter::new();
    writer.put_golomb(0).put_bits(1, 4);
    let payload = writer.finish_rbsp();

    let mut store = ParameterSetStore::new();
    let mut element = DeferredElement::new(identity(), BufferingPeriod::new());
    element
        .parse(&mut BitReader::new(&payload), false, &store, &mut NullSink)
        .unwrap();

    store.insert(0, sps_with_hrd());
    let result = element.parse(&mut BitReader::new(&payload), true, &store, &mut NullSink);
    assert!(matches!(result, Err(DemuxError::Parser(_))));
}
