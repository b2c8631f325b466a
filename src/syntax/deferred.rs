use log::debug;

use super::sink::{NodeId, SyntaxSink};
use super::store::ParameterSetStore;
use crate::error::{DemuxError, Result};
use crate::utils::{BitReader, Cursor};

/// Outcome of [`DeferredElement::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// Every field has been read.
    Ok,
    /// The referenced parameter set is unknown; the element waits for it.
    Blocked,
}

/// Names one element instance so it can be traced across a suspension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementIdentity {
    /// Syntax structure name, e.g. `buffering_period`.
    pub name: &'static str,
    /// Index of the unit the element was found in.
    pub unit_index: u64,
    /// Position of the element inside that unit, e.g. the SEI message index.
    pub position: usize,
}

/// Everything needed to resume a blocked element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSyntaxState {
    /// The suspended element.
    pub element: ElementIdentity,
    /// Reader position right after the reference id.
    pub cursor: Cursor,
    /// Inspection node the remaining fields are reported to.
    pub output_node: NodeId,
    /// Id that must be present in the store before resuming.
    pub required_parameter_set_id: u32,
}

/// A syntax structure whose later fields depend on a parameter set named by
/// an id in its leading fields.
pub trait DeferredSyntax {
    /// Type of the referenced parameter set.
    type ParameterSet;

    /// Structure name used for inspection nodes and errors.
    fn name(&self) -> &'static str;

    /// Reads the leading fields up to and including the reference id, and
    /// returns that id.
    fn read_reference_id(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut dyn SyntaxSink,
        node: NodeId,
    ) -> Result<u32>;

    /// Reads everything after the reference id.
    fn read_remaining(
        &mut self,
        reader: &mut BitReader<'_>,
        sink: &mut dyn SyntaxSink,
        node: NodeId,
        parameter_set: &Self::ParameterSet,
    ) -> Result<()>;
}

#[derive(Debug, Clone)]
enum Phase {
    Fresh,
    Blocked(PendingSyntaxState),
    Complete,
}

/// Drives a [`DeferredSyntax`] through its two-call parse protocol.
///
/// The first call (`reparse = false`) reads the reference id. When the store
/// lacks that id it captures a [`PendingSyntaxState`] and returns
/// [`ParseStatus::Blocked`]. The second call (`reparse = true`) restores the
/// saved cursor and reads the remaining fields without touching the id again.
#[derive(Debug, Clone)]
pub struct DeferredElement<E> {
    identity: ElementIdentity,
    parent: Option<NodeId>,
    element: E,
    phase: Phase,
}

impl<E: DeferredSyntax> DeferredElement<E> {
    /// Wraps an element. `identity.name` is normally `element.name()`.
    pub fn new(identity: ElementIdentity, element: E) -> Self {
        Self {
            identity,
            parent: None,
            element,
            phase: Phase::Fresh,
        }
    }

    /// Places the element's inspection node below `parent`.
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Runs one step of the protocol.
    ///
    /// Errors with [`DemuxError::Protocol`] when called out of order and with
    /// [`DemuxError::MissingParameterSet`] when a reparse still cannot find its
    /// parameter set. Neither case is retried.
    pub fn parse(
        &mut self,
        reader: &mut BitReader<'_>,
        reparse: bool,
        store: &ParameterSetStore<E::ParameterSet>,
        sink: &mut dyn SyntaxSink,
    ) -> Result<ParseStatus> {
        if reparse {
            self.resume(reader, store, sink)
        } else {
            self.first_pass(reader, store, sink)
        }
    }

    fn first_pass(
        &mut self,
        reader: &mut BitReader<'_>,
        store: &ParameterSetStore<E::ParameterSet>,
        sink: &mut dyn SyntaxSink,
    ) -> Result<ParseStatus> {
        match &self.phase {
            Phase::Fresh => {}
            Phase::Blocked(pending) => {
                return Err(DemuxError::Protocol(format!(
                    "{} is already waiting for parameter set {}",
                    self.identity.name, pending.required_parameter_set_id
                )))
            }
            Phase::Complete => {
                return Err(DemuxError::Protocol(format!(
                    "{} has already been parsed",
                    self.identity.name
                )))
            }
        }

        let node = sink.open_node(self.parent, self.element.name());
        let id = self.element.read_reference_id(reader, sink, node)?;

        let Some(parameter_set) = store.get(id) else {
            debug!(
                "{} in unit {} blocked on parameter set {}",
                self.identity.name, self.identity.unit_index, id
            );
            self.phase = Phase::Blocked(PendingSyntaxState {
                element: self.identity.clone(),
                cursor: reader.cursor(),
                output_node: node,
                required_parameter_set_id: id,
            });
            return Ok(ParseStatus::Blocked);
        };

        self.element.read_remaining(reader, sink, node, parameter_set)?;
        self.phase = Phase::Complete;
        Ok(ParseStatus::Ok)
    }

    fn resume(
        &mut self,
        reader: &mut BitReader<'_>,
        store: &ParameterSetStore<E::ParameterSet>,
        sink: &mut dyn SyntaxSink,
    ) -> Result<ParseStatus> {
        let pending = match &self.phase {
            Phase::Blocked(pending) => pending,
            Phase::Fresh => {
                return Err(DemuxError::Protocol(format!(
                    "{} was never parsed, nothing to resume",
                    self.identity.name
                )))
            }
            Phase::Complete => {
                return Err(DemuxError::Protocol(format!(
                    "{} has already been parsed",
                    self.identity.name
                )))
            }
        };

        let id = pending.required_parameter_set_id;
        let parameter_set = store
            .get(id)
            .ok_or_else(|| DemuxError::MissingParameterSet {
                element: self.identity.name.to_string(),
                id,
            })?;
        let node = pending.output_node;
        reader.restore(pending.cursor)?;

        self.element.read_remaining(reader, sink, node, parameter_set)?;
        debug!(
            "{} in unit {} resumed with parameter set {}",
            self.identity.name, self.identity.unit_index, id
        );
        self.phase = Phase::Complete;
        Ok(ParseStatus::Ok)
    }

    /// Saved state while blocked.
    pub fn pending(&self) -> Option<&PendingSyntaxState> {
        match &self.phase {
            Phase::Blocked(pending) => Some(pending),
            _ => None,
        }
    }

    /// Whether the element waits for a parameter set.
    pub fn is_blocked(&self) -> bool {
        matches!(self.phase, Phase::Blocked(_))
    }

    /// Whether all fields have been read.
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    /// The element's identity.
    pub fn identity(&self) -> &ElementIdentity {
        &self.identity
    }

    /// The parsed fields so far.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Unwraps the element.
    pub fn into_inner(self) -> E {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::sink::{read_bits, read_ue, NullSink, SyntaxTree};
    use crate::utils::bits::test_utils::BitWriter;
    use pretty_assertions::assert_eq;

    /// Reads an id, then as many bytes as the referenced set announces.
    #[derive(Debug, Default)]
    struct Counted {
        id: Option<u32>,
        body: Vec<u32>,
    }

    impl DeferredSyntax for Counted {
        type ParameterSet = u32;

        fn name(&self) -> &'static str {
            "sized"
        }

        fn read_reference_id(
            &mut self,
            reader: &mut BitReader<'_>,
            sink: &mut dyn SyntaxSink,
            node: NodeId,
        ) -> Result<u32> {
            let id = read_ue(reader, sink, node, "id")?;
            self.id = Some(id);
            Ok(id)
        }

        fn read_remaining(
            &mut self,
            reader: &mut BitReader<'_>,
            sink: &mut dyn SyntaxSink,
            node: NodeId,
            count: &u32,
        ) -> Result<()> {
            for _ in 0..*count {
                self.body.push(read_bits(reader, sink, node, "byte", 8)?);
            }
            Ok(())
        }
    }

    fn identity() -> ElementIdentity {
        ElementIdentity {
            name: "sized",
            unit_index: 7,
            position: 0,
        }
    }

    fn payload() -> Vec<u8> {
        let mut writer = BitWriter::new();
        writer.put_golomb(2).put_bits(0xAB, 8).put_bits(0xCD, 8);
        writer.finish_rbsp()
    }

    #[test]
    fn test_direct_parse_when_set_known() {
        let data = payload();
        let mut store = ParameterSetStore::new();
        store.insert(2, 2u32);

        let mut element = DeferredElement::new(identity(), Counted::default());
        let status = element
            .parse(&mut BitReader::new(&data), false, &store, &mut NullSink)
            .unwrap();
        assert_eq!(status, ParseStatus::Ok);
        assert!(element.is_complete());
        assert_eq!(element.element().body, vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_block_then_resume_with_fresh_reader() {
        let data = payload();
        let mut store = ParameterSetStore::new();
        let mut tree = SyntaxTree::new();
        let root = tree.open_node(None, "sei_message()");

        let mut element = DeferredElement::new(identity(), Counted::default()).with_parent(root);
        let status = element
            .parse(&mut BitReader::new(&data), false, &store, &mut tree)
            .unwrap();
        assert_eq!(status, ParseStatus::Blocked);

        let pending = element.pending().unwrap().clone();
        assert_eq!(pending.required_parameter_set_id, 2);
        assert_eq!(pending.cursor.bit_position(), 3);
        assert_eq!(pending.element, identity());
        assert!(element.element().body.is_empty());

        store.insert(2, 2u32);
        let status = element
            .parse(&mut BitReader::new(&data), true, &store, &mut tree)
            .unwrap();
        assert_eq!(status, ParseStatus::Ok);
        assert!(element.pending().is_none());
        assert_eq!(element.element().body, vec![0xAB, 0xCD]);

        // id recorded once, body fields appended to the same node
        let node = tree.node(pending.output_node).unwrap();
        assert_eq!(node.parent, Some(root));
        let names: Vec<&str> = node.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "byte", "byte"]);
    }

    #[test]
    fn test_protocol_violations() {
        let data = payload();
        let store: ParameterSetStore<u32> = ParameterSetStore::new();

        let mut element = DeferredElement::new(identity(), Counted::default());
        assert!(matches!(
            element.parse(&mut BitReader::new(&data), true, &store, &mut NullSink),
            Err(DemuxError::Protocol(_))
        ));

        element
            .parse(&mut BitReader::new(&data), false, &store, &mut NullSink)
            .unwrap();
        assert!(matches!(
            element.parse(&mut BitReader::new(&data), false, &store, &mut NullSink),
            Err(DemuxError::Protocol(_))
        ));
        assert!(matches!(
            element.parse(&mut BitReader::new(&data), true, &store, &mut NullSink),
            Err(DemuxError::MissingParameterSet { id: 2, .. })
        ));
        // still blocked after the failed resume
        assert!(element.is_blocked());
    }
}
