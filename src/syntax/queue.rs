use std::collections::VecDeque;

use bytes::Bytes;
use log::warn;

use super::deferred::{DeferredElement, DeferredSyntax};
use super::sink::SyntaxSink;
use super::store::ParameterSetStore;
use crate::error::{DemuxError, Result};
use crate::utils::BitReader;

#[derive(Debug)]
struct Queued<E> {
    payload: Bytes,
    element: DeferredElement<E>,
}

/// Result of one [`ReparseQueue::retry_ready`] pass.
#[derive(Debug)]
pub struct RetryOutcome<E> {
    /// Elements whose remaining fields were read, in queue order.
    pub completed: Vec<DeferredElement<E>>,
    /// Elements whose resume failed, with the error. They are no longer queued.
    pub failed: Vec<(DeferredElement<E>, DemuxError)>,
}

impl<E> RetryOutcome<E> {
    /// Turns the first failure into an error, otherwise yields the completed
    /// elements.
    pub fn into_result(self) -> Result<Vec<DeferredElement<E>>> {
        match self.failed.into_iter().next() {
            Some((_, e)) => Err(e),
            None => Ok(self.completed),
        }
    }
}

/// Holds blocked elements until their parameter sets arrive.
///
/// Retries are eager: call [`retry_ready`](Self::retry_ready) right after
/// inserting a parameter set. Only elements whose required id is now present
/// are resumed, oldest first; the rest stay queued untouched. An element is
/// resumed at most once.
#[derive(Debug)]
pub struct ReparseQueue<E> {
    entries: VecDeque<Queued<E>>,
}

impl<E> Default for ReparseQueue<E> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<E: DeferredSyntax> ReparseQueue<E> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a blocked element with the payload it was read from.
    pub fn push(&mut self, payload: Bytes, element: DeferredElement<E>) -> Result<()> {
        if !element.is_blocked() {
            return Err(DemuxError::Protocol(format!(
                "{} is not blocked and cannot be queued for reparse",
                element.identity().name
            )));
        }
        self.entries.push_back(Queued { payload, element });
        Ok(())
    }

    /// Resumes every queued element whose parameter set is now stored.
    ///
    /// Completed elements are returned in queue order. An element whose
    /// resume fails is removed from the queue and handed back with its error;
    /// the store never changes an inserted id, so retrying it could only fail
    /// again. Elements behind it are still resumed.
    pub fn retry_ready(
        &mut self,
        store: &ParameterSetStore<E::ParameterSet>,
        sink: &mut dyn SyntaxSink,
    ) -> RetryOutcome<E> {
        let mut waiting = VecDeque::with_capacity(self.entries.len());
        let mut outcome = RetryOutcome {
            completed: Vec::new(),
            failed: Vec::new(),
        };

        while let Some(mut entry) = self.entries.pop_front() {
            let ready = entry
                .element
                .pending()
                .is_some_and(|p| store.contains(p.required_parameter_set_id));
            if !ready {
                waiting.push_back(entry);
                continue;
            }

            let mut reader = BitReader::new(&entry.payload);
            match entry.element.parse(&mut reader, true, store, sink) {
                Ok(_) => outcome.completed.push(entry.element),
                Err(e) => {
                    warn!(
                        "{} in unit {} failed to resume: {}",
                        entry.element.identity().name,
                        entry.element.identity().unit_index,
                        e
                    );
                    outcome.failed.push((entry.element, e));
                }
            }
        }

        self.entries = waiting;
        outcome
    }

    /// Ids the queued elements are waiting for, in queue order.
    pub fn waiting_on(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.element.pending().map(|p| p.required_parameter_set_id))
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the queue, typically at end of stream.
    pub fn drain_unresolved(&mut self) -> Vec<DeferredElement<E>> {
        if !self.entries.is_empty() {
            warn!(
                "{} elements never saw their parameter sets",
                self.entries.len()
            );
        }
        self.entries.drain(..).map(|e| e.element).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::deferred::{ElementIdentity, ParseStatus};
    use crate::syntax::sink::{read_bits, read_ue, NodeId, NullSink};
    use crate::utils::bits::test_utils::BitWriter;
    use pretty_assertions::assert_eq;

    /// An id followed by one byte.
    #[derive(Debug, Default)]
    struct Tagged {
        value: Option<u32>,
    }

    impl DeferredSyntax for Tagged {
        type ParameterSet = ();

        fn name(&self) -> &'static str {
            "tagged"
        }

        fn read_reference_id(
            &mut self,
            reader: &mut BitReader<'_>,
            sink: &mut dyn SyntaxSink,
            node: NodeId,
        ) -> Result<u32> {
            read_ue(reader, sink, node, "id")
        }

        fn read_remaining(
            &mut self,
            reader: &mut BitReader<'_>,
            sink: &mut dyn SyntaxSink,
            node: NodeId,
            _: &(),
        ) -> Result<()> {
            self.value = Some(read_bits(reader, sink, node, "value", 8)?);
            Ok(())
        }
    }

    fn blocked(id: u32, value: u32, position: usize) -> (Bytes, DeferredElement<Tagged>) {
        let mut writer = BitWriter::new();
        writer.put_golomb(id).put_bits(value, 8);
        let payload = Bytes::from(writer.finish_rbsp());

        let identity = ElementIdentity {
            name: "tagged",
            unit_index: 0,
            position,
        };
        let mut element = DeferredElement::new(identity, Tagged::default());
        let status = element
            .parse(
                &mut BitReader::new(&payload),
                false,
                &ParameterSetStore::new(),
                &mut NullSink,
            )
            .unwrap();
        assert_eq!(status, ParseStatus::Blocked);
        (payload, element)
    }

    #[test]
    fn test_retries_only_ready_elements_in_order() {
        let mut queue = ReparseQueue::new();
        for (position, (id, value)) in [(2, 10), (1, 20), (2, 30)].into_iter().enumerate() {
            let (payload, element) = blocked(id, value, position);
            queue.push(payload, element).unwrap();
        }
        assert_eq!(queue.waiting_on().collect::<Vec<_>>(), vec![2, 1, 2]);

        let mut store = ParameterSetStore::new();
        assert!(queue.retry_ready(&store, &mut NullSink).completed.is_empty());

        store.insert(2, ());
        let done = queue.retry_ready(&store, &mut NullSink).into_result().unwrap();
        let values: Vec<Option<u32>> = done.iter().map(|e| e.element().value).collect();
        assert_eq!(values, vec![Some(10), Some(30)]);
        assert!(done.iter().all(DeferredElement::is_complete));
        assert_eq!(queue.waiting_on().collect::<Vec<_>>(), vec![1]);

        let left = queue.drain_unresolved();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].identity().position, 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_failed_resume_does_not_hold_back_others() {
        let mut writer = BitWriter::new();
        writer.put_golomb(1);
        let truncated = Bytes::from(writer.finish_rbsp());
        let mut broken = DeferredElement::new(
            ElementIdentity {
                name: "tagged",
                unit_index: 0,
                position: 0,
            },
            Tagged::default(),
        );
        broken
            .parse(
                &mut BitReader::new(&truncated),
                false,
                &ParameterSetStore::new(),
                &mut NullSink,
            )
            .unwrap();

        let mut queue = ReparseQueue::new();
        queue.push(truncated, broken).unwrap();
        for (position, (id, value)) in [(1, 7), (2, 9)].into_iter().enumerate() {
            let (payload, element) = blocked(id, value, position + 1);
            queue.push(payload, element).unwrap();
        }

        let mut store = ParameterSetStore::new();
        store.insert(1, ());
        let outcome = queue.retry_ready(&store, &mut NullSink);
        let values: Vec<Option<u32>> = outcome.completed.iter().map(|e| e.element().value).collect();
        assert_eq!(values, vec![Some(7)]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0.identity().position, 0);
        assert!(matches!(outcome.failed[0].1, DemuxError::Parser(_)));
        assert_eq!(queue.waiting_on().collect::<Vec<_>>(), vec![2]);

        // the failed element is gone, later inserts only see the rest
        store.insert(2, ());
        let outcome = queue.retry_ready(&store, &mut NullSink);
        assert!(outcome.failed.is_empty());
        assert_eq!(outcome.completed.len(), 1);
        assert_eq!(outcome.completed[0].element().value, Some(9));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rejects_elements_that_are_not_blocked() {
        let mut queue: ReparseQueue<Tagged> = ReparseQueue::new();
        let identity = ElementIdentity {
            name: "tagged",
            unit_index: 0,
            position: 0,
        };
        let fresh = DeferredElement::new(identity, Tagged::default());
        assert!(matches!(
            queue.push(Bytes::new(), fresh),
            Err(DemuxError::Protocol(_))
        ));
        assert_eq!(queue.len(), 0);
    }
}
