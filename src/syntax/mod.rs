//! # Deferred Syntax Parsing
//!
//! Some syntax structures name a parameter set by id before the fields that
//! need it, and that parameter set may not have been seen yet. Such elements
//! are parsed in two steps:
//!
//! 1. [`DeferredElement::parse`] with `reparse = false` reads the id. If the
//!    [`ParameterSetStore`] lacks it, a [`PendingSyntaxState`] is saved and
//!    [`ParseStatus::Blocked`] is returned.
//! 2. Once the id is stored, the same call with `reparse = true` resumes at
//!    the saved cursor and reads the rest.
//!
//! [`ReparseQueue`] schedules step 2 right after parameter set insertion.
//! Parsed fields are reported to a [`SyntaxSink`].

mod deferred;
mod queue;
/// SEI message framing
pub mod sei;
mod sink;
mod store;

pub use deferred::{
    DeferredElement, DeferredSyntax, ElementIdentity, ParseStatus, PendingSyntaxState,
};
pub use queue::{ReparseQueue, RetryOutcome};
pub use sei::{split_sei_messages, SeiMessage};
pub use sink::{
    read_bits, read_flag, read_ue, FieldRecord, NodeId, NullSink, SyntaxNode, SyntaxSink,
    SyntaxTree,
};
pub use store::ParameterSetStore;
