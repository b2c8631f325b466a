use crate::error::Result;
use crate::utils::BitReader;

/// Handle of a node created through [`SyntaxSink::open_node`].
pub type NodeId = usize;

/// Receives the structure and field values met while parsing.
///
/// Sinks are infallible and run synchronously inside the parse call.
pub trait SyntaxSink {
    /// Opens a named node below `parent` and returns its handle.
    fn open_node(&mut self, parent: Option<NodeId>, name: &str) -> NodeId;

    /// Records one parsed field of `node`.
    fn field(&mut self, node: NodeId, name: &str, value: u64, bit_len: u32);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SyntaxSink for NullSink {
    fn open_node(&mut self, _parent: Option<NodeId>, _name: &str) -> NodeId {
        0
    }

    fn field(&mut self, _node: NodeId, _name: &str, _value: u64, _bit_len: u32) {}
}

/// A field as recorded by [`SyntaxTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    /// Syntax element name.
    pub name: String,
    /// Decoded value.
    pub value: u64,
    /// Bits consumed in the bitstream.
    pub bit_len: u32,
}

/// A node of a [`SyntaxTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Syntax structure name.
    pub name: String,
    /// Enclosing node, `None` for roots.
    pub parent: Option<NodeId>,
    /// Child nodes in creation order.
    pub children: Vec<NodeId>,
    /// Fields in parse order.
    pub fields: Vec<FieldRecord>,
}

/// In-memory inspection tree.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id)
    }

    /// Children of `id`, empty for an unknown id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    /// First field called `name` in `node`.
    pub fn find_field(&self, node: NodeId, name: &str) -> Option<&FieldRecord> {
        self.nodes.get(node)?.fields.iter().find(|f| f.name == name)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been opened.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SyntaxSink for SyntaxTree {
    fn open_node(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let id = self.nodes.len();
        let parent = parent.filter(|&p| p < id);
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        self.nodes.push(SyntaxNode {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            fields: Vec::new(),
        });
        id
    }

    fn field(&mut self, node: NodeId, name: &str, value: u64, bit_len: u32) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.fields.push(FieldRecord {
                name: name.to_string(),
                value,
                bit_len,
            });
        }
    }
}

fn bits_since(reader: &BitReader<'_>, start: usize) -> u32 {
    (reader.cursor().bit_position() - start) as u32
}

/// Reads u(1) and reports it.
pub fn read_flag(
    reader: &mut BitReader<'_>,
    sink: &mut dyn SyntaxSink,
    node: NodeId,
    name: &str,
) -> Result<bool> {
    let value = reader.read_bit()?;
    sink.field(node, name, value as u64, 1);
    Ok(value)
}

/// Reads u(n) and reports it.
pub fn read_bits(
    reader: &mut BitReader<'_>,
    sink: &mut dyn SyntaxSink,
    node: NodeId,
    name: &str,
    n: u32,
) -> Result<u32> {
    let value = reader.read_bits(n)?;
    sink.field(node, name, value as u64, n);
    Ok(value)
}

/// Reads ue(v) and reports it with its coded length.
pub fn read_ue(
    reader: &mut BitReader<'_>,
    sink: &mut dyn SyntaxSink,
    node: NodeId,
    name: &str,
) -> Result<u32> {
    let start = reader.cursor().bit_position();
    let value = reader.read_golomb()?;
    sink.field(node, name, value as u64, bits_since(reader, start));
    Ok(value)
}
