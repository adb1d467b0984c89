//! The in-memory workflow graph.
//!
//! A [`Graph`] is an append-only list of [`NodeInstance`]s whose identifiers run densely
//! from 1. Every [`Binding::Reference`] points at a node with a strictly smaller
//! identifier, which is what keeps the graph acyclic: there is no other cycle check.

use crate::catalog::{InputSlot, NodeKind};
use crate::error::{GraphError, SlotDirection};
use ahash::AHashMap;
use std::sync::Arc;

mod builder;
mod value;

pub use builder::GraphBuilder;
pub use value::{Binding, Literal, OutputRef};

/// Node identifier, unique and dense-from-1 within one graph.
pub type NodeId = u32;

/// Link identifier, assigned at serialization time.
pub type LinkId = u32;

/// Caller-supplied screen placement for the UI form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub pos: [f64; 2],
    pub size: [f64; 2],
}

impl Layout {
    pub fn new(pos: [f64; 2], size: [f64; 2]) -> Self {
        Self { pos, size }
    }
}

/// One node of a graph: a kind plus the bindings of its input slots.
#[derive(Debug, Clone)]
pub struct NodeInstance {
    id: NodeId,
    kind: Arc<NodeKind>,
    inputs: AHashMap<String, Binding>,
    layout: Option<Layout>,
}

impl NodeInstance {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn binding(&self, slot: &str) -> Option<&Binding> {
        self.inputs.get(slot)
    }

    /// Input slots in declaration order, each with its binding if one exists.
    pub fn slots(&self) -> impl Iterator<Item = (&InputSlot, Option<&Binding>)> {
        self.kind
            .inputs()
            .iter()
            .map(|slot| (slot, self.inputs.get(&slot.name)))
    }

    /// References made by this node, in input-slot declaration order.
    pub fn references(&self) -> impl Iterator<Item = (&InputSlot, OutputRef)> {
        self.slots()
            .filter_map(|(slot, binding)| Some((slot, binding?.as_reference()?)))
    }

    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }
}

/// A link between two nodes before a link identifier has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub source: OutputRef,
    pub target: NodeId,
    pub target_slot: String,
    pub data_type: String,
}

/// An append-only workflow graph.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<NodeInstance>,
    next_id: NodeId,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 1,
        }
    }

    /// Nodes in identifier order.
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeInstance> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.nodes.get(index)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeInstance> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.nodes.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The identifier the next node will receive.
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// The highest allocated identifier, or 0 for an empty graph.
    pub fn last_node_id(&self) -> NodeId {
        self.next_id - 1
    }

    /// The identifier the next link would receive if the graph were serialized now.
    pub fn next_link_id(&self) -> LinkId {
        self.reference_count() as LinkId + 1
    }

    /// Number of reference bindings across all nodes.
    pub fn reference_count(&self) -> usize {
        self.nodes.iter().map(|n| n.references().count()).sum()
    }

    /// Every reference binding as a link, in ascending node order and then
    /// input-slot declaration order. This order defines link identifiers.
    pub fn pending_links(&self) -> Vec<PendingLink> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.references().map(move |(slot, source)| PendingLink {
                    source,
                    target: node.id,
                    target_slot: slot.name.clone(),
                    data_type: slot.data_type.as_str().to_string(),
                })
            })
            .collect()
    }

    /// Attaches a layout hint used by the UI form instead of the default placement.
    pub fn set_layout(&mut self, id: NodeId, layout: Layout) -> Result<(), GraphError> {
        let node = self.node_mut(id).ok_or(GraphError::UnknownNode(id))?;
        node.layout = Some(layout);
        Ok(())
    }

    /// Fails on the first node (in identifier order) with an unbound input slot.
    pub fn validate_complete(&self) -> Result<(), GraphError> {
        for node in &self.nodes {
            if let Some((slot, _)) = node.slots().find(|(_, binding)| binding.is_none()) {
                return Err(GraphError::UnboundRequiredSlot {
                    node: node.id,
                    kind: node.kind.name().to_string(),
                    slot: slot.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Overwrites one slot binding on an existing node after validating it.
    pub(crate) fn rebind(
        &mut self,
        id: NodeId,
        slot_name: &str,
        binding: Binding,
    ) -> Result<(), GraphError> {
        let node = self.node(id).ok_or(GraphError::UnknownNode(id))?;
        let kind = Arc::clone(&node.kind);
        let slot = input_slot(&kind, slot_name)?;
        validate_binding(self, id, slot, &binding)?;
        if let Some(node) = self.node_mut(id) {
            node.inputs.insert(slot_name.to_string(), binding);
        }
        Ok(())
    }

    fn push(&mut self, kind: Arc<NodeKind>, inputs: AHashMap<String, Binding>) -> NodeId {
        let id = self.next_id;
        self.nodes.push(NodeInstance {
            id,
            kind,
            inputs,
            layout: None,
        });
        self.next_id += 1;
        id
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

fn input_slot<'k>(kind: &'k NodeKind, slot_name: &str) -> Result<&'k InputSlot, GraphError> {
    kind.input(slot_name).ok_or_else(|| GraphError::UnknownSlot {
        kind: kind.name().to_string(),
        slot: slot_name.to_string(),
        direction: SlotDirection::Input,
    })
}

/// Checks a binding for `slot` on node `node` against the nodes already in `graph`.
///
/// References must target an existing node with a smaller identifier, name an output
/// slot that exists on that node's kind, and carry the slot's data type. Literals are
/// only accepted by widget slots of a compatible type.
fn validate_binding(
    graph: &Graph,
    node: NodeId,
    slot: &InputSlot,
    binding: &Binding,
) -> Result<(), GraphError> {
    let invalid = |reason: String| GraphError::InvalidBinding {
        node,
        slot: slot.name.clone(),
        reason,
    };

    match binding {
        Binding::Reference(source) => {
            if source.node >= node {
                return Err(invalid(format!(
                    "reference to node {} is not an earlier node",
                    source.node
                )));
            }
            let producer = graph
                .node(source.node)
                .ok_or_else(|| invalid(format!("node {} does not exist", source.node)))?;
            let output = producer.kind.output(source.slot).ok_or_else(|| {
                invalid(format!(
                    "{} (node {}) has no output slot {}",
                    producer.kind.name(),
                    source.node,
                    source.slot
                ))
            })?;
            if output.data_type != slot.data_type {
                return Err(invalid(format!(
                    "type mismatch: expected {}, but {} of node {} is {}",
                    slot.data_type, output.name, source.node, output.data_type
                )));
            }
            Ok(())
        }
        Binding::Literal(literal) => {
            if !slot.widget {
                return Err(invalid(format!(
                    "slot only accepts {} links, not literal {}",
                    slot.data_type, literal
                )));
            }
            if !literal.is_finite() {
                return Err(invalid(format!(
                    "literal {} is not a finite number",
                    literal
                )));
            }
            if !slot.data_type.accepts(literal) {
                return Err(invalid(format!(
                    "type mismatch: expected {}, but found literal {}",
                    slot.data_type, literal
                )));
            }
            Ok(())
        }
    }
}
