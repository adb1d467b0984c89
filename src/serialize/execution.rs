use crate::error::GraphError;
use crate::graph::{Binding, Graph, Literal, NodeId};
use serde::ser::{SerializeMap, SerializeStruct, SerializeTuple};
use serde::{Serialize, Serializer};

/// One input of a node in the execution form.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionInput {
    Literal(Literal),
    /// `[producer_id, output_slot_index]`, with the producer id written as a string.
    Link(NodeId, usize),
}

impl Serialize for ExecutionInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExecutionInput::Literal(literal) => literal.to_json().serialize(serializer),
            ExecutionInput::Link(node, slot) => {
                let mut pair = serializer.serialize_tuple(2)?;
                pair.serialize_element(&node.to_string())?;
                pair.serialize_element(slot)?;
                pair.end()
            }
        }
    }
}

/// One node of the execution form. Inputs keep slot declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionNode {
    pub id: NodeId,
    pub class_type: String,
    pub inputs: Vec<(String, ExecutionInput)>,
}

impl ExecutionNode {
    pub fn input(&self, slot: &str) -> Option<&ExecutionInput> {
        self.inputs
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, input)| input)
    }
}

struct InputMap<'a>(&'a [(String, ExecutionInput)]);

impl Serialize for InputMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, input) in self.0 {
            map.serialize_entry(name, input)?;
        }
        map.end()
    }
}

impl Serialize for ExecutionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("ExecutionNode", 2)?;
        node.serialize_field("class_type", &self.class_type)?;
        node.serialize_field("inputs", &InputMap(&self.inputs))?;
        node.end()
    }
}

/// The flat, engine-consumable form: node id (as a string) to kind and inputs.
///
/// Serializes with keys in ascending numeric id order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionForm {
    nodes: Vec<ExecutionNode>,
}

impl ExecutionForm {
    pub fn nodes(&self) -> &[ExecutionNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&ExecutionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ExecutionForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.id.to_string(), node)?;
        }
        map.end()
    }
}

/// Projects a finished graph onto the execution form.
///
/// Fails with [`GraphError::UnboundRequiredSlot`] if any input slot is unbound.
pub fn to_execution_form(graph: &Graph) -> Result<ExecutionForm, GraphError> {
    graph.validate_complete()?;

    let nodes = graph
        .nodes()
        .iter()
        .map(|node| ExecutionNode {
            id: node.id(),
            class_type: node.kind().name().to_string(),
            inputs: node
                .slots()
                .filter_map(|(slot, binding)| {
                    let input = match binding? {
                        Binding::Literal(literal) => ExecutionInput::Literal(literal.clone()),
                        Binding::Reference(r) => ExecutionInput::Link(r.node, r.slot),
                    };
                    Some((slot.name.clone(), input))
                })
                .collect(),
        })
        .collect();

    Ok(ExecutionForm { nodes })
}
