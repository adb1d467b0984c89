use super::{Binding, Graph, NodeId, OutputRef, input_slot, validate_binding};
use crate::catalog::NodeCatalog;
use crate::error::{GraphError, SlotDirection};
use ahash::AHashMap;
use tracing::debug;

/// Incrementally constructs a [`Graph`] against a node catalog.
///
/// Every call either commits one fully validated node or fails without touching the graph.
pub struct GraphBuilder<'c> {
    catalog: &'c NodeCatalog,
    graph: Graph,
}

impl<'c> GraphBuilder<'c> {
    pub fn new(catalog: &'c NodeCatalog) -> Self {
        Self {
            catalog,
            graph: Graph::new(),
        }
    }

    /// Continues building on top of an existing graph.
    pub fn extend(catalog: &'c NodeCatalog, graph: Graph) -> Self {
        Self { catalog, graph }
    }

    pub fn catalog(&self) -> &'c NodeCatalog {
        self.catalog
    }

    /// Adds a node of `kind_name` with the given slot bindings and returns its identifier.
    ///
    /// Slots may be left unbound here and filled in later by a
    /// [`ParameterBinder`](crate::binder::ParameterBinder); completeness is checked when
    /// the graph is serialized.
    ///
    /// # Errors
    ///
    /// * [`GraphError::UnknownNodeKind`] if the catalog has no such kind.
    /// * [`GraphError::UnknownSlot`] if a binding names a slot the kind does not declare.
    /// * [`GraphError::InvalidBinding`] for forward or self references, out-of-range
    ///   output slots, type mismatches, literals on link-only slots, or a slot bound twice.
    pub fn add_node<I, S>(&mut self, kind_name: &str, inputs: I) -> Result<NodeId, GraphError>
    where
        I: IntoIterator<Item = (S, Binding)>,
        S: Into<String>,
    {
        let kind = self.catalog.lookup(kind_name)?;
        let node_id = self.graph.next_id();

        let mut bound: AHashMap<String, Binding> = AHashMap::new();
        for (slot_name, binding) in inputs {
            let slot_name = slot_name.into();
            let slot = input_slot(&kind, &slot_name)?;
            validate_binding(&self.graph, node_id, slot, &binding)?;
            if bound.contains_key(&slot_name) {
                return Err(GraphError::InvalidBinding {
                    node: node_id,
                    slot: slot_name,
                    reason: "slot is bound more than once".to_string(),
                });
            }
            bound.insert(slot_name, binding);
        }

        let id = self.graph.push(kind, bound);
        debug!(node = id, kind = kind_name, "added node");
        Ok(id)
    }

    /// Builds a reference to the output slot `slot_name` of node `node_id`.
    pub fn node_output(&self, node_id: NodeId, slot_name: &str) -> Result<OutputRef, GraphError> {
        let node = self
            .graph
            .node(node_id)
            .ok_or(GraphError::UnknownNode(node_id))?;
        let slot = node
            .kind()
            .output_index(slot_name)
            .ok_or_else(|| GraphError::UnknownSlot {
                kind: node.kind().name().to_string(),
                slot: slot_name.to_string(),
                direction: SlotDirection::Output,
            })?;
        Ok(OutputRef::new(node_id, slot))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn finish(self) -> Graph {
        self.graph
    }
}
