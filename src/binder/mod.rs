//! Substitutes runtime parameters into node inputs.

use crate::error::GraphError;
use crate::graph::{Binding, Graph, Literal, NodeId};
use tracing::debug;

mod template;

pub use template::{
    OUTPUT_NAME_SEPARATOR, Substitutions, Template, join_triggers, output_name, render,
};

/// Overwrites slot bindings on nodes that already exist in a graph.
///
/// Each overwrite goes through the same validation as
/// [`GraphBuilder::add_node`](crate::graph::GraphBuilder::add_node): a rejected value
/// leaves the previous binding in place.
pub struct ParameterBinder<'g> {
    graph: &'g mut Graph,
}

impl<'g> ParameterBinder<'g> {
    pub fn new(graph: &'g mut Graph) -> Self {
        Self { graph }
    }

    pub fn bind(&mut self, node: NodeId, slot: &str, binding: Binding) -> Result<(), GraphError> {
        debug!(node, slot, value = %binding, "binding parameter");
        self.graph.rebind(node, slot, binding)
    }

    pub fn bind_literal(
        &mut self,
        node: NodeId,
        slot: &str,
        value: impl Into<Literal>,
    ) -> Result<(), GraphError> {
        self.bind(node, slot, Binding::literal(value))
    }

    /// Renders `template` with `values` and binds the result as a string literal.
    pub fn bind_template(
        &mut self,
        node: NodeId,
        slot: &str,
        template: &Template,
        values: &Substitutions,
    ) -> Result<(), GraphError> {
        let text = template.render(values)?;
        self.bind_literal(node, slot, text)
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }
}
