use super::layout::place_nodes;
use crate::error::GraphError;
use crate::graph::{Binding, Graph, LinkId, NodeId};
use ahash::AHashMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Format version written into every UI form.
pub const UI_FORMAT_VERSION: f64 = 0.4;

/// Widget value emitted after a seed, telling the editor to keep the seed fixed.
pub const SEED_CONTROL_VALUE: &str = "fixed";

/// Marks an input that replaces a widget with a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiWidgetRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiInput {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub link: Option<LinkId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<UiWidgetRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiOutput {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub links: Vec<LinkId>,
    pub slot_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: String,
    pub pos: [f64; 2],
    pub size: [f64; 2],
    pub flags: Map<String, Value>,
    pub order: usize,
    pub mode: u8,
    pub inputs: Vec<UiInput>,
    pub outputs: Vec<UiOutput>,
    pub properties: Map<String, Value>,
    pub widgets_values: Vec<Value>,
}

/// `[link_id, src_node, src_slot, dst_node, dst_slot, type_name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiLink(
    pub LinkId,
    pub NodeId,
    pub usize,
    pub NodeId,
    pub usize,
    pub String,
);

/// The editor-facing form: node records with layout plus a separate link table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiForm {
    pub last_node_id: NodeId,
    pub last_link_id: LinkId,
    pub nodes: Vec<UiNode>,
    pub links: Vec<UiLink>,
    pub groups: Vec<Value>,
    pub config: Map<String, Value>,
    pub extra: Map<String, Value>,
    pub version: f64,
}

impl UiForm {
    pub fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Projects a finished graph onto the UI form.
///
/// Link identifiers are assigned from 1 in the order of [`Graph::pending_links`].
/// The UI inputs of a node are its reference-bound slots; literal-bound slots become
/// `widgets_values` in declaration order.
pub fn to_ui_form(graph: &Graph) -> Result<UiForm, GraphError> {
    graph.validate_complete()?;

    let mut links: Vec<UiLink> = Vec::new();
    let mut incoming: AHashMap<(NodeId, String), LinkId> = AHashMap::new();
    let mut outgoing: AHashMap<(NodeId, usize), Vec<LinkId>> = AHashMap::new();

    for pending in graph.pending_links() {
        let link_id = links.len() as LinkId + 1;
        // Index among the target's reference-bound slots.
        let dst_slot = match links.last() {
            Some(prev) if prev.3 == pending.target => prev.4 + 1,
            _ => 0,
        };
        outgoing
            .entry((pending.source.node, pending.source.slot))
            .or_default()
            .push(link_id);
        incoming.insert((pending.target, pending.target_slot), link_id);
        links.push(UiLink(
            link_id,
            pending.source.node,
            pending.source.slot,
            pending.target,
            dst_slot,
            pending.data_type,
        ));
    }

    let layouts = place_nodes(graph);
    let nodes = graph
        .nodes()
        .iter()
        .zip(layouts)
        .enumerate()
        .map(|(order, (node, layout))| {
            let mut inputs = Vec::new();
            let mut widgets_values = Vec::new();
            for (slot, binding) in node.slots() {
                match binding {
                    Some(Binding::Reference(_)) => inputs.push(UiInput {
                        name: slot.name.clone(),
                        data_type: slot.data_type.as_str().to_string(),
                        link: incoming.get(&(node.id(), slot.name.clone())).copied(),
                        widget: slot.widget.then(|| UiWidgetRef {
                            name: slot.name.clone(),
                        }),
                    }),
                    Some(Binding::Literal(literal)) => widgets_values.push(literal.to_json()),
                    None => {}
                }
                // A linked widget keeps its position in the widget list.
                if slot.widget && matches!(binding, Some(Binding::Reference(_))) {
                    widgets_values.push(Value::Null);
                }
                if slot.seed_control {
                    widgets_values.push(Value::String(SEED_CONTROL_VALUE.to_string()));
                }
            }

            let outputs = node
                .kind()
                .outputs()
                .iter()
                .enumerate()
                .map(|(index, output)| UiOutput {
                    name: output.name.clone(),
                    data_type: output.data_type.as_str().to_string(),
                    links: outgoing.remove(&(node.id(), index)).unwrap_or_default(),
                    slot_index: index,
                })
                .collect();

            let mut properties = Map::new();
            properties.insert(
                "Node name for S&R".to_string(),
                Value::String(node.kind().name().to_string()),
            );

            UiNode {
                id: node.id(),
                kind: node.kind().name().to_string(),
                pos: layout.pos,
                size: layout.size,
                flags: Map::new(),
                order,
                mode: 0,
                inputs,
                outputs,
                properties,
                widgets_values,
            }
        })
        .collect();

    Ok(UiForm {
        last_node_id: graph.last_node_id(),
        last_link_id: links.len() as LinkId,
        nodes,
        links,
        groups: Vec::new(),
        config: Map::new(),
        extra: Map::new(),
        version: UI_FORMAT_VERSION,
    })
}
