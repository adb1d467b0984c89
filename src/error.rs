use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised while constructing, binding or serializing a workflow graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node kind '{0}' is not registered in the catalog")]
    UnknownNodeKind(String),

    #[error("Node kind '{kind}' has no {direction} slot named '{slot}'")]
    UnknownSlot {
        kind: String,
        slot: String,
        direction: SlotDirection,
    },

    #[error("Node {0} does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("Invalid binding for slot '{slot}' on node {node}: {reason}")]
    InvalidBinding {
        node: NodeId,
        slot: String,
        reason: String,
    },

    #[error("Template '{template}' references placeholder '{name}', but no value was supplied")]
    MissingPlaceholder { template: String, name: String },

    #[error("Template '{template}' is malformed: {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("Required slot '{slot}' on node {node} ({kind}) is unbound")]
    UnboundRequiredSlot {
        node: NodeId,
        kind: String,
        slot: String,
    },
}

/// Which side of a node kind a slot lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDirection {
    Input,
    Output,
}

impl std::fmt::Display for SlotDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotDirection::Input => write!(f, "input"),
            SlotDirection::Output => write!(f, "output"),
        }
    }
}

/// Errors raised by the pipeline recipes before or during graph construction.
///
/// Persona failures are preconditions: they are detected before the first node is added.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Persona '{0}' not found")]
    PersonaNotFound(String),

    #[error("Persona '{0}' is not trained yet")]
    PersonaNotTrained(String),

    #[error("Persona '{0}' is marked as trained but has no adapter file")]
    PersonaWithoutAdapter(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failure to render a graph: either the graph is incomplete or JSON encoding failed.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while writing rendered workflows to disk.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Workflow name '{0}' is not a valid file name")]
    InvalidName(String),

    #[error("Failed to render workflow '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: RenderError,
    },

    #[error("Could not write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when loading configuration or persona files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
