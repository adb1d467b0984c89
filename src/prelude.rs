//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build, parameterize and serialize workflow graphs.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = NodeCatalog::builtin();
//! let mut builder = GraphBuilder::new(&catalog);
//! let loader = builder.add_node(
//!     "CheckpointLoaderSimple",
//!     [("ckpt_name", Binding::literal("model.safetensors"))],
//! )?;
//! let clip = builder.node_output(loader, "CLIP")?;
//! builder.add_node(
//!     "CLIPTextEncode",
//!     [("clip", Binding::from(clip)), ("text", Binding::literal("a cat"))],
//! )?;
//!
//! let graph = builder.finish();
//! println!("{}", to_execution_form(&graph)?.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Graph construction
pub use crate::catalog::{DataType, InputSlot, NodeCatalog, NodeKind, OutputSlot};
pub use crate::graph::{Binding, Graph, GraphBuilder, Layout, Literal, NodeId, OutputRef};

// Adapter chains and parameters
pub use crate::binder::{ParameterBinder, Substitutions, Template};
pub use crate::chain::{
    AdapterSpec, ChainAssembler, ChainWarning, CollectingReporter, LanePair, Reporter,
    TracingReporter,
};

// Serialization and output
pub use crate::output::WorkflowFile;
pub use crate::serialize::{
    ExecutionForm, UiForm, WorkflowFormat, to_execution_form, to_ui_form,
};

// Recipes
pub use crate::config::PipelineConfig;
pub use crate::persona::{PersonaDirectory, PersonaLookup, PersonaRecord};
pub use crate::pipeline::{NamedGraph, Pipeline};

// Error types
pub use crate::error::{ConfigError, GraphError, OutputError, PipelineError, RenderError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
