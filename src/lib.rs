//! # Kumiki - Workflow Graph Construction and Serialization
//!
//! **Kumiki** builds the node-graph workflows consumed by diffusion execution engines
//! and their visual editors. Graphs are assembled in memory against a typed node
//! catalog, validated as they grow, and then projected onto two JSON forms: the flat
//! execution form the engine runs, and the layout-carrying UI form the editor opens.
//!
//! ## Core Workflow
//!
//! 1.  **Pick a Catalog**: [`NodeCatalog::builtin`] knows the loader, adapter, encoder,
//!     sampler, decoder, save and motion-model kinds; custom kinds can be registered.
//! 2.  **Build a Graph**: Add nodes through a [`GraphBuilder`]. Each node may only
//!     reference outputs of nodes added before it, so every graph is acyclic by
//!     construction. A [`ChainAssembler`] threads adapter nodes through the model and
//!     conditioning lanes.
//! 3.  **Bind Parameters**: A [`ParameterBinder`] overwrites literal inputs on an
//!     existing graph, which lets one graph be copied and re-parameterized.
//! 4.  **Serialize**: [`to_execution_form`] and [`to_ui_form`] render the same graph;
//!     [`WorkflowFile`] writes the result to disk.
//!
//! The [`Pipeline`] recipes do all of the above for persona image, video, multi-persona
//! and strength-test workflows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let catalog = NodeCatalog::builtin();
//!     let personas = PersonaDirectory::default()
//!         .with("alice", PersonaRecord::new("alice_tw").trained("loras/alice.safetensors"))
//!         .with("bob", PersonaRecord::new("bob_tw").trained("loras/bob.safetensors"));
//!
//!     let pipeline = Pipeline::builder(&catalog)
//!         .config(PipelineConfig::default().with_seed(7))
//!         .build();
//!
//!     let workflow = pipeline.multi_persona_workflow(&personas, &["alice", "bob"], None)?;
//!     println!("{} has {} nodes", workflow.name, workflow.graph.len());
//!
//!     for format in [WorkflowFormat::Execution, WorkflowFormat::Ui] {
//!         let name = match format {
//!             WorkflowFormat::Execution => workflow.name.clone(),
//!             WorkflowFormat::Ui => format!("{}_ui", workflow.name),
//!         };
//!         let file = WorkflowFile::render(&name, &workflow.graph, format)?;
//!         file.save(std::path::Path::new("workflows"))?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod binder;
pub mod catalog;
pub mod chain;
pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod persona;
pub mod pipeline;
pub mod prelude;
pub mod serialize;

pub use binder::ParameterBinder;
pub use catalog::NodeCatalog;
pub use chain::ChainAssembler;
pub use graph::{Graph, GraphBuilder};
pub use output::WorkflowFile;
pub use pipeline::Pipeline;
pub use serialize::{WorkflowFormat, to_execution_form, to_ui_form};
