//! Ready-made workflow recipes for persona image and video generation.
//!
//! Each recipe resolves its persona records first, then builds the whole graph in
//! memory. Nothing is written anywhere; rendering and saving are separate steps.

use crate::catalog::NodeCatalog;
use crate::chain::{Reporter, TracingReporter};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::graph::Graph;
use crate::persona::{PersonaLookup, PersonaRecord};

mod image;
mod multi;
mod stages;
mod strength;
mod video;

static DEFAULT_REPORTER: TracingReporter = TracingReporter;

/// A finished graph together with the workflow name it is saved under.
#[derive(Debug, Clone)]
pub struct NamedGraph {
    pub name: String,
    pub graph: Graph,
}

/// Builds workflow graphs from persona records and a [`PipelineConfig`].
///
/// Reporters need not be `Sync`, so a pipeline is not shared between threads. Each
/// thread builds its own from a shared [`NodeCatalog`].
pub struct Pipeline<'a> {
    catalog: &'a NodeCatalog,
    config: PipelineConfig,
    reporter: &'a dyn Reporter,
}

pub struct PipelineBuilder<'a> {
    catalog: &'a NodeCatalog,
    config: PipelineConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(catalog: &'a NodeCatalog) -> Self {
        Self {
            catalog,
            config: PipelineConfig::default(),
            reporter: &DEFAULT_REPORTER,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Where chain warnings go. Defaults to [`TracingReporter`].
    pub fn reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn build(self) -> Pipeline<'a> {
        Pipeline {
            catalog: self.catalog,
            config: self.config,
            reporter: self.reporter,
        }
    }
}

impl<'a> Pipeline<'a> {
    pub fn builder(catalog: &'a NodeCatalog) -> PipelineBuilder<'a> {
        PipelineBuilder::new(catalog)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

/// Resolves a persona for a single-subject workflow, where anything short of a
/// trained persona with an adapter file is a hard failure.
fn require_trained<'p>(
    personas: &'p dyn PersonaLookup,
    persona_id: &str,
) -> Result<(&'p PersonaRecord, &'p str), PipelineError> {
    let persona = personas
        .persona(persona_id)
        .ok_or_else(|| PipelineError::PersonaNotFound(persona_id.to_string()))?;
    if !persona.trained {
        return Err(PipelineError::PersonaNotTrained(persona_id.to_string()));
    }
    let lora_file = persona
        .lora_file
        .as_deref()
        .ok_or_else(|| PipelineError::PersonaWithoutAdapter(persona_id.to_string()))?;
    Ok((persona, lora_file))
}
