use super::stages::{self, SamplerInputs};
use super::{NamedGraph, Pipeline, require_trained};
use crate::binder::{Substitutions, output_name, render};
use crate::chain::{AdapterSpec, ChainAssembler};
use crate::config::{PromptSettings, SamplerSettings};
use crate::error::PipelineError;
use crate::graph::{Graph, GraphBuilder, NodeId};
use crate::persona::PersonaLookup;
use tracing::info;

/// The parts of an image graph that differ between recipes.
pub(super) struct ImageRecipe<'s> {
    pub prompts: &'s PromptSettings,
    pub sampler: &'s SamplerSettings,
    /// Used verbatim instead of the positive prompt template.
    pub prompt_override: Option<&'s str>,
    /// Reference the adapter by file name rather than by path.
    pub adapter_file_name_only: bool,
}

/// Node ids that callers rebind on copies of an image graph.
pub(super) struct ImageGraphHandles {
    pub adapter: NodeId,
    pub save: NodeId,
}

impl Pipeline<'_> {
    /// Single-persona image workflow: checkpoint, one adapter, prompt encoders,
    /// latent, sampler, decode and save, numbered 1 to 8 in that order.
    ///
    /// # Errors
    ///
    /// Fails before building anything if the persona is missing, untrained, or has no
    /// adapter file.
    pub fn image_workflow(
        &self,
        personas: &dyn PersonaLookup,
        persona_id: &str,
    ) -> Result<NamedGraph, PipelineError> {
        let recipe = ImageRecipe {
            prompts: &self.config.prompts,
            sampler: &self.config.sampler,
            prompt_override: None,
            adapter_file_name_only: false,
        };
        let (graph, _) = self.build_image_graph(personas, persona_id, &recipe)?;
        info!(persona = persona_id, nodes = graph.len(), "built image workflow");
        Ok(NamedGraph {
            name: output_name([persona_id, "image", "workflow"]),
            graph,
        })
    }

    pub(super) fn build_image_graph(
        &self,
        personas: &dyn PersonaLookup,
        persona_id: &str,
        recipe: &ImageRecipe<'_>,
    ) -> Result<(Graph, ImageGraphHandles), PipelineError> {
        let (persona, lora_file) = require_trained(personas, persona_id)?;
        let config = &self.config;
        let values = Substitutions::new()
            .with("trigger", &persona.trigger_word)
            .with("persona", persona_id);

        let mut adapter = AdapterSpec::from_persona(persona_id, persona, config.adapter_strength);
        if recipe.adapter_file_name_only {
            adapter.file = Some(file_name(lora_file).to_string());
        }

        let mut builder = GraphBuilder::new(self.catalog);
        let (lanes, vae) = stages::load_checkpoint(&mut builder, &config.checkpoint)?;
        let chain = ChainAssembler::new(self.reporter).assemble(
            &mut builder,
            lanes,
            std::slice::from_ref(&adapter),
        )?;

        let positive = match recipe.prompt_override {
            Some(text) => text.to_string(),
            None => render(&recipe.prompts.positive, &values)?,
        };
        let negative = render(&recipe.prompts.negative, &values)?;
        let (positive, negative) =
            stages::encode_prompts(&mut builder, chain.lanes.clip, positive, negative)?;

        let latent = stages::empty_latent(&mut builder, "EmptyLatentImage", &config.latent)?;
        let samples = stages::sample(
            &mut builder,
            SamplerInputs {
                model: chain.lanes.model,
                positive,
                negative,
                latent,
            },
            recipe.sampler,
        )?;
        let images = stages::decode(&mut builder, samples, vae)?;
        let save = stages::save_image(
            &mut builder,
            images,
            render(&config.outputs.image, &values)?,
        )?;

        // require_trained guarantees the adapter is applied.
        let adapter = chain.applied.first().map_or(chain.lanes.model.node, |a| a.node);
        Ok((builder.finish(), ImageGraphHandles { adapter, save }))
    }
}

/// The last path component of `path`, or `path` itself if it has none.
fn file_name(path: &str) -> &str {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
