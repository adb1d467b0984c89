use super::stages::{self, SamplerInputs};
use super::{NamedGraph, Pipeline};
use crate::binder::{join_triggers, output_name};
use crate::chain::{AdapterSpec, ChainAssembler};
use crate::error::PipelineError;
use crate::graph::GraphBuilder;
use crate::persona::PersonaLookup;
use std::iter;
use tracing::info;

impl Pipeline<'_> {
    /// Image workflow combining the adapters of several personas in one chain.
    ///
    /// Unknown and untrained personas are reported and left out; with none left the
    /// sampler runs on the bare checkpoint. The positive prompt is `base_prompt`
    /// (or the configured default) followed by the trigger words of the applied
    /// personas in request order. The output name lists every requested id.
    pub fn multi_persona_workflow<S: AsRef<str>>(
        &self,
        personas: &dyn PersonaLookup,
        persona_ids: &[S],
        base_prompt: Option<&str>,
    ) -> Result<NamedGraph, PipelineError> {
        let config = &self.config;

        let adapters: Vec<AdapterSpec> = persona_ids
            .iter()
            .map(AsRef::<str>::as_ref)
            .map(|id| match personas.persona(id) {
                Some(persona) => {
                    AdapterSpec::from_persona(id, persona, config.multi_adapter_strength)
                }
                None => AdapterSpec::missing(id),
            })
            .collect();

        let mut builder = GraphBuilder::new(self.catalog);
        let (lanes, vae) = stages::load_checkpoint(&mut builder, &config.checkpoint)?;
        let chain = ChainAssembler::new(self.reporter).assemble(&mut builder, lanes, &adapters)?;

        let triggers = chain
            .applied
            .iter()
            .filter_map(|applied| personas.persona(&applied.name))
            .map(|persona| persona.trigger_word.as_str());
        let positive = join_triggers(
            base_prompt.unwrap_or(config.multi_base_prompt.as_str()),
            triggers,
        );
        let (positive, negative) = stages::encode_prompts(
            &mut builder,
            chain.lanes.clip,
            positive,
            config.multi_negative_prompt.clone(),
        )?;

        let latent = stages::empty_latent(&mut builder, "EmptyLatentImage", &config.latent)?;
        let samples = stages::sample(
            &mut builder,
            SamplerInputs {
                model: chain.lanes.model,
                positive,
                negative,
                latent,
            },
            &config.sampler,
        )?;
        let images = stages::decode(&mut builder, samples, vae)?;
        let ids = persona_ids.iter().map(AsRef::<str>::as_ref);
        stages::save_image(
            &mut builder,
            images,
            output_name(iter::once(config.outputs.multi_prefix.as_str()).chain(ids.clone())),
        )?;

        let graph = builder.finish();
        info!(
            requested = persona_ids.len(),
            applied = chain.applied.len(),
            nodes = graph.len(),
            "built multi-persona workflow"
        );
        Ok(NamedGraph {
            name: output_name(iter::once("multi").chain(ids)),
            graph,
        })
    }
}
