use super::stages::{self, SamplerInputs};
use super::{NamedGraph, Pipeline, require_trained};
use crate::binder::{Substitutions, output_name, render};
use crate::chain::{AdapterSpec, ChainAssembler};
use crate::error::PipelineError;
use crate::graph::{Binding, GraphBuilder};
use crate::persona::PersonaLookup;
use tracing::info;

impl Pipeline<'_> {
    /// Single-persona video workflow: the image pipeline with a motion model applied
    /// to the adapted model, a frame-batch latent, and a video combine node in place
    /// of the image save.
    pub fn video_workflow(
        &self,
        personas: &dyn PersonaLookup,
        persona_id: &str,
    ) -> Result<NamedGraph, PipelineError> {
        let (persona, _) = require_trained(personas, persona_id)?;
        let config = &self.config;
        let video = &config.video;
        let values = Substitutions::new()
            .with("trigger", &persona.trigger_word)
            .with("persona", persona_id);

        let mut builder = GraphBuilder::new(self.catalog);
        let (lanes, vae) = stages::load_checkpoint(&mut builder, &config.checkpoint)?;
        let adapter = AdapterSpec::from_persona(persona_id, persona, config.adapter_strength);
        let chain = ChainAssembler::new(self.reporter).assemble(
            &mut builder,
            lanes,
            std::slice::from_ref(&adapter),
        )?;

        let (positive, negative) = stages::encode_prompts(
            &mut builder,
            chain.lanes.clip,
            render(&video.prompts.positive, &values)?,
            render(&video.prompts.negative, &values)?,
        )?;

        let motion_loader = builder.add_node(
            "ADE_LoadAnimateDiffModel",
            [("model_name", Binding::literal(video.motion_model.as_str()))],
        )?;
        let motion_model = builder.node_output(motion_loader, "MOTION_MODEL")?;
        let motion_apply = builder.add_node(
            "ADE_ApplyAnimateDiffModel",
            [
                ("model", Binding::from(chain.lanes.model)),
                ("motion_model", Binding::from(motion_model)),
                ("beta_schedule", Binding::literal(video.beta_schedule.as_str())),
            ],
        )?;

        let animated_model = builder.node_output(motion_apply, "MODEL")?;
        let latent =
            stages::empty_latent(&mut builder, "ADE_EmptyLatentImageLarge", &video.latent)?;
        let samples = stages::sample(
            &mut builder,
            SamplerInputs {
                model: animated_model,
                positive,
                negative,
                latent,
            },
            &video.sampler,
        )?;
        let images = stages::decode(&mut builder, samples, vae)?;
        builder.add_node(
            "ADE_VideoCombine",
            [
                ("images", Binding::from(images)),
                ("frame_rate", Binding::literal(video.frame_rate)),
                ("format", Binding::literal(video.format.as_str())),
                (
                    "filename_prefix",
                    Binding::literal(render(&config.outputs.video, &values)?),
                ),
            ],
        )?;

        let graph = builder.finish();
        info!(persona = persona_id, nodes = graph.len(), "built video workflow");
        Ok(NamedGraph {
            name: output_name([persona_id, "video", "workflow"]),
            graph,
        })
    }
}
