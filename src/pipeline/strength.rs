use super::image::ImageRecipe;
use super::{NamedGraph, Pipeline};
use crate::binder::{ParameterBinder, Substitutions, Template, output_name};
use crate::error::PipelineError;
use crate::graph::Literal;
use crate::persona::PersonaLookup;
use tracing::info;

impl Pipeline<'_> {
    /// One image workflow per adapter strength, for side-by-side comparison.
    ///
    /// The graph is built once; each strength gets a copy with both adapter strengths
    /// and the output name rebound. All copies share the configured fixed seed.
    /// `prompt` replaces the configured positive prompt when given.
    pub fn strength_test_workflows(
        &self,
        personas: &dyn PersonaLookup,
        persona_id: &str,
        strengths: &[f64],
        prompt: Option<&str>,
    ) -> Result<Vec<NamedGraph>, PipelineError> {
        let settings = &self.config.strength_test;
        let recipe = ImageRecipe {
            prompts: &settings.prompts,
            sampler: &settings.sampler,
            prompt_override: prompt,
            adapter_file_name_only: true,
        };
        let (base, handles) = self.build_image_graph(personas, persona_id, &recipe)?;
        let output_template = Template::parse(&self.config.outputs.strength_test)?;

        let mut workflows = Vec::with_capacity(strengths.len());
        for &strength in strengths {
            // Same spelling as the literal written into the graph, e.g. "0.8" or "1.0".
            let label = Literal::Float(strength).to_string();
            let values = Substitutions::new()
                .with("persona", persona_id)
                .with("strength", &label);

            let mut graph = base.clone();
            let mut binder = ParameterBinder::new(&mut graph);
            binder.bind_literal(handles.adapter, "strength_model", strength)?;
            binder.bind_literal(handles.adapter, "strength_clip", strength)?;
            binder.bind_template(handles.save, "filename_prefix", &output_template, &values)?;

            workflows.push(NamedGraph {
                name: output_name([persona_id, "strength", label.as_str(), "test"]),
                graph,
            });
        }

        info!(
            persona = persona_id,
            workflows = workflows.len(),
            "built strength test workflows"
        );
        Ok(workflows)
    }
}
