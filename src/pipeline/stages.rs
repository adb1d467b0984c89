//! Node groups shared by the recipes.

use crate::chain::LanePair;
use crate::config::{LatentSettings, SamplerSettings};
use crate::error::GraphError;
use crate::graph::{Binding, GraphBuilder, NodeId, OutputRef};

pub(super) fn load_checkpoint(
    builder: &mut GraphBuilder<'_>,
    checkpoint: &str,
) -> Result<(LanePair, OutputRef), GraphError> {
    let loader = builder.add_node(
        "CheckpointLoaderSimple",
        [("ckpt_name", Binding::literal(checkpoint))],
    )?;
    let lanes = LanePair::new(
        builder.node_output(loader, "MODEL")?,
        builder.node_output(loader, "CLIP")?,
    );
    Ok((lanes, builder.node_output(loader, "VAE")?))
}

/// Positive then negative prompt encoders, both fed by `clip`.
pub(super) fn encode_prompts(
    builder: &mut GraphBuilder<'_>,
    clip: OutputRef,
    positive: String,
    negative: String,
) -> Result<(OutputRef, OutputRef), GraphError> {
    let mut encode = |text: String| -> Result<OutputRef, GraphError> {
        let node = builder.add_node(
            "CLIPTextEncode",
            [
                ("text", Binding::literal(text)),
                ("clip", Binding::from(clip)),
            ],
        )?;
        builder.node_output(node, "CONDITIONING")
    };
    let positive = encode(positive)?;
    let negative = encode(negative)?;
    Ok((positive, negative))
}

pub(super) fn empty_latent(
    builder: &mut GraphBuilder<'_>,
    kind: &str,
    latent: &LatentSettings,
) -> Result<OutputRef, GraphError> {
    let node = builder.add_node(
        kind,
        [
            ("width", Binding::literal(latent.width)),
            ("height", Binding::literal(latent.height)),
            ("batch_size", Binding::literal(latent.batch_size)),
        ],
    )?;
    builder.node_output(node, "LATENT")
}

pub(super) struct SamplerInputs {
    pub model: OutputRef,
    pub positive: OutputRef,
    pub negative: OutputRef,
    pub latent: OutputRef,
}

pub(super) fn sample(
    builder: &mut GraphBuilder<'_>,
    inputs: SamplerInputs,
    settings: &SamplerSettings,
) -> Result<OutputRef, GraphError> {
    let node = builder.add_node(
        "KSampler",
        [
            ("seed", Binding::literal(settings.seed)),
            ("steps", Binding::literal(settings.steps)),
            ("cfg", Binding::literal(settings.cfg)),
            ("sampler_name", Binding::literal(settings.sampler_name.as_str())),
            ("scheduler", Binding::literal(settings.scheduler.as_str())),
            ("denoise", Binding::literal(settings.denoise)),
            ("model", Binding::from(inputs.model)),
            ("positive", Binding::from(inputs.positive)),
            ("negative", Binding::from(inputs.negative)),
            ("latent_image", Binding::from(inputs.latent)),
        ],
    )?;
    builder.node_output(node, "LATENT")
}

pub(super) fn decode(
    builder: &mut GraphBuilder<'_>,
    samples: OutputRef,
    vae: OutputRef,
) -> Result<OutputRef, GraphError> {
    let node = builder.add_node(
        "VAEDecode",
        [
            ("samples", Binding::from(samples)),
            ("vae", Binding::from(vae)),
        ],
    )?;
    builder.node_output(node, "IMAGE")
}

pub(super) fn save_image(
    builder: &mut GraphBuilder<'_>,
    images: OutputRef,
    filename_prefix: String,
) -> Result<NodeId, GraphError> {
    builder.add_node(
        "SaveImage",
        [
            ("filename_prefix", Binding::literal(filename_prefix)),
            ("images", Binding::from(images)),
        ],
    )
}
