//! Pipeline configuration: the model files, prompts and sampler settings the recipes use.
//!
//! Every field has a default, so a configuration file only needs to list overrides.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sampler settings for one workflow type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub seed: i64,
    pub steps: u32,
    pub cfg: f64,
    pub sampler_name: String,
    pub scheduler: String,
    pub denoise: f64,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            steps: 30,
            cfg: 7.5,
            sampler_name: "euler_a".to_string(),
            scheduler: "normal".to_string(),
            denoise: 1.0,
        }
    }
}

/// Size of the latent batch fed into the sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatentSettings {
    pub width: u32,
    pub height: u32,
    pub batch_size: u32,
}

impl Default for LatentSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            batch_size: 1,
        }
    }
}

/// Prompt templates. `{trigger}` is replaced by the persona's trigger word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub positive: String,
    pub negative: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            positive: "masterpiece, best quality, ultra-detailed, {trigger}, portrait, \
                       professional photography"
                .to_string(),
            negative: "low quality, bad anatomy, blurry, distorted".to_string(),
        }
    }
}

/// Output name templates. `{persona}` is the persona id, `{strength}` the tested strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub image: String,
    pub video: String,
    pub strength_test: String,
    pub multi_prefix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            image: "{persona}_output".to_string(),
            video: "{persona}_video".to_string(),
            strength_test: "{persona}_strength_{strength}".to_string(),
            multi_prefix: "multi_persona".to_string(),
        }
    }
}

/// Motion-model and container settings for video workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub motion_model: String,
    pub beta_schedule: String,
    pub frame_rate: u32,
    pub format: String,
    pub latent: LatentSettings,
    pub sampler: SamplerSettings,
    pub prompts: PromptSettings,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            motion_model: "mm_sd_v15_v2.ckpt".to_string(),
            beta_schedule: "linear".to_string(),
            frame_rate: 8,
            format: "mp4".to_string(),
            latent: LatentSettings {
                width: 768,
                height: 768,
                batch_size: 16,
            },
            sampler: SamplerSettings {
                steps: 25,
                ..SamplerSettings::default()
            },
            prompts: PromptSettings {
                positive: "masterpiece, cinematic, {trigger}, walking, dynamic motion".to_string(),
                negative: "static, blurry, distorted".to_string(),
            },
        }
    }
}

/// Settings for adapter strength comparison workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthTestSettings {
    pub strengths: Vec<f64>,
    pub sampler: SamplerSettings,
    pub prompts: PromptSettings,
}

impl Default for StrengthTestSettings {
    fn default() -> Self {
        Self {
            strengths: vec![0.6, 0.7, 0.8, 0.9, 1.0],
            sampler: SamplerSettings {
                steps: 35,
                cfg: 7.0,
                sampler_name: "euler".to_string(),
                ..SamplerSettings::default()
            },
            prompts: PromptSettings {
                positive: "masterpiece, professional portrait of {trigger}, detailed facial \
                           features, sharp focus, studio lighting, highly detailed"
                    .to_string(),
                negative: "low quality, bad anatomy, blurry, distorted, deformed".to_string(),
            },
        }
    }
}

/// Everything the pipeline recipes need besides the persona records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub checkpoint: String,
    /// Adapter strength for single-persona workflows.
    pub adapter_strength: f64,
    /// Adapter strength for each adapter of a multi-persona chain.
    pub multi_adapter_strength: f64,
    pub multi_base_prompt: String,
    pub multi_negative_prompt: String,
    pub latent: LatentSettings,
    pub sampler: SamplerSettings,
    pub prompts: PromptSettings,
    pub video: VideoSettings,
    pub strength_test: StrengthTestSettings,
    pub outputs: OutputSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            checkpoint: "sd_xl_base_1.0.safetensors".to_string(),
            adapter_strength: 0.8,
            multi_adapter_strength: 0.7,
            multi_base_prompt: "masterpiece, best quality".to_string(),
            multi_negative_prompt: "low quality, bad anatomy, blurry, distorted".to_string(),
            latent: LatentSettings::default(),
            sampler: SamplerSettings::default(),
            prompts: PromptSettings::default(),
            video: VideoSettings::default(),
            strength_test: StrengthTestSettings::default(),
            outputs: OutputSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn with_checkpoint(mut self, checkpoint: &str) -> Self {
        self.checkpoint = checkpoint.to_string();
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.sampler.seed = seed;
        self.video.sampler.seed = seed;
        self.strength_test.sampler.seed = seed;
        self
    }

    pub fn with_adapter_strength(mut self, strength: f64) -> Self {
        self.adapter_strength = strength;
        self
    }

    pub fn with_multi_adapter_strength(mut self, strength: f64) -> Self {
        self.multi_adapter_strength = strength;
        self
    }
}
