use super::kind::{DataType, InputSlot, NodeKind};

/// Kind name of the adapter node threaded by the chain assembler.
pub const ADAPTER_KIND: &str = "LoraLoader";

/// Declares every built-in node kind, the registration function and the name list.
macro_rules! define_node_kinds {
    ( $(
        $kind:literal [$w:literal, $h:literal] {
            inputs: [ $( $ctor:ident ( $slot:literal, $ty:ident ) ),* $(,)? ],
            outputs: [ $( ( $out:literal, $out_ty:ident ) ),* $(,)? ] $(,)?
        }
    ),* $(,)? ) => {
        /// Names of all built-in node kinds, in registration order.
        pub const BUILTIN_KINDS: &[&str] = &[ $( $kind ),* ];

        pub(super) fn builtin_kinds() -> Vec<NodeKind> {
            vec![ $(
                NodeKind::new($kind)
                    $( .with_input(InputSlot::$ctor($slot, DataType::$ty)) )*
                    $( .with_output($out, DataType::$out_ty) )*
                    .with_size($w, $h)
            ),* ]
        }
    };
}

define_node_kinds! {
    "CheckpointLoaderSimple" [315.0, 98.0] {
        inputs: [widget("ckpt_name", String)],
        outputs: [("MODEL", Model), ("CLIP", Clip), ("VAE", Vae)],
    },
    "LoraLoader" [315.0, 126.0] {
        inputs: [
            link("model", Model),
            link("clip", Clip),
            widget("lora_name", String),
            widget("strength_model", Float),
            widget("strength_clip", Float),
        ],
        outputs: [("MODEL", Model), ("CLIP", Clip)],
    },
    "CLIPTextEncode" [400.0, 200.0] {
        inputs: [link("clip", Clip), widget("text", String)],
        outputs: [("CONDITIONING", Conditioning)],
    },
    "EmptyLatentImage" [315.0, 106.0] {
        inputs: [
            widget("width", Int),
            widget("height", Int),
            widget("batch_size", Int),
        ],
        outputs: [("LATENT", Latent)],
    },
    "KSampler" [315.0, 262.0] {
        inputs: [
            link("model", Model),
            link("positive", Conditioning),
            link("negative", Conditioning),
            link("latent_image", Latent),
            seed("seed", Int),
            widget("steps", Int),
            widget("cfg", Float),
            widget("sampler_name", String),
            widget("scheduler", String),
            widget("denoise", Float),
        ],
        outputs: [("LATENT", Latent)],
    },
    "VAEDecode" [210.0, 46.0] {
        inputs: [link("samples", Latent), link("vae", Vae)],
        outputs: [("IMAGE", Image)],
    },
    "SaveImage" [315.0, 270.0] {
        inputs: [link("images", Image), widget("filename_prefix", String)],
        outputs: [],
    },
    "ADE_LoadAnimateDiffModel" [315.0, 58.0] {
        inputs: [widget("model_name", String)],
        outputs: [("MOTION_MODEL", MotionModel)],
    },
    "ADE_ApplyAnimateDiffModel" [315.0, 82.0] {
        inputs: [
            link("model", Model),
            link("motion_model", MotionModel),
            widget("beta_schedule", String),
        ],
        outputs: [("MODEL", Model)],
    },
    "ADE_EmptyLatentImageLarge" [315.0, 106.0] {
        inputs: [
            widget("width", Int),
            widget("height", Int),
            widget("batch_size", Int),
        ],
        outputs: [("LATENT", Latent)],
    },
    "ADE_VideoCombine" [315.0, 290.0] {
        inputs: [
            link("images", Image),
            widget("frame_rate", Int),
            widget("format", String),
            widget("filename_prefix", String),
        ],
        outputs: [],
    },
}
