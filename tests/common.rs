//! Common fixtures for building catalogs, graphs and persona stores.
use kumiki::prelude::*;

/// A persona store with two trained personas, one untrained persona and one trained
/// persona missing its adapter file.
#[allow(dead_code)]
pub fn sample_personas() -> PersonaDirectory {
    let mut broken = PersonaRecord::new("carol_tw");
    broken.trained = true;
    PersonaDirectory::default()
        .with(
            "alice",
            PersonaRecord::new("alice_tw")
                .with_name("Alice")
                .trained("/data/loras/alice_v1.safetensors"),
        )
        .with(
            "bob",
            PersonaRecord::new("bob_tw")
                .with_name("Bob")
                .trained("/data/loras/bob_v1.safetensors"),
        )
        .with("dave", PersonaRecord::new("dave_tw").with_name("Dave"))
        .with("carol", broken)
}

/// The persona store file layout, as JSON.
#[allow(dead_code)]
pub const PERSONAS_JSON: &str = r#"{
    "personas": {
        "alice": {
            "name": "Alice",
            "trigger_word": "alice_tw",
            "trained": true,
            "lora_file": "/data/loras/alice_v1.safetensors"
        },
        "dave": {
            "trigger_word": "dave_tw"
        }
    }
}"#;

/// Checkpoint loader (1) and two prompt encoders (2, 3) on its CLIP output.
#[allow(dead_code)]
pub fn loader_and_encoders(catalog: &NodeCatalog) -> Graph {
    let mut builder = GraphBuilder::new(catalog);
    let loader = builder
        .add_node(
            "CheckpointLoaderSimple",
            [("ckpt_name", Binding::literal("base.safetensors"))],
        )
        .expect("loader");
    let clip = builder.node_output(loader, "CLIP").expect("clip output");
    for text in ["positive", "negative"] {
        builder
            .add_node(
                "CLIPTextEncode",
                [
                    ("clip", Binding::from(clip)),
                    ("text", Binding::literal(text)),
                ],
            )
            .expect("encoder");
    }
    builder.finish()
}

/// A complete text-to-image graph with one adapter, numbered:
/// 1 loader, 2 adapter, 3 positive, 4 negative, 5 latent, 6 sampler, 7 decode, 8 save.
#[allow(dead_code)]
pub fn text_to_image(catalog: &NodeCatalog) -> Graph {
    let mut b = GraphBuilder::new(catalog);
    let loader = b
        .add_node(
            "CheckpointLoaderSimple",
            [("ckpt_name", Binding::literal("base.safetensors"))],
        )
        .unwrap();
    let adapter = b
        .add_node(
            "LoraLoader",
            [
                ("model", Binding::reference(loader, 0)),
                ("clip", Binding::reference(loader, 1)),
                ("lora_name", Binding::literal("alice.safetensors")),
                ("strength_model", Binding::literal(0.8)),
                ("strength_clip", Binding::literal(0.8)),
            ],
        )
        .unwrap();
    let positive = b
        .add_node(
            "CLIPTextEncode",
            [
                ("clip", Binding::reference(adapter, 1)),
                ("text", Binding::literal("alice_tw, portrait")),
            ],
        )
        .unwrap();
    let negative = b
        .add_node(
            "CLIPTextEncode",
            [
                ("clip", Binding::reference(adapter, 1)),
                ("text", Binding::literal("blurry")),
            ],
        )
        .unwrap();
    let latent = b
        .add_node(
            "EmptyLatentImage",
            [
                ("width", Binding::literal(1024)),
                ("height", Binding::literal(1024)),
                ("batch_size", Binding::literal(1)),
            ],
        )
        .unwrap();
    let sampler = b
        .add_node(
            "KSampler",
            [
                ("model", Binding::reference(adapter, 0)),
                ("positive", Binding::reference(positive, 0)),
                ("negative", Binding::reference(negative, 0)),
                ("latent_image", Binding::reference(latent, 0)),
                ("seed", Binding::literal(42)),
                ("steps", Binding::literal(30)),
                ("cfg", Binding::literal(7.5)),
                ("sampler_name", Binding::literal("euler_a")),
                ("scheduler", Binding::literal("normal")),
                ("denoise", Binding::literal(1.0)),
            ],
        )
        .unwrap();
    let decode = b
        .add_node(
            "VAEDecode",
            [
                ("samples", Binding::reference(sampler, 0)),
                ("vae", Binding::reference(loader, 2)),
            ],
        )
        .unwrap();
    b.add_node(
        "SaveImage",
        [
            ("images", Binding::reference(decode, 0)),
            ("filename_prefix", Binding::literal("alice_output")),
        ],
    )
    .unwrap();
    b.finish()
}
