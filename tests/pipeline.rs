//! Tests for the workflow recipes, persona store and configuration.
mod common;
use common::*;
use kumiki::prelude::*;
use serde_json::{Value, json};

fn exec(graph: &Graph) -> Value {
    WorkflowFormat::Execution.render(graph).unwrap()
}

fn class_types(graph: &Graph) -> Vec<&str> {
    graph.nodes().iter().map(|n| n.kind().name()).collect()
}

#[test]
fn test_image_workflow() {
    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog).build();
    let workflow = pipeline.image_workflow(&sample_personas(), "alice").unwrap();

    assert_eq!(workflow.name, "alice_image_workflow");
    assert_eq!(
        class_types(&workflow.graph),
        vec![
            "CheckpointLoaderSimple",
            "LoraLoader",
            "CLIPTextEncode",
            "CLIPTextEncode",
            "EmptyLatentImage",
            "KSampler",
            "VAEDecode",
            "SaveImage"
        ]
    );

    let value = exec(&workflow.graph);
    assert_eq!(
        value["1"]["inputs"]["ckpt_name"],
        json!("sd_xl_base_1.0.safetensors")
    );
    assert_eq!(
        value["2"]["inputs"]["lora_name"],
        json!("/data/loras/alice_v1.safetensors")
    );
    assert_eq!(value["2"]["inputs"]["strength_model"], json!(0.8));
    assert!(value["3"]["inputs"]["text"].as_str().unwrap().contains("alice_tw"));
    assert_eq!(value["3"]["inputs"]["clip"], json!(["2", 1]));
    assert_eq!(value["6"]["inputs"]["model"], json!(["2", 0]));
    assert_eq!(value["6"]["inputs"]["latent_image"], json!(["5", 0]));
    assert_eq!(value["6"]["inputs"]["seed"], json!(42));
    assert_eq!(value["7"]["inputs"]["vae"], json!(["1", 2]));
    assert_eq!(value["8"]["inputs"]["filename_prefix"], json!("alice_output"));
}

#[test]
fn test_single_persona_preconditions() {
    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog).build();
    let personas = sample_personas();

    assert!(matches!(
        pipeline.image_workflow(&personas, "ghost"),
        Err(PipelineError::PersonaNotFound(id)) if id == "ghost"
    ));
    assert!(matches!(
        pipeline.video_workflow(&personas, "dave"),
        Err(PipelineError::PersonaNotTrained(id)) if id == "dave"
    ));
    assert!(matches!(
        pipeline.strength_test_workflows(&personas, "carol", &[0.5], None),
        Err(PipelineError::PersonaWithoutAdapter(id)) if id == "carol"
    ));
}

#[test]
fn test_video_workflow() {
    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog).build();
    let workflow = pipeline.video_workflow(&sample_personas(), "alice").unwrap();

    assert_eq!(workflow.name, "alice_video_workflow");
    assert_eq!(workflow.graph.len(), 10);

    let value = exec(&workflow.graph);
    assert_eq!(value["5"]["class_type"], json!("ADE_LoadAnimateDiffModel"));
    assert_eq!(value["5"]["inputs"]["model_name"], json!("mm_sd_v15_v2.ckpt"));
    assert_eq!(
        value["6"]["inputs"],
        json!({
            "model": ["2", 0],
            "motion_model": ["5", 0],
            "beta_schedule": "linear"
        })
    );
    assert_eq!(value["7"]["class_type"], json!("ADE_EmptyLatentImageLarge"));
    assert_eq!(value["7"]["inputs"]["batch_size"], json!(16));
    assert_eq!(value["8"]["inputs"]["model"], json!(["6", 0]));
    assert_eq!(value["8"]["inputs"]["steps"], json!(25));
    assert_eq!(value["10"]["class_type"], json!("ADE_VideoCombine"));
    assert_eq!(value["10"]["inputs"]["images"], json!(["9", 0]));
    assert_eq!(value["10"]["inputs"]["frame_rate"], json!(8));
    assert_eq!(value["10"]["inputs"]["filename_prefix"], json!("alice_video"));
}

#[test]
fn test_multi_persona_workflow() {
    let catalog = NodeCatalog::builtin();
    let reporter = CollectingReporter::new();
    let pipeline = Pipeline::builder(&catalog).reporter(&reporter).build();
    let workflow = pipeline
        .multi_persona_workflow(&sample_personas(), &["alice", "bob"], None)
        .unwrap();

    assert!(reporter.is_empty());
    assert_eq!(workflow.name, "multi_alice_bob");
    assert_eq!(workflow.graph.len(), 9);

    let value = exec(&workflow.graph);
    assert_eq!(value["2"]["inputs"]["strength_model"], json!(0.7));
    assert_eq!(value["3"]["inputs"]["model"], json!(["2", 0]));
    assert_eq!(
        value["4"]["inputs"]["text"],
        json!("masterpiece, best quality alice_tw bob_tw")
    );
    assert_eq!(value["7"]["inputs"]["model"], json!(["3", 0]));
    assert_eq!(
        value["9"]["inputs"]["filename_prefix"],
        json!("multi_persona_alice_bob")
    );
}

#[test]
fn test_multi_persona_skips_unusable_personas() {
    let catalog = NodeCatalog::builtin();
    let reporter = CollectingReporter::new();
    let pipeline = Pipeline::builder(&catalog).reporter(&reporter).build();
    let ids = vec!["alice".to_string(), "dave".to_string(), "ghost".to_string()];
    let workflow = pipeline
        .multi_persona_workflow(&sample_personas(), &ids, Some("studio photo"))
        .unwrap();

    assert_eq!(
        reporter.warnings(),
        vec![
            ChainWarning::Untrained {
                name: "dave".to_string()
            },
            ChainWarning::MissingPersona {
                id: "ghost".to_string()
            },
        ]
    );
    assert_eq!(workflow.graph.len(), 8);
    assert_eq!(workflow.name, "multi_alice_dave_ghost");

    let value = exec(&workflow.graph);
    assert_eq!(value["3"]["inputs"]["text"], json!("studio photo alice_tw"));
}

#[test]
fn test_multi_persona_warnings_follow_request_order() {
    let catalog = NodeCatalog::builtin();
    let reporter = CollectingReporter::new();
    let pipeline = Pipeline::builder(&catalog).reporter(&reporter).build();
    pipeline
        .multi_persona_workflow(&sample_personas(), &["ghost", "dave", "carol", "phantom"], None)
        .unwrap();

    let messages: Vec<String> = reporter
        .warnings()
        .iter()
        .map(|w| w.to_string())
        .collect();
    assert_eq!(
        messages,
        vec![
            "ghost not found, skipping",
            "dave not trained, skipping",
            "carol has no adapter file, skipping",
            "phantom not found, skipping",
        ]
    );
}

#[test]
fn test_multi_persona_with_nothing_to_apply() {
    let catalog = NodeCatalog::builtin();
    let reporter = CollectingReporter::new();
    let pipeline = Pipeline::builder(&catalog).reporter(&reporter).build();
    let workflow = pipeline
        .multi_persona_workflow(&sample_personas(), &Vec::<String>::new(), None)
        .unwrap();

    assert_eq!(workflow.graph.len(), 7);
    let value = exec(&workflow.graph);
    assert_eq!(value["2"]["inputs"]["clip"], json!(["1", 1]));
    assert_eq!(value["2"]["inputs"]["text"], json!("masterpiece, best quality"));
    assert_eq!(value["5"]["inputs"]["model"], json!(["1", 0]));
    assert!(reporter.is_empty());
}

#[test]
fn test_pipeline_per_thread() {
    let catalog = NodeCatalog::builtin();
    let personas = sample_personas();
    let names: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["alice", "bob"]
            .into_iter()
            .map(|id| {
                let (catalog, personas) = (&catalog, &personas);
                scope.spawn(move || {
                    let reporter = CollectingReporter::new();
                    let pipeline = Pipeline::builder(catalog).reporter(&reporter).build();
                    let workflow = pipeline.image_workflow(personas, id).unwrap();
                    assert!(reporter.is_empty());
                    workflow.name
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(names, vec!["alice_image_workflow", "bob_image_workflow"]);
}

#[test]
fn test_strength_test_workflows() {
    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog).build();
    let workflows = pipeline
        .strength_test_workflows(&sample_personas(), "alice", &[0.6, 1.0], None)
        .unwrap();

    let names: Vec<&str> = workflows.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["alice_strength_0.6_test", "alice_strength_1.0_test"]);

    let first = exec(&workflows[0].graph);
    let second = exec(&workflows[1].graph);
    assert_eq!(first["2"]["inputs"]["lora_name"], json!("alice_v1.safetensors"));
    assert_eq!(first["2"]["inputs"]["strength_model"], json!(0.6));
    assert_eq!(first["2"]["inputs"]["strength_clip"], json!(0.6));
    assert_eq!(second["2"]["inputs"]["strength_model"], json!(1.0));
    assert_eq!(
        first["8"]["inputs"]["filename_prefix"],
        json!("alice_strength_0.6")
    );
    assert_eq!(
        second["8"]["inputs"]["filename_prefix"],
        json!("alice_strength_1.0")
    );
    assert_eq!(first["6"]["inputs"]["steps"], json!(35));
    assert_eq!(first["6"]["inputs"]["sampler_name"], json!("euler"));
    assert_eq!(first["6"]["inputs"]["seed"], second["6"]["inputs"]["seed"]);
    assert_eq!(first["3"], second["3"]);
}

#[test]
fn test_strength_test_prompt_override() {
    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog)
        .config(PipelineConfig::default().with_seed(1234))
        .build();
    let workflows = pipeline
        .strength_test_workflows(&sample_personas(), "bob", &[0.8], Some("bob_tw on a beach"))
        .unwrap();

    let value = exec(&workflows[0].graph);
    assert_eq!(value["3"]["inputs"]["text"], json!("bob_tw on a beach"));
    assert_eq!(value["6"]["inputs"]["seed"], json!(1234));
}

#[test]
fn test_persona_directory_from_json() {
    let directory = PersonaDirectory::from_json(PERSONAS_JSON).unwrap();
    let alice = directory.persona("alice").unwrap();
    assert!(alice.trained);
    assert_eq!(alice.name, "Alice");
    assert_eq!(
        alice.lora_file.as_deref(),
        Some("/data/loras/alice_v1.safetensors")
    );

    let dave = directory.persona("dave").unwrap();
    assert!(!dave.trained);
    assert!(dave.lora_file.is_none());
    assert!(directory.persona("bob").is_none());
}

#[test]
fn test_persona_lookup_for_hash_map() {
    let mut personas = std::collections::HashMap::new();
    personas.insert(
        "eve".to_string(),
        PersonaRecord::new("eve_tw").trained("eve.safetensors"),
    );
    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog).build();
    let workflow = pipeline.image_workflow(&personas, "eve").unwrap();
    assert_eq!(workflow.graph.len(), 8);
}

#[test]
fn test_config_partial_override() {
    let config = PipelineConfig::from_json(
        r#"{
            "checkpoint": "custom.safetensors",
            "sampler": { "steps": 50 },
            "video": { "frame_rate": 12 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.checkpoint, "custom.safetensors");
    assert_eq!(config.sampler.steps, 50);
    assert_eq!(config.sampler.seed, 42);
    assert_eq!(config.video.frame_rate, 12);
    assert_eq!(config.video.latent.batch_size, 16);
    assert_eq!(config.strength_test.strengths, vec![0.6, 0.7, 0.8, 0.9, 1.0]);
}

#[test]
fn test_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        PipelineConfig::from_file(&missing),
        Err(ConfigError::Io { .. })
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        PipelineConfig::from_file(&broken),
        Err(ConfigError::Parse { .. })
    ));
}
