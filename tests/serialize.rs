//! Tests for the execution and UI forms.
mod common;
use common::*;
use kumiki::prelude::*;
use kumiki::serialize::{ExecutionInput, SEED_CONTROL_VALUE, UI_FORMAT_VERSION, UiLink};
use serde_json::{Value, json};

/// Twelve nodes: a loader followed by eleven encoders on its CLIP output.
fn wide_graph(catalog: &NodeCatalog) -> Graph {
    let mut builder = GraphBuilder::new(catalog);
    let loader = builder
        .add_node("CheckpointLoaderSimple", [("ckpt_name", Binding::literal("a"))])
        .unwrap();
    let clip = builder.node_output(loader, "CLIP").unwrap();
    for i in 0..11 {
        builder
            .add_node(
                "CLIPTextEncode",
                [
                    ("clip", Binding::from(clip)),
                    ("text", Binding::literal(format!("prompt {}", i))),
                ],
            )
            .unwrap();
    }
    builder.finish()
}

#[test]
fn test_execution_form_shape() {
    let catalog = NodeCatalog::builtin();
    let graph = text_to_image(&catalog);
    let value = WorkflowFormat::Execution.render(&graph).unwrap();

    assert_eq!(value.as_object().unwrap().len(), 8);
    assert_eq!(
        value["2"],
        json!({
            "class_type": "LoraLoader",
            "inputs": {
                "model": ["1", 0],
                "clip": ["1", 1],
                "lora_name": "alice.safetensors",
                "strength_model": 0.8,
                "strength_clip": 0.8
            }
        })
    );
    assert_eq!(value["6"]["inputs"]["model"], json!(["2", 0]));
    assert_eq!(value["6"]["inputs"]["seed"], json!(42));
    assert_eq!(value["7"]["inputs"]["vae"], json!(["1", 2]));
    assert_eq!(value["8"]["inputs"]["filename_prefix"], json!("alice_output"));
}

#[test]
fn test_execution_form_keys_in_numeric_order() {
    let catalog = NodeCatalog::builtin();
    let graph = wide_graph(&catalog);
    let text = to_execution_form(&graph).unwrap().to_json_pretty().unwrap();

    let positions: Vec<usize> = (1..=12)
        .map(|id| text.find(&format!("\"{}\": {{", id)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
}

#[test]
fn test_rendered_value_keeps_numeric_key_order() {
    let catalog = NodeCatalog::builtin();
    let value = WorkflowFormat::Execution.render(&wide_graph(&catalog)).unwrap();

    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    let expected: Vec<String> = (1..=12).map(|id| id.to_string()).collect();
    assert_eq!(keys, expected.iter().map(String::as_str).collect::<Vec<_>>());

    let inputs: Vec<&str> = value["2"]["inputs"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(inputs, vec!["clip", "text"]);
}

#[test]
fn test_execution_inputs_follow_declaration_order() {
    let catalog = NodeCatalog::builtin();
    let form = to_execution_form(&text_to_image(&catalog)).unwrap();
    let sampler = form.node(6).unwrap();
    let names: Vec<&str> = sampler.inputs.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "model",
            "positive",
            "negative",
            "latent_image",
            "seed",
            "steps",
            "cfg",
            "sampler_name",
            "scheduler",
            "denoise"
        ]
    );
    assert_eq!(sampler.input("latent_image"), Some(&ExecutionInput::Link(5, 0)));
    assert_eq!(sampler.class_type, "KSampler");
}

#[test]
fn test_serialization_is_idempotent() {
    let catalog = NodeCatalog::builtin();
    let graph = text_to_image(&catalog);
    for format in [WorkflowFormat::Execution, WorkflowFormat::Ui] {
        let first = format.render_pretty(&graph).unwrap();
        let second = format.render_pretty(&graph).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_incomplete_graph_not_serialized() {
    let catalog = NodeCatalog::builtin();
    let mut builder = GraphBuilder::extend(&catalog, loader_and_encoders(&catalog));
    builder.add_node("EmptyLatentImage", [("width", Binding::literal(8))]).unwrap();
    let graph = builder.finish();

    let expected = GraphError::UnboundRequiredSlot {
        node: 4,
        kind: "EmptyLatentImage".to_string(),
        slot: "height".to_string(),
    };
    assert_eq!(to_execution_form(&graph).unwrap_err(), expected);
    assert_eq!(to_ui_form(&graph).unwrap_err(), expected);
    assert!(matches!(
        WorkflowFormat::Ui.render_pretty(&graph),
        Err(RenderError::Graph(_))
    ));
}

#[test]
fn test_ui_links_numbered_in_traversal_order() {
    let catalog = NodeCatalog::builtin();
    let graph = text_to_image(&catalog);
    let form = to_ui_form(&graph).unwrap();

    assert_eq!(form.last_node_id, 8);
    assert_eq!(form.links.len(), graph.reference_count());
    assert_eq!(form.last_link_id as usize, form.links.len());
    assert_eq!(form.version, UI_FORMAT_VERSION);

    assert_eq!(form.links[0], UiLink(1, 1, 0, 2, 0, "MODEL".to_string()));
    assert_eq!(form.links[1], UiLink(2, 1, 1, 2, 1, "CLIP".to_string()));
    // Sampler inputs: model, positive, negative, latent_image.
    assert_eq!(form.links[4], UiLink(5, 2, 0, 6, 0, "MODEL".to_string()));
    assert_eq!(form.links[7], UiLink(8, 5, 0, 6, 3, "LATENT".to_string()));

    for (index, link) in form.links.iter().enumerate() {
        assert_eq!(link.0 as usize, index + 1);
        assert!(link.1 < link.3);
    }
}

#[test]
fn test_ui_links_match_pending_links() {
    let catalog = NodeCatalog::builtin();
    let graph = text_to_image(&catalog);
    let form = to_ui_form(&graph).unwrap();
    let pending = graph.pending_links();

    assert_eq!(form.links.len(), pending.len());
    assert_eq!(form.last_link_id, graph.next_link_id() - 1);
    for (link, pending) in form.links.iter().zip(&pending) {
        assert_eq!((link.1, link.2), (pending.source.node, pending.source.slot));
        assert_eq!(link.3, pending.target);
        assert_eq!(link.5, pending.data_type);

        let target = form.node(pending.target).unwrap();
        let input = &target.inputs[link.4];
        assert_eq!(input.name, pending.target_slot);
        assert_eq!(input.link, Some(link.0));
    }
}

#[test]
fn test_ui_inputs_and_outputs_carry_link_ids() {
    let catalog = NodeCatalog::builtin();
    let form = to_ui_form(&text_to_image(&catalog)).unwrap();

    let loader = form.node(1).unwrap();
    assert!(loader.inputs.is_empty());
    assert_eq!(loader.outputs.len(), 3);
    assert_eq!(loader.outputs[0].links, vec![1]);
    assert_eq!(loader.outputs[1].links, vec![2]);
    // VAE feeds the decoder, the tenth link.
    assert_eq!(loader.outputs[2].links, vec![10]);
    assert_eq!(loader.outputs[2].slot_index, 2);

    let adapter = form.node(2).unwrap();
    assert_eq!(adapter.outputs[1].links, vec![3, 4]);
    assert_eq!(adapter.inputs.len(), 2);
    assert_eq!(adapter.inputs[0].link, Some(1));
    assert_eq!(adapter.inputs[1].data_type, "CLIP");
    assert!(adapter.inputs[0].widget.is_none());

    let save = form.node(8).unwrap();
    assert!(save.outputs.is_empty());
    assert_eq!(save.properties["Node name for S&R"], json!("SaveImage"));
}

#[test]
fn test_ui_widget_values() {
    let catalog = NodeCatalog::builtin();
    let form = to_ui_form(&text_to_image(&catalog)).unwrap();

    let adapter = form.node(2).unwrap();
    assert_eq!(
        adapter.widgets_values,
        vec![json!("alice.safetensors"), json!(0.8), json!(0.8)]
    );

    let sampler = form.node(6).unwrap();
    assert_eq!(
        sampler.widgets_values,
        vec![
            json!(42),
            json!(SEED_CONTROL_VALUE),
            json!(30),
            json!(7.5),
            json!("euler_a"),
            json!("normal"),
            json!(1.0)
        ]
    );
}

#[test]
fn test_ui_linked_widget_keeps_placeholder() {
    let catalog = NodeCatalog::builtin().with_kind(
        NodeKind::new("PrimitiveText").with_output("STRING", DataType::String),
    );
    let mut builder = GraphBuilder::new(&catalog);
    let text = builder.add_node("PrimitiveText", Vec::<(&str, Binding)>::new()).unwrap();
    let loader = builder
        .add_node("CheckpointLoaderSimple", [("ckpt_name", Binding::literal("a"))])
        .unwrap();
    builder
        .add_node(
            "CLIPTextEncode",
            [
                ("clip", Binding::reference(loader, 1)),
                ("text", Binding::reference(text, 0)),
            ],
        )
        .unwrap();
    let form = to_ui_form(&builder.finish()).unwrap();

    let encoder = form.node(3).unwrap();
    assert_eq!(encoder.inputs.len(), 2);
    assert_eq!(encoder.inputs[1].name, "text");
    assert_eq!(encoder.inputs[1].widget.as_ref().unwrap().name, "text");
    assert_eq!(encoder.widgets_values, vec![Value::Null]);
    assert_eq!(form.links[1], UiLink(2, 1, 0, 3, 1, "STRING".to_string()));
}

#[test]
fn test_ui_default_layout_is_layered() {
    let catalog = NodeCatalog::builtin();
    let form = to_ui_form(&loader_and_encoders(&catalog)).unwrap();

    assert_eq!(form.node(1).unwrap().pos, [50.0, 50.0]);
    assert_eq!(form.node(2).unwrap().pos, [400.0, 50.0]);
    assert_eq!(form.node(3).unwrap().pos, [400.0, 350.0]);
    assert_eq!(form.node(2).unwrap().size, [400.0, 200.0]);
    let orders: Vec<usize> = form.nodes.iter().map(|n| n.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn test_ui_layout_hint_used() {
    let catalog = NodeCatalog::builtin();
    let mut graph = loader_and_encoders(&catalog);
    graph
        .set_layout(3, Layout::new([900.0, 10.0], [500.0, 250.0]))
        .unwrap();
    let form = to_ui_form(&graph).unwrap();
    assert_eq!(form.node(3).unwrap().pos, [900.0, 10.0]);
    assert_eq!(form.node(3).unwrap().size, [500.0, 250.0]);
    assert_eq!(form.node(2).unwrap().pos, [400.0, 50.0]);
}

#[test]
fn test_ui_form_json_shape() {
    let catalog = NodeCatalog::builtin();
    let value = WorkflowFormat::Ui.render(&loader_and_encoders(&catalog)).unwrap();

    assert_eq!(value["last_node_id"], json!(3));
    assert_eq!(value["last_link_id"], json!(2));
    assert_eq!(value["links"][0], json!([1, 1, 1, 2, 0, "CLIP"]));
    assert_eq!(value["groups"], json!([]));
    assert_eq!(value["version"], json!(0.4));

    let node = &value["nodes"][1];
    assert_eq!(node["type"], json!("CLIPTextEncode"));
    assert_eq!(node["mode"], json!(0));
    assert_eq!(node["flags"], json!({}));
    assert_eq!(
        node["inputs"],
        json!([{ "name": "clip", "type": "CLIP", "link": 1 }])
    );
    assert_eq!(
        node["outputs"],
        json!([{ "name": "CONDITIONING", "type": "CONDITIONING", "links": [], "slot_index": 0 }])
    );
    assert_eq!(node["widgets_values"], json!(["positive"]));
}

#[test]
fn test_empty_graph_serializes() {
    let graph = Graph::new();
    assert_eq!(WorkflowFormat::Execution.render(&graph).unwrap(), json!({}));
    let form = to_ui_form(&graph).unwrap();
    assert_eq!(form.last_node_id, 0);
    assert_eq!(form.last_link_id, 0);
    assert!(form.nodes.is_empty());
}
