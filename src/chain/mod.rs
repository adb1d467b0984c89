//! Threads a sequence of adapter nodes through the model and conditioning lanes.

use crate::catalog::ADAPTER_KIND;
use crate::error::GraphError;
use crate::graph::{Binding, GraphBuilder, NodeId, OutputRef};
use crate::persona::PersonaRecord;
use tracing::debug;

mod report;

pub use report::{ChainWarning, CollectingReporter, Reporter, TracingReporter};

/// One adapter to apply, with its two strength scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterSpec {
    /// Used in warnings and to report which adapters were applied.
    pub name: String,
    pub file: Option<String>,
    pub strength_model: f64,
    pub strength_clip: f64,
    pub trained: bool,
    /// False when no persona record backs this adapter.
    pub found: bool,
}

impl AdapterSpec {
    /// A trained adapter using the same strength on both lanes.
    pub fn new(name: &str, file: &str, strength: f64) -> Self {
        Self {
            name: name.to_string(),
            file: Some(file.to_string()),
            strength_model: strength,
            strength_clip: strength,
            trained: true,
            found: true,
        }
    }

    pub fn with_strengths(mut self, strength_model: f64, strength_clip: f64) -> Self {
        self.strength_model = strength_model;
        self.strength_clip = strength_clip;
        self
    }

    pub fn untrained(mut self) -> Self {
        self.trained = false;
        self
    }

    /// Placeholder for a requested persona id with no record. It is always skipped,
    /// but keeps its place in the request order.
    pub fn missing(persona_id: &str) -> Self {
        Self {
            name: persona_id.to_string(),
            file: None,
            strength_model: 0.0,
            strength_clip: 0.0,
            trained: false,
            found: false,
        }
    }

    /// The adapter backing a persona record.
    pub fn from_persona(persona_id: &str, persona: &PersonaRecord, strength: f64) -> Self {
        Self {
            name: persona_id.to_string(),
            file: persona.lora_file.clone(),
            strength_model: strength,
            strength_clip: strength,
            trained: persona.trained,
            found: true,
        }
    }
}

/// The rolling pair of lane references threaded through the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePair {
    pub model: OutputRef,
    pub clip: OutputRef,
}

impl LanePair {
    pub fn new(model: OutputRef, clip: OutputRef) -> Self {
        Self { model, clip }
    }
}

/// An adapter that made it into the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedAdapter {
    pub name: String,
    pub node: NodeId,
}

/// The result of assembling a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    /// Lanes to wire into downstream nodes.
    pub lanes: LanePair,
    pub applied: Vec<AppliedAdapter>,
    pub skipped: Vec<ChainWarning>,
}

/// Appends adapter nodes in series, skipping adapters that cannot be applied.
pub struct ChainAssembler<'r> {
    reporter: &'r dyn Reporter,
    kind: String,
}

impl<'r> ChainAssembler<'r> {
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            reporter,
            kind: ADAPTER_KIND.to_string(),
        }
    }

    /// Uses a different adapter kind. It must have `model`/`clip` link inputs,
    /// `lora_name`/`strength_model`/`strength_clip` widgets and `MODEL`/`CLIP` outputs.
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    /// Appends one adapter node per applicable adapter, in order.
    ///
    /// Missing, untrained and file-less adapters are reported and skipped in input
    /// order; with nothing to apply the seed lanes are returned unchanged and no node is added.
    pub fn assemble(
        &self,
        builder: &mut GraphBuilder<'_>,
        seed: LanePair,
        adapters: &[AdapterSpec],
    ) -> Result<ChainOutcome, GraphError> {
        let mut lanes = seed;
        let mut applied = Vec::new();
        let mut skipped = Vec::new();

        for adapter in adapters {
            let file = adapter.file.as_ref().filter(|_| adapter.trained);
            let Some(file) = file else {
                let warning = if !adapter.found {
                    ChainWarning::MissingPersona {
                        id: adapter.name.clone(),
                    }
                } else if adapter.trained {
                    ChainWarning::MissingAdapterFile {
                        name: adapter.name.clone(),
                    }
                } else {
                    ChainWarning::Untrained {
                        name: adapter.name.clone(),
                    }
                };
                self.reporter.warn(&warning);
                skipped.push(warning);
                continue;
            };

            let node = builder.add_node(
                &self.kind,
                [
                    ("lora_name", Binding::literal(file.as_str())),
                    ("strength_model", Binding::literal(adapter.strength_model)),
                    ("strength_clip", Binding::literal(adapter.strength_clip)),
                    ("model", Binding::from(lanes.model)),
                    ("clip", Binding::from(lanes.clip)),
                ],
            )?;
            lanes = LanePair::new(
                builder.node_output(node, "MODEL")?,
                builder.node_output(node, "CLIP")?,
            );
            debug!(adapter = %adapter.name, node, "chained adapter");
            applied.push(AppliedAdapter {
                name: adapter.name.clone(),
                node,
            });
        }

        Ok(ChainOutcome {
            lanes,
            applied,
            skipped,
        })
    }
}
