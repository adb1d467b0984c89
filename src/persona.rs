//! Read-only view of persona records supplied by the surrounding persona store.

use crate::error::ConfigError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The fields of a persona record that workflow construction consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    #[serde(default)]
    pub name: String,
    pub trigger_word: String,
    #[serde(default)]
    pub trained: bool,
    #[serde(default)]
    pub lora_file: Option<String>,
}

impl PersonaRecord {
    pub fn new(trigger_word: &str) -> Self {
        Self {
            name: String::new(),
            trigger_word: trigger_word.to_string(),
            trained: false,
            lora_file: None,
        }
    }

    /// The record after training produced `lora_file`.
    pub fn trained(mut self, lora_file: &str) -> Self {
        self.trained = true;
        self.lora_file = Some(lora_file.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

/// Looks persona records up by id.
pub trait PersonaLookup {
    fn persona(&self, id: &str) -> Option<&PersonaRecord>;
}

impl<S> PersonaLookup for std::collections::HashMap<String, PersonaRecord, S>
where
    S: std::hash::BuildHasher,
{
    fn persona(&self, id: &str) -> Option<&PersonaRecord> {
        self.get(id)
    }
}

impl PersonaLookup for AHashMap<String, PersonaRecord> {
    fn persona(&self, id: &str) -> Option<&PersonaRecord> {
        self.get(id)
    }
}

/// The persona store's file layout: `{"personas": {"<id>": {...}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaDirectory {
    #[serde(default)]
    pub personas: AHashMap<String, PersonaRecord>,
}

impl PersonaDirectory {
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

    pub fn insert(&mut self, id: &str, record: PersonaRecord) {
        self.personas.insert(id.to_string(), record);
    }

    pub fn with(mut self, id: &str, record: PersonaRecord) -> Self {
        self.insert(id, record);
        self
    }
}

impl PersonaLookup for PersonaDirectory {
    fn persona(&self, id: &str) -> Option<&PersonaRecord> {
        self.personas.get(id)
    }
}
