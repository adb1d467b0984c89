//! Writing rendered workflows to disk for the execution engine and the editor to load.

use crate::error::OutputError;
use crate::graph::Graph;
use crate::serialize::WorkflowFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A workflow rendered to JSON, ready to be saved under `<name>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFile {
    name: String,
    contents: String,
}

impl WorkflowFile {
    /// Renders `graph` in `format`. The graph is not modified and can be rendered again.
    pub fn render(name: &str, graph: &Graph, format: WorkflowFormat) -> Result<Self, OutputError> {
        validate_name(name)?;
        let contents = format
            .render_pretty(graph)
            .map_err(|source| OutputError::Render {
                name: name.to_string(),
                source,
            })?;
        Ok(Self {
            name: name.to_string(),
            contents,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Writes the file into `dir`, creating the directory if needed.
    ///
    /// The contents go to a temporary sibling first and are renamed into place, so an
    /// interrupted write never leaves a truncated workflow behind.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, OutputError> {
        fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        let path = dir.join(self.file_name());
        let staging = dir.join(format!(".{}.tmp", self.file_name()));

        fs::write(&staging, &self.contents).map_err(|source| io_error(&staging, source))?;
        fs::rename(&staging, &path).map_err(|source| {
            let _ = fs::remove_file(&staging);
            io_error(&path, source)
        })?;

        info!(path = %path.display(), "workflow saved");
        Ok(path)
    }

    /// Saves into `dir` and, if `mirror` is given and already exists, into `mirror` too.
    pub fn save_with_mirror(
        &self,
        dir: &Path,
        mirror: Option<&Path>,
    ) -> Result<Vec<PathBuf>, OutputError> {
        let mut written = vec![self.save(dir)?];
        match mirror {
            Some(mirror) if mirror.is_dir() => written.push(self.save(mirror)?),
            Some(mirror) => {
                debug!(dir = %mirror.display(), "mirror directory missing, skipping copy");
            }
            None => {}
        }
        Ok(written)
    }
}

fn validate_name(name: &str) -> Result<(), OutputError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if invalid {
        Err(OutputError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.display().to_string(),
        source,
    }
}
