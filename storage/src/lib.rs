//! Colloquy Storage - Conversation Persistence
//!
//! Storage is an injected capability: the engine never touches a backend
//! directly, drivers hand it something implementing [`Storage`]. The one
//! backend shipped here keeps each conversation as a single UTF-8 JSON
//! document (the core codec's wire form) in a `.cnv` file.

use colloquy_core::{CodecError, Graph, decode_graph, encode_graph};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved file suffix for conversation documents.
pub const SUFFIX: &str = ".cnv";

#[derive(Error, Debug)]
pub enum StorageError {
    /// `read` referenced a conversation file that does not exist.
    #[error("conversation `{0}` not found")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file held JSON, but not a decodable conversation.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The file was not valid JSON at all.
    #[error("conversation file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persistence contract drivers inject.
pub trait Storage {
    /// Names of the conversations available under `location`. A missing
    /// location is an empty listing, not an error.
    fn list(&self, location: &Path) -> Result<Vec<String>, StorageError>;

    /// Persist `graph` under `name`, returning the path written. The
    /// reserved suffix is appended when `name` lacks it.
    fn write(&self, name: &str, location: &Path, graph: &Graph) -> Result<PathBuf, StorageError>;

    /// Load the conversation stored under `name`.
    fn read(&self, name: &str, location: &Path) -> Result<Graph, StorageError>;
}

/// One conversation per `.cnv` file in a plain directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemStorage;

fn with_suffix(name: &str) -> String {
    if name.ends_with(SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{SUFFIX}")
    }
}

impl Storage for FilesystemStorage {
    fn list(&self, location: &Path) -> Result<Vec<String>, StorageError> {
        if !location.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(location)? {
            let name = entry?.file_name();
            if let Some(name) = name.to_str() {
                if name.ends_with(SUFFIX) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn write(&self, name: &str, location: &Path, graph: &Graph) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(location)?;

        let path = location.join(with_suffix(name));
        let document = serde_json::to_string(&encode_graph(graph))?;
        fs::write(&path, document)?;

        tracing::debug!(path = %path.display(), nodes = graph.node_count(), "conversation written");
        Ok(path)
    }

    fn read(&self, name: &str, location: &Path) -> Result<Graph, StorageError> {
        let path = location.join(with_suffix(name));
        let document = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(err)
            }
        })?;

        let value = serde_json::from_str(document.trim())?;
        let graph = decode_graph(&value)?;

        tracing::debug!(path = %path.display(), nodes = graph.node_count(), "conversation read");
        Ok(graph)
    }
}
