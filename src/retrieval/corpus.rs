//! Corpus loading from JSON Lines.
//!
//! Each non-blank line is one [`DocumentUnit`]:
//! `{"content": "...", "metadata": {"source": "...", "chunk_index": 0}}`.
//! A path may name a single file or a directory of `*.jsonl` files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DocumentUnit;
use crate::error::AgentError;

/// File extension recognized when loading a directory.
const CORPUS_EXTENSION: &str = "jsonl";

/// Loads all units from a file or a directory of `*.jsonl` files.
///
/// Directory entries are read in file name order. Units with blank
/// content are dropped.
///
/// # Errors
///
/// Returns [`AgentError::CorpusLoad`] if the path cannot be read or a
/// line is not a valid unit.
pub fn load_path(path: &Path) -> Result<Vec<DocumentUnit>, AgentError> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(|e| load_error(path, &e.to_string()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file() && p.extension().is_some_and(|ext| ext == CORPUS_EXTENSION)
            })
            .collect();
        files.sort();

        let mut units = Vec::new();
        for file in &files {
            units.extend(load_file(file)?);
        }
        debug!(path = %path.display(), files = files.len(), units = units.len(), "loaded corpus directory");
        Ok(units)
    } else {
        load_file(path)
    }
}

/// Loads units from a single JSON Lines file.
///
/// # Errors
///
/// Returns [`AgentError::CorpusLoad`] naming the file and 1-based line
/// number of the first malformed line.
pub fn load_file(path: &Path) -> Result<Vec<DocumentUnit>, AgentError> {
    let text = fs::read_to_string(path).map_err(|e| load_error(path, &e.to_string()))?;
    parse_lines(path, &text)
}

fn parse_lines(path: &Path, text: &str) -> Result<Vec<DocumentUnit>, AgentError> {
    let mut units = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let unit: DocumentUnit = serde_json::from_str(line)
            .map_err(|e| load_error(path, &format!("line {}: {e}", idx + 1)))?;
        if !unit.content.trim().is_empty() {
            units.push(unit);
        }
    }
    Ok(units)
}

fn load_error(path: &Path, message: &str) -> AgentError {
    AgentError::CorpusLoad {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
