//! Lookup of compiled contract artifacts

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{ARTIFACT_EXTENSION, BUILD_INFO_DIR},
    errors::ScriptError,
};

/// A compiled contract, as emitted by the build step. Only the fields needed
/// for a creation with no constructor arguments are read
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The creation bytecode of the contract
    pub bytecode: Bytes,
}

/// A directory of compilation artifacts, keyed by contract name
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given artifacts directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find and parse the artifact of the named contract
    pub fn find(&self, contract_name: &str) -> Result<ContractArtifact, ScriptError> {
        let file_name = format!("{contract_name}.{ARTIFACT_EXTENSION}");
        let path = find_file(&self.root, &file_name).ok_or_else(|| {
            ScriptError::ArtifactNotFound(format!(
                "no artifact for `{}` under {}, has it been compiled?",
                contract_name,
                self.root.display()
            ))
        })?;
        debug!("Reading artifact for `{}` from {}", contract_name, path.display());

        let contents =
            fs::read_to_string(&path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        let artifact: ContractArtifact = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

        if artifact.bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` has no creation bytecode, is it abstract or an interface?",
                artifact.contract_name
            )));
        }

        Ok(artifact)
    }
}

/// Depth-first search for a file with the given name, skipping build info,
/// unreadable directories and symlinked directories
fn find_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir).ok()?.flatten() {
        let path = entry.path();
        // `file_type` does not follow symlinks, so link cycles are never entered
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            if !path.ends_with(BUILD_INFO_DIR) {
                subdirs.push(path);
            }
            continue;
        }

        // Debug artifacts (`<name>.dbg.json`) never match exactly
        if entry.file_name() == file_name {
            return Some(path);
        }
    }

    // Visit subdirectories in a stable order
    subdirs.sort();
    subdirs.iter().find_map(|subdir| find_file(subdir, file_name))
}
