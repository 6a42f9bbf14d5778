//! Directory scanner for discovering dialogue container files

use crate::container::DialogueContainer;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File name suffix of a dialogue container
pub const CONTAINER_SUFFIX: &str = ".dialogue.json";

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Container files found, sorted by path
    pub containers: Vec<PathBuf>,
}

impl ScanResult {
    /// Number of container files found
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Load every container, in path order
    pub fn load_all(&self) -> Result<Vec<(PathBuf, DialogueContainer)>> {
        self.containers
            .iter()
            .map(|path| Ok((path.clone(), DialogueContainer::load(path)?)))
            .collect()
    }
}

/// Scan one or more directories for dialogue container files
pub fn scan_containers<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut containers = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::RootNotFound(root.to_path_buf()));
        }

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() && is_container_file(entry.path()) {
                containers.push(entry.into_path());
            }
        }
    }

    // Overlapping roots would otherwise list a file twice
    containers.sort();
    containers.dedup();

    debug!(roots = roots.len(), containers = containers.len(), "scanned for containers");

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        containers,
    })
}

/// Check if a path names a dialogue container file
fn is_container_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > CONTAINER_SUFFIX.len() && n.ends_with(CONTAINER_SUFFIX))
}
