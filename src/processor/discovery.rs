//! Input discovery for log files
//!
//! Resolves an [`InputSource`] to the ordered list of files a run reads.
//! A single file must exist; a directory contributes every file directly
//! inside it with the configured extension.

use crate::error::{ProcessorError, Result};
use crate::models::InputSource;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// File discovery component for log inputs
#[derive(Debug)]
pub struct FileDiscovery {
    source: InputSource,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(source: InputSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

    /// Resolve the input to the files to read, sorted by path
    ///
    /// A directory with no matching files yields an empty list rather than
    /// an error.
    pub async fn discover_files(&self) -> Result<Vec<PathBuf>> {
        match &self.source {
            InputSource::File(path) => {
                if !is_file(path).await {
                    return Err(ProcessorError::InputNotFound { path: path.clone() });
                }
                Ok(vec![path.clone()])
            }
            InputSource::Directory { path, extension } => {
                if !is_dir(path).await {
                    return Err(ProcessorError::InputNotFound { path: path.clone() });
                }

                let files = find_files_with_extension(path, extension)?;
                if files.is_empty() {
                    warn!(
                        "No *.{} files found in {} - nothing to do",
                        extension,
                        path.display()
                    );
                } else {
                    debug!("Found {} *.{} files in {}", files.len(), extension, path.display());
                }
                Ok(files)
            }
        }
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_file())
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

/// Files matching `<dir>/*.<extension>`, not recursive
fn find_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/*.{}", escaped_dir, glob::Pattern::escape(extension));

    let entries = glob::glob(&pattern).map_err(|e| ProcessorError::InvalidInput {
        path: dir.to_path_buf(),
        reason: format!("invalid file pattern {pattern}: {e}"),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ProcessorError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
