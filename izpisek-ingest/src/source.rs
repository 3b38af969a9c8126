//! Extraction-collaborator boundary: something that yields the full text of
//! one statement document.
//!
//! The PDF-to-text pass lives outside this crate; parsers consume already
//! extracted text. A source that cannot produce text fails loudly instead
//! of reading as an empty statement.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extension accepted for pre-extracted statement dumps.
pub const SUPPORTED_EXTENSION: &str = "txt";

/// Failure to obtain document text at all, distinct from a statement that
/// parses to zero transactions.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document type: {path}")]
    Unsupported { path: PathBuf },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Yields the ordered full text of one statement document.
pub trait TextSource {
    fn document_text(&self) -> Result<String, ExtractError>;
}

/// Pre-extracted statement text on disk, one file per document.
#[derive(Debug, Clone)]
pub struct PlainTextFile {
    path: PathBuf,
}

impl PlainTextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Whether the file looks like a statement dump this source can read.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
    }
}

impl TextSource for PlainTextFile {
    fn document_text(&self) -> Result<String, ExtractError> {
        if !Self::is_supported(&self.path) {
            return Err(ExtractError::Unsupported {
                path: self.path.clone(),
            });
        }
        fs::read_to_string(&self.path).map_err(|source| ExtractError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
