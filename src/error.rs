//! Fatal errors reported before any window is opened.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Usage: {program} <markdown-file>")]
    Usage { program: String },

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ViewerError {
    /// Process exit code for the error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
