//! Output writing
//!
//! This module writes serialized JSON to its destination.

use crate::error::{Result, WriteError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writer for JSON output files
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// Append a newline after the JSON text
    trailing_newline: bool,
    /// Create missing parent directories
    create_dirs: bool,
}

impl Writer {
    /// Create a new writer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to append a trailing newline
    pub fn with_trailing_newline(mut self, newline: bool) -> Self {
        self.trailing_newline = newline;
        self
    }

    /// Set whether to create missing parent directories
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    /// Write text to a destination file, replacing any existing content
    pub fn write(&self, text: &str, destination: &Path) -> Result<()> {
        debug!(destination = %destination.display(), bytes = text.len(), "writing JSON output");

        if self.create_dirs {
            if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    WriteError::new("failed to create directory")
                        .with_destination(parent.display().to_string())
                        .with_cause(e)
                })?;
            }
        }

        let result = if self.trailing_newline {
            fs::write(destination, format!("{}\n", text))
        } else {
            fs::write(destination, text)
        };

        result.map_err(|e| {
            WriteError::new("failed to write file")
                .with_destination(destination.display().to_string())
                .with_cause(e)
                .into()
        })
    }
}
