//! Resource loading utilities
//!
//! This module reads XML input from the locations a caller supplies.

use crate::error::{AccessError, Result};
use crate::limits::Limits;
use crate::locations::Location;
use std::fs;
use tracing::debug;

/// Resource loader for XML documents
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load a resource as raw bytes
    ///
    /// Decoding is left to the parser, which knows the document's declared
    /// encoding. In-memory text is returned as its UTF-8 bytes.
    pub fn load(&self, location: &Location) -> Result<Vec<u8>> {
        match location {
            Location::Path(path) => {
                debug!(path = %path.display(), "reading XML input");

                // Reject oversized files before reading them into memory
                if let Ok(meta) = fs::metadata(path) {
                    if meta.is_file() {
                        self.limits
                            .check_xml_size(usize::try_from(meta.len()).unwrap_or(usize::MAX))?;
                    }
                }

                let content = fs::read(path).map_err(|e| {
                    AccessError::new("failed to read file")
                        .with_location(path.display().to_string())
                        .with_cause(e)
                })?;

                self.limits.check_xml_size(content.len())?;

                Ok(content)
            }
            Location::Url(url) => Err(AccessError::new("remote resources are not supported")
                .with_location(url.as_str())
                .into()),
            Location::String(s) => {
                self.limits.check_xml_size(s.len())?;
                Ok(s.as_bytes().to_vec())
            }
        }
    }
}
