//! Input source locations
//!
//! This module resolves the identifiers a caller hands us (file paths,
//! `file://` URLs, in-memory text) into a [`Location`] the loader can read.

use crate::error::{AccessError, Result};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Input location - a file path, a URL, or in-memory XML text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// Non-file URL (http, https, ftp, ...); not loadable
    Url(Url),
    /// In-memory XML text
    String(String),
}

impl Location {
    /// Create a location from a user-supplied identifier
    ///
    /// `file://` URLs are turned into paths; other URLs stay URLs.
    /// Everything else is taken as a file path, whether or not it exists,
    /// so a missing file surfaces as an access error when loading.
    pub fn from_str(s: &str) -> Result<Self> {
        if let Ok(url) = Url::parse(s) {
            if url.scheme() == "file" {
                let path = url.to_file_path().map_err(|_| {
                    AccessError::new("cannot convert URL to a local path").with_location(s)
                })?;
                return Ok(Location::Path(path));
            }
            // Single-letter schemes are Windows drive letters, not URLs
            if url.scheme().len() > 1 {
                return Ok(Location::Url(url));
            }
        }

        Ok(Location::Path(PathBuf::from(s)))
    }

    /// Create a location holding XML text directly
    pub fn text(xml: impl Into<String>) -> Self {
        Location::String(xml.into())
    }

    /// Get the location as a string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
            Location::String(_) => "<string>".to_string(),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}
