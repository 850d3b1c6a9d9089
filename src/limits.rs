//! Limits and constraints for XML processing
//!
//! This module defines limits that protect the parser and converter against
//! resource exhaustion from adversarial input: deep nesting, huge files,
//! attribute floods and entity expansion bombs.

use crate::error::{Error, Result};
use tracing::warn;

/// Global limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth (the root element has depth 1)
    pub max_xml_depth: usize,

    /// Maximum XML input size in bytes
    pub max_xml_size: usize,

    /// Maximum number of attributes per element
    pub max_attributes: usize,

    /// Maximum number of entity expansions
    pub max_entity_expansions: usize,

    /// Maximum entity expansion size in bytes
    pub max_entity_expansion_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_attributes: 1000,
            max_entity_expansions: 10000,
            max_entity_expansion_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_attributes: 100,
            max_entity_expansions: 1000,
            max_entity_expansion_size: 1024 * 1024, // 1 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10000,
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_attributes: 10000,
            max_entity_expansions: 100000,
            max_entity_expansion_size: 100 * 1024 * 1024, // 100 MB
        }
    }

    /// Set the maximum nesting depth
    pub fn with_max_xml_depth(mut self, depth: usize) -> Self {
        self.max_xml_depth = depth;
        self
    }

    /// Set the maximum input size in bytes
    pub fn with_max_xml_size(mut self, size: usize) -> Self {
        self.max_xml_size = size;
        self
    }

    /// Set the maximum number of attributes per element
    pub fn with_max_attributes(mut self, count: usize) -> Self {
        self.max_attributes = count;
        self
    }

    /// Set the maximum number of entity expansions
    pub fn with_max_entity_expansions(mut self, count: usize) -> Self {
        self.max_entity_expansions = count;
        self
    }

    /// Set the maximum total size of expanded entity text in bytes
    pub fn with_max_entity_expansion_size(mut self, size: usize) -> Self {
        self.max_entity_expansion_size = size;
        self
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            warn!(depth, max = self.max_xml_depth, "nesting depth limit exceeded");
            Err(Error::DepthExceeded {
                depth,
                max: self.max_xml_depth,
            })
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            warn!(size, max = self.max_xml_size, "input size limit exceeded");
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of attributes is within limits
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        if count > self.max_attributes {
            Err(Error::LimitExceeded(format!(
                "Attribute count {} exceeds maximum {}",
                count, self.max_attributes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if entity expansions are within limits
    pub fn check_entity_expansions(&self, count: usize) -> Result<()> {
        if count > self.max_entity_expansions {
            warn!(count, max = self.max_entity_expansions, "entity expansion limit exceeded");
            Err(Error::LimitExceeded(format!(
                "Entity expansions {} exceeds maximum {}",
                count, self.max_entity_expansions
            )))
        } else {
            Ok(())
        }
    }

    /// Check if entity expansion size is within limits
    pub fn check_entity_expansion_size(&self, size: usize) -> Result<()> {
        if size > self.max_entity_expansion_size {
            warn!(size, max = self.max_entity_expansion_size, "entity expansion size limit exceeded");
            Err(Error::LimitExceeded(format!(
                "Entity expansion size {} bytes exceeds maximum {} bytes",
                size, self.max_entity_expansion_size
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_xml_depth, 1000);
        assert!(limits.check_xml_depth(500).is_ok());
        assert!(limits.check_xml_depth(1000).is_ok());
        assert!(matches!(
            limits.check_xml_depth(1500),
            Err(Error::DepthExceeded { depth: 1500, max: 1000 })
        ));
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_xml_depth < Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(150).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_xml_depth > Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(5000).is_ok());
    }

    #[test]
    fn test_check_xml_size() {
        let limits = Limits::default();
        assert!(limits.check_xml_size(1024).is_ok());
        assert!(matches!(
            limits.check_xml_size(200 * 1024 * 1024),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let limits = Limits::new()
            .with_max_xml_depth(3)
            .with_max_xml_size(10)
            .with_max_attributes(1);
        assert!(limits.check_xml_depth(4).is_err());
        assert!(limits.check_xml_size(11).is_err());
        assert!(limits.check_attributes(1).is_ok());
        assert!(limits.check_attributes(2).is_err());
    }

    #[test]
    fn test_check_entity_expansions() {
        let limits = Limits::default();
        assert!(limits.check_entity_expansions(100).is_ok());
        assert!(matches!(
            limits.check_entity_expansions(20000),
            Err(Error::LimitExceeded(_))
        ));
        assert!(Limits::strict().check_entity_expansions(5000).is_err());
    }

    #[test]
    fn test_check_entity_expansion_size() {
        let limits = Limits::new().with_max_entity_expansion_size(16);
        assert!(limits.check_entity_expansion_size(16).is_ok());
        assert!(limits.check_entity_expansion_size(17).is_err());
    }
}
