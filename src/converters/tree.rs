//! Tree converter
//!
//! Converts an element tree into nested mappings:
//! - direct text (trimmed) goes under the text key, if not blank
//! - attributes become prefixed keys, values untouched
//! - child elements become keys named after their tag; a tag seen more
//!   than once among siblings collapses into a sequence in document order

use tracing::{debug, trace};

use super::base::{ConvertedValue, ConverterConfig, JsonDocument, Mapping};
use crate::documents::Element;
use crate::error::Result;

/// Recursive element tree converter
#[derive(Debug, Clone, Default)]
pub struct TreeConverter {
    config: ConverterConfig,
}

impl TreeConverter {
    /// Create a new converter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a root element into a single-key document
    pub fn convert_document(&self, root: &Element) -> Result<JsonDocument> {
        let mapping = self.convert_element(root)?;
        debug!(root = %root.tag, keys = mapping.len(), "converted document");
        Ok(JsonDocument::new(root.tag.clone(), mapping))
    }

    /// Convert one element (and its subtree) into a mapping
    pub fn convert_element(&self, node: &Element) -> Result<Mapping> {
        self.convert_at(node, 1)
    }

    fn convert_at(&self, node: &Element, depth: usize) -> Result<Mapping> {
        self.config.limits().check_xml_depth(depth)?;
        trace!(tag = %node.tag, depth, "converting element");

        let mut mapping = Mapping::new();

        if let Some(text) = node.text.as_deref().map(str::trim) {
            if !text.is_empty() {
                mapping.insert(
                    self.config.text_key().to_string(),
                    ConvertedValue::Text(text.to_string()),
                );
            }
        }

        for (name, value) in &node.attributes {
            let key = format!("{}{}", self.config.attr_prefix(), name);
            mapping.insert(key, ConvertedValue::Text(value.clone()));
        }

        for child in &node.children {
            let value = ConvertedValue::Mapping(self.convert_at(child, depth + 1)?);
            insert_child(&mut mapping, &child.tag, value);
        }

        Ok(mapping)
    }
}

/// Insert a child value, collapsing repeated keys into a sequence
fn insert_child(mapping: &mut Mapping, key: &str, value: ConvertedValue) {
    match mapping.get_mut(key) {
        None => {
            mapping.insert(key.to_string(), value);
        }
        Some(ConvertedValue::Sequence(items)) => items.push(value),
        Some(existing) => {
            let previous = std::mem::replace(existing, ConvertedValue::Sequence(Vec::new()));
            *existing = ConvertedValue::Sequence(vec![previous, value]);
        }
    }
}

/// Convert an element with the default configuration
pub fn convert_element(node: &Element) -> Result<Mapping> {
    TreeConverter::new().convert_element(node)
}

/// Convert a root element into a document with the default configuration
pub fn convert_document(root: &Element) -> Result<JsonDocument> {
    TreeConverter::new().convert_document(root)
}
