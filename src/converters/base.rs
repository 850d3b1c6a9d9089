//! Base converter types
//!
//! This module provides the configuration and the value model produced by
//! the XML to JSON conversion.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::limits::Limits;

/// Ordered mapping from keys to converted values
pub type Mapping = IndexMap<String, ConvertedValue>;

/// Configuration for converters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Key used for text content in decoded output
    text_key: String,
    /// Prefix for attribute names in decoded output
    attr_prefix: String,
    /// Indentation width for JSON output
    indent: usize,
    /// Resource limits applied while parsing and converting
    limits: Limits,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            text_key: "text".to_string(),
            attr_prefix: "@".to_string(),
            indent: 4,
            limits: Limits::default(),
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the text key
    pub fn text_key(&self) -> &str {
        &self.text_key
    }

    /// Get the attribute prefix
    pub fn attr_prefix(&self) -> &str {
        &self.attr_prefix
    }

    /// Get indentation width
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Set text key
    pub fn with_text_key(mut self, key: impl Into<String>) -> Self {
        self.text_key = key.into();
        self
    }

    /// Set attribute prefix
    pub fn with_attr_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attr_prefix = prefix.into();
        self
    }

    /// Set indentation
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// A value produced by converting an XML element
///
/// Whether a key holds one mapping or a sequence of them depends on how many
/// siblings share a tag, so the value is a tagged union rather than a fixed
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ConvertedValue {
    /// Converted element (text, attributes and children)
    Mapping(Mapping),
    /// Values of a repeated key, in document order
    Sequence(Vec<ConvertedValue>),
    /// Text or attribute value
    Text(String),
}

impl ConvertedValue {
    /// Get the inner mapping, if this is one
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConvertedValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Get the inner sequence, if this is one
    pub fn as_sequence(&self) -> Option<&[ConvertedValue]> {
        match self {
            ConvertedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get the inner text, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConvertedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, ConvertedValue::Sequence(_))
    }

    /// Convert to a `serde_json::Value`, keeping key order
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            ConvertedValue::Mapping(m) => JsonValue::Object(mapping_to_json(m)),
            ConvertedValue::Sequence(items) => {
                JsonValue::Array(items.iter().map(ConvertedValue::to_json_value).collect())
            }
            ConvertedValue::Text(s) => JsonValue::String(s.clone()),
        }
    }
}

impl From<Mapping> for ConvertedValue {
    fn from(mapping: Mapping) -> Self {
        ConvertedValue::Mapping(mapping)
    }
}

impl From<String> for ConvertedValue {
    fn from(text: String) -> Self {
        ConvertedValue::Text(text)
    }
}

impl From<&str> for ConvertedValue {
    fn from(text: &str) -> Self {
        ConvertedValue::Text(text.to_string())
    }
}

fn mapping_to_json(mapping: &Mapping) -> Map<String, JsonValue> {
    mapping
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json_value()))
        .collect()
}

/// A converted document: the root tag mapped to the root element's mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDocument {
    /// Root element tag name
    pub root_tag: String,
    /// Converted root element
    pub root: Mapping,
}

impl JsonDocument {
    /// Create a new document
    pub fn new(root_tag: impl Into<String>, root: Mapping) -> Self {
        Self {
            root_tag: root_tag.into(),
            root,
        }
    }

    /// Convert to a `serde_json::Value`, keeping key order
    pub fn to_json_value(&self) -> JsonValue {
        let mut wrapper = Map::new();
        wrapper.insert(self.root_tag.clone(), JsonValue::Object(mapping_to_json(&self.root)));
        JsonValue::Object(wrapper)
    }
}

impl Serialize for JsonDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.root_tag, &self.root)?;
        map.end()
    }
}
