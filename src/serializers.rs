//! JSON serialization
//!
//! Converted values keep their keys in insertion order, so serializing the
//! same value twice always produces the same bytes.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::converters::JsonDocument;
use crate::error::{Error, Result};

/// Default indentation width
pub const DEFAULT_INDENT: usize = 4;

/// Serialize a document as indented JSON (4 spaces)
pub fn serialize(document: &JsonDocument) -> Result<String> {
    serialize_with_indent(document, DEFAULT_INDENT)
}

/// Serialize any value as JSON indented by `indent` spaces
pub fn serialize_with_indent<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut out = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(out).map_err(|e| Error::Serialize(serde_json::Error::custom(e)))
}

/// Serialize any value as single-line JSON
pub fn serialize_compact<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
