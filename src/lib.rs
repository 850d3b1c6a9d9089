//! # xml2json
//!
//! Convert XML documents to JSON.
//!
//! The conversion maps each element to a JSON object:
//!
//! - attributes become `@name` keys with their string values
//! - direct text content, trimmed, becomes a `text` key
//! - child elements become keys named after their tag; tags repeated among
//!   siblings become arrays in document order
//! - the whole document is wrapped in an object keyed by the root tag
//!
//! ## Example
//!
//! ```rust
//! use xml2json::{xml_str_to_json, ConverterConfig};
//!
//! let json = xml_str_to_json(
//!     r#"<root><a id="1">x</a><a id="2">y</a></root>"#,
//!     &ConverterConfig::default(),
//! )?;
//! let value: serde_json::Value = serde_json::from_str(&json).unwrap();
//! assert_eq!(value["root"]["a"][1]["@id"], "2");
//! # Ok::<(), xml2json::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Input
pub mod locations;
pub mod loaders;
pub mod documents;
pub mod entities;
pub mod names;

// Conversion and output
pub mod converters;
pub mod serializers;
pub mod writers;

use std::path::Path;
use tracing::{debug, instrument};

// Re-exports for convenience
pub use converters::{ConvertedValue, ConverterConfig, JsonDocument, Mapping, TreeConverter};
pub use documents::{Document, Element};
pub use error::{Error, Result};
pub use limits::Limits;
pub use locations::Location;

/// Version of the xml2json library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read, parse and convert an XML source into a JSON document
#[instrument(skip_all, fields(source = %source))]
pub fn convert_source(source: &Location, config: &ConverterConfig) -> Result<JsonDocument> {
    if let Location::String(xml) = source {
        return convert_xml(xml, config);
    }
    let xml = loaders::Loader::new()
        .with_limits(config.limits().clone())
        .load(source)?;
    convert_bytes(&xml, config)
}

/// Parse and convert XML text into a JSON document
///
/// The text is already decoded; a declared `encoding` is ignored.
pub fn convert_xml(xml: &str, config: &ConverterConfig) -> Result<JsonDocument> {
    config.limits().check_xml_size(xml.len())?;
    let document = Document::parse_str_with_limits(xml, config.limits())?;
    TreeConverter::with_config(config.clone()).convert_document(document.root())
}

/// Decode, parse and convert raw XML bytes into a JSON document
pub fn convert_bytes(xml: &[u8], config: &ConverterConfig) -> Result<JsonDocument> {
    config.limits().check_xml_size(xml.len())?;
    let document = Document::parse_with_limits(xml, config.limits())?;
    TreeConverter::with_config(config.clone()).convert_document(document.root())
}

/// Convert an XML source into indented JSON text
pub fn xml_to_json(source: &Location, config: &ConverterConfig) -> Result<String> {
    let document = convert_source(source, config)?;
    let json = serializers::serialize_with_indent(&document, config.indent())?;
    debug!(bytes = json.len(), "serialized JSON");
    Ok(json)
}

/// Convert XML text into indented JSON text
pub fn xml_str_to_json(xml: &str, config: &ConverterConfig) -> Result<String> {
    let document = convert_xml(xml, config)?;
    serializers::serialize_with_indent(&document, config.indent())
}

/// Save JSON text to a file
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_json_to_file(json: &str, path: impl AsRef<Path>) -> Result<()> {
    writers::Writer::new().write(json, path.as_ref())
}
