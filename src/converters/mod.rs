//! XML to JSON converters
//!
//! This module turns a parsed element tree into an ordered value model
//! ([`ConvertedValue`]) that serializes to JSON.
//!
//! Conversion rules:
//! - Direct text, trimmed, under the `text` key (omitted when blank)
//! - Attributes under `@`-prefixed keys
//! - Child elements under their tag name; repeated tags become sequences
//!
//! ```rust
//! use xml2json::converters::convert_document;
//! use xml2json::documents::Document;
//!
//! let doc = Document::from_string(r#"<root><a id="1">x</a></root>"#)?;
//! let converted = convert_document(doc.root())?;
//! assert_eq!(
//!     converted.to_json_value(),
//!     serde_json::json!({"root": {"a": {"text": "x", "@id": "1"}}})
//! );
//! # Ok::<(), xml2json::Error>(())
//! ```

mod base;
mod tree;

pub use base::{ConvertedValue, ConverterConfig, JsonDocument, Mapping};
pub use tree::{convert_document, convert_element, TreeConverter};
