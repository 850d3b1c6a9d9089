//! XML document parsing
//!
//! This module builds the element tree the converter consumes. It is a thin
//! layer over quick-xml's pull reader that keeps exactly what the conversion
//! needs: tag names, ordered attributes, the text directly under an element,
//! and ordered children.

use crate::entities::EntityTable;
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::names;
use encoding_rs::{Encoding, UTF_8};
use quick_xml::encoding::detect_encoding;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::{debug, trace};

/// XML Element in the document tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source (including any prefix)
    pub tag: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    /// Character data directly under the element, before its first child
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Get the tag name of the element
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Set text content
    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    /// Set text content (builder)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an attribute (builder)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element (builder)
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Find child elements by tag name
    pub fn find_children(&self, tag: &str) -> Vec<&Element> {
        self.children.iter().filter(|e| e.tag == tag).collect()
    }

    /// Depth of the subtree rooted at this element (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Element::depth).max().unwrap_or(0)
    }

    fn append_text(&mut self, text: &str) {
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }
}

/// Parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Parse an XML document from a string
    ///
    /// The text is already decoded, so any `encoding` in the XML
    /// declaration is ignored.
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse_str_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes
    ///
    /// The input is decoded first: a byte order mark selects UTF-8 or
    /// UTF-16, otherwise the `encoding` of the XML declaration is used,
    /// and UTF-8 when there is none.
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        let text = decode_input(xml)?;
        Self::parse_str_with_limits(&text, limits)
    }

    /// Parse an XML document from a string
    pub fn parse_str_with_limits(xml: &str, limits: &Limits) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let xml = normalize_line_endings(xml);
        let bytes = xml.as_bytes();

        let mut reader = Reader::from_str(&xml);
        reader.trim_text(false);
        reader.check_end_names(true);
        reader.expand_empty_elements(false);

        let mut entities = EntityTable::new();
        let mut root: Option<Element> = None;
        let mut element_stack: Vec<Element> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| parse_error(bytes, reader.buffer_position(), e.to_string()))?;

            match event {
                Event::Start(e) => {
                    if root.is_some() {
                        return Err(junk_after_root(bytes, reader.buffer_position()));
                    }
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, &mut entities, limits)
                        .map_err(|err| locate(err, bytes, reader.buffer_position()))?;
                    trace!(tag = %element.tag, depth = element_stack.len() + 1, "open element");
                    element_stack.push(element);
                }
                Event::End(e) => {
                    let current = element_stack.pop().ok_or_else(|| {
                        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                        parse_error(
                            bytes,
                            reader.buffer_position(),
                            format!("unexpected closing tag '{}'", name),
                        )
                    })?;
                    match element_stack.last_mut() {
                        Some(parent) => parent.add_child(current),
                        None => root = Some(current),
                    }
                }
                Event::Empty(e) => {
                    if root.is_some() {
                        return Err(junk_after_root(bytes, reader.buffer_position()));
                    }
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, &mut entities, limits)
                        .map_err(|err| locate(err, bytes, reader.buffer_position()))?;
                    match element_stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(e) => {
                    let raw = std::str::from_utf8(&e)
                        .map_err(|err| parse_error(bytes, reader.buffer_position(), err.to_string()))?;
                    if raw.contains("]]>") {
                        return Err(parse_error(
                            bytes,
                            reader.buffer_position(),
                            "']]>' is not allowed in character data",
                        )
                        .into());
                    }
                    let text = entities
                        .unescape(raw, limits)
                        .map_err(|err| locate(err, bytes, reader.buffer_position()))?;
                    match element_stack.last_mut() {
                        // Text after the first child element is not kept
                        Some(current) if current.children.is_empty() => {
                            current.append_text(&text)
                        }
                        Some(_) => {}
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(parse_error(
                                bytes,
                                reader.buffer_position(),
                                "text outside of the root element",
                            )
                            .into())
                        }
                    }
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e).map_err(|err| {
                        parse_error(
                            bytes,
                            reader.buffer_position(),
                            format!("invalid UTF-8 in CDATA section: {}", err),
                        )
                    })?;
                    match element_stack.last_mut() {
                        Some(current) if current.children.is_empty() => {
                            current.append_text(text)
                        }
                        Some(_) => {}
                        None => {
                            return Err(parse_error(
                                bytes,
                                reader.buffer_position(),
                                "CDATA section outside of the root element",
                            )
                            .into())
                        }
                    }
                }
                Event::DocType(e) => {
                    let doctype = std::str::from_utf8(&e)
                        .map_err(|err| parse_error(bytes, reader.buffer_position(), err.to_string()))?;
                    entities
                        .declare_from_doctype(doctype, limits)
                        .map_err(|err| locate(err, bytes, reader.buffer_position()))?;
                }
                Event::Eof => break,
                // XML declaration, comments, processing instructions
                _ => {}
            }
        }

        if let Some(open) = element_stack.last() {
            return Err(parse_error(
                bytes,
                bytes.len(),
                format!("unclosed element '{}'", open.tag),
            )
            .into());
        }

        let root = root.ok_or_else(|| ParseError::new("no root element found"))?;
        debug!(root = %root.tag, children = root.children.len(), "parsed XML document");

        Ok(Document { root })
    }

    /// Parse element from BytesStart event
    fn parse_element(
        start: &BytesStart<'_>,
        entities: &mut EntityTable,
        limits: &Limits,
    ) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| ParseError::new(format!("invalid element name: {}", e)))?
            .to_string();
        names::validate_name(&name, "element")?;

        let mut element = Element::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| ParseError::new(format!("failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::new(format!("invalid attribute name: {}", e)))?;
            names::validate_name(attr_name, "attribute")?;

            // Namespace declarations are not data
            if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
                continue;
            }

            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| ParseError::new(format!("invalid attribute value: {}", e)))?;
            if raw.contains('<') {
                return Err(ParseError::new(format!(
                    "'<' is not allowed in the value of attribute '{}'",
                    attr_name
                ))
                .into());
            }

            // Literal whitespace becomes a space; `&#10;` and friends survive
            let raw = raw.replace(['\t', '\n', '\r'], " ");
            let attr_value = entities.unescape(&raw, limits)?.into_owned();

            element.attributes.push((attr_name.to_string(), attr_value));
        }

        limits.check_attributes(element.attributes.len())?;

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Take ownership of the root element
    pub fn into_root(self) -> Element {
        self.root
    }
}

/// Decode raw input bytes into text
fn decode_input(xml: &[u8]) -> Result<Cow<'_, str>> {
    let (detected, bom_len) = match detect_encoding(xml) {
        Some((encoding, bom_len)) => (Some(encoding), bom_len),
        None => (None, 0),
    };
    let body = &xml[bom_len..];

    let encoding = match detected {
        Some(encoding) if is_utf16(encoding) => encoding,
        // ASCII-compatible input: trust the declaration, unless it claims a
        // 16-bit encoding the bytes plainly are not in
        _ => match declared_encoding(body)? {
            Some(declared) if !is_utf16(declared) => declared,
            _ => UTF_8,
        },
    };

    debug!(encoding = encoding.name(), "decoding XML input");
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| ParseError::new(format!("input is not valid {}", encoding.name())).into())
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding.name().starts_with("UTF-16")
}

/// Encoding named by the XML declaration, if the input starts with one
fn declared_encoding(xml: &[u8]) -> Result<Option<&'static Encoding>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let decl = match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => decl,
        // Anything else is left for the parser to report
        _ => return Ok(None),
    };

    match decl.encoding() {
        Some(Ok(label)) => Encoding::for_label(&label).map(Some).ok_or_else(|| {
            ParseError::new(format!(
                "unsupported encoding '{}'",
                String::from_utf8_lossy(&label)
            ))
            .into()
        }),
        _ => Ok(None),
    }
}

/// Normalize `\r\n` and lone `\r` to `\n`
fn normalize_line_endings(xml: &str) -> Cow<'_, str> {
    if xml.contains('\r') {
        Cow::Owned(xml.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(xml)
    }
}

/// Attach a line/column location to parse errors raised without one
fn locate(err: Error, xml: &[u8], position: usize) -> Error {
    match err {
        Error::Parse(inner) if inner.location.is_none() => {
            let located = parse_error(xml, position, inner.message);
            Error::Parse(located)
        }
        other => other,
    }
}

fn junk_after_root(xml: &[u8], position: usize) -> Error {
    parse_error(xml, position, "junk after document element").into()
}

/// Build a parse error located at a byte offset of the input
fn parse_error(xml: &[u8], position: usize, message: impl Into<String>) -> ParseError {
    let position = position.min(xml.len());
    let before = xml.get(..position).unwrap_or(xml);
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let column = position - line_start + 1;

    let line_end = xml
        .get(line_start..)
        .and_then(|rest| rest.iter().position(|&b| b == b'\n'))
        .map_or(xml.len(), |i| line_start + i);
    let excerpt = String::from_utf8_lossy(xml.get(line_start..line_end).unwrap_or_default());

    let mut err = ParseError::new(message)
        .with_location(format!("line {}, column {}", line, column));
    if !excerpt.trim().is_empty() {
        err = err.with_source(excerpt.trim_end().to_string());
    }
    err
}
