//! Entity resolution
//!
//! General entities declared in a document's internal DTD subset are
//! collected into an [`EntityTable`] and substituted into text and attribute
//! values alongside the predefined entities and character references.
//! Parameter entities and external (`SYSTEM`/`PUBLIC`) entities are not
//! loaded; a reference to one fails like any undeclared entity.

use crate::error::{ParseError, Result};
use crate::limits::Limits;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use quick_xml::escape::unescape_with;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

static ENTITY_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<!ENTITY\s+(%\s+)?([^\s%"'>]+)\s+(?:"([^"]*)"|'([^']*)'|(?:SYSTEM|PUBLIC)\b[^>]*)\s*>"#,
    )
    .unwrap()
});

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static ENTITY_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"&([^&;#\s]+);").unwrap());

/// Declared general entities and the expansion budget spent on them
#[derive(Debug, Default)]
pub struct EntityTable {
    /// Fully expanded replacement text by entity name
    values: HashMap<String, String>,
    /// Number of entity references expanded so far
    expansions: usize,
    /// Bytes of replacement text produced so far
    expanded_size: usize,
}

impl EntityTable {
    /// Create an empty table (only the predefined entities resolve)
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared entities
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no entities are declared
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replacement text of a declared entity
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Collect the entity declarations of a DOCTYPE body
    ///
    /// `doctype` is the content of `<!DOCTYPE ...>` without the keyword.
    /// The first declaration of a name wins. Replacement text may refer to
    /// other entities declared in the same subset.
    pub fn declare_from_doctype(&mut self, doctype: &str, limits: &Limits) -> Result<()> {
        let Some(start) = doctype.find('[') else {
            return Ok(());
        };
        let subset = COMMENT.replace_all(&doctype[start..], "");

        let mut raw: IndexMap<String, String> = IndexMap::new();
        for caps in ENTITY_DECL.captures_iter(&subset) {
            if caps.get(1).is_some() {
                continue;
            }
            let value = match caps.get(3).or_else(|| caps.get(4)) {
                Some(value) => value.as_str(),
                None => continue,
            };
            raw.entry(caps[2].to_string())
                .or_insert_with(|| value.to_string());
        }

        let mut active = Vec::new();
        for name in raw.keys() {
            self.expand(name, &raw, &mut active, limits)?;
        }

        debug!(entities = self.values.len(), "declared internal entities");
        Ok(())
    }

    fn expand(
        &mut self,
        name: &str,
        raw: &IndexMap<String, String>,
        active: &mut Vec<String>,
        limits: &Limits,
    ) -> Result<()> {
        if self.values.contains_key(name) {
            return Ok(());
        }
        let Some(value) = raw.get(name) else {
            return Ok(());
        };
        if active.iter().any(|n| n == name) {
            return Err(
                ParseError::new(format!("recursive entity reference '&{};'", name)).into(),
            );
        }
        if value.contains('<') {
            return Err(ParseError::new(format!(
                "entity '{}' contains markup, which is not supported",
                name
            ))
            .into());
        }

        active.push(name.to_string());
        for caps in ENTITY_REF.captures_iter(value) {
            self.expand(&caps[1], raw, active, limits)?;
        }
        active.pop();

        let expanded = self.unescape(value, limits)?.into_owned();
        self.values.insert(name.to_string(), expanded);
        Ok(())
    }

    /// Replace entity and character references in raw text
    ///
    /// Every substitution of a declared entity counts against the limits'
    /// expansion count and expansion size.
    pub fn unescape<'a>(&mut self, raw: &'a str, limits: &Limits) -> Result<Cow<'a, str>> {
        let values = &self.values;
        let mut expansions = 0;
        let mut expanded_size = 0;

        let result = unescape_with(raw, |name| {
            let value = values.get(name)?;
            expansions += 1;
            expanded_size += value.len();
            Some(value.as_str())
        });

        self.expansions += expansions;
        self.expanded_size += expanded_size;
        limits.check_entity_expansions(self.expansions)?;
        limits.check_entity_expansion_size(self.expanded_size)?;

        result.map_err(|e| ParseError::new(format!("failed to resolve reference: {}", e)).into())
    }
}
