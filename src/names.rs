//! XML name validation
//!
//! Element and attribute names must match the XML 1.0 `Name` production.
//! Prefixed names such as `ns:item` are accepted as written.

use crate::error::{ParseError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

const NAME_START_CHARS: &str = r":A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}";

const NAME_CHARS: &str = r"\-\.0-9\u{B7}\u{300}-\u{36F}\u{203F}-\u{2040}";

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[{start}][{start}{rest}]*$",
        start = NAME_START_CHARS,
        rest = NAME_CHARS
    ))
    .unwrap()
});

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Validate an element or attribute name
///
/// `kind` names what is being checked ("element", "attribute") in the error.
pub fn validate_name(name: &str, kind: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ParseError::new(format!("invalid {} name '{}'", kind, name)).into())
    }
}
