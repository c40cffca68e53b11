//! MIME type parsing.
//!
//! [RFC 2045 § 5.1](https://www.rfc-editor.org/rfc/rfc2045#section-5.1)
//!
//! Servers of the small-web protocols are not strict about the syntax, so
//! parsing never fails: missing parts are left empty and stray whitespace
//! between the essence and its parameters is tolerated
//! (`text/plain charset=utf-8`).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A parsed content type: `type/subtype; key=value; ...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MimeType {
    /// Top-level type, lowercase (`text`, `image`, ...).
    pub top_level: String,
    /// Subtype, lowercase (`gemini`, `png`, ...).
    pub subtype: String,
    /// Parameters with lowercase keys and unquoted values.
    pub parameters: BTreeMap<String, String>,
}

impl MimeType {
    /// Parse a content type string.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut segments = text.split(';');
        let head = segments.next().unwrap_or_default();
        let mut head_parts = head.split_whitespace();
        let essence = head_parts.next().unwrap_or_default();

        let (top_level, subtype) = essence.split_once('/').unwrap_or((essence, ""));

        let parameters = head_parts
            .chain(segments)
            .filter_map(|segment| {
                let (key, value) = segment.trim().split_once('=')?;
                let key = key.trim().to_ascii_lowercase();
                if key.is_empty() {
                    return None;
                }
                Some((key, value.trim().trim_matches('"').to_string()))
            })
            .collect();

        Self {
            top_level: top_level.trim().to_ascii_lowercase(),
            subtype: subtype.trim().to_ascii_lowercase(),
            parameters,
        }
    }

    /// Look up a parameter, falling back to `default` when absent.
    #[must_use]
    pub fn parameter<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map_or(default, String::as_str)
    }

    /// True if this is exactly `top_level/subtype`.
    #[must_use]
    pub fn is(&self, top_level: &str, subtype: &str) -> bool {
        self.top_level == top_level && self.subtype == subtype
    }

    /// The `type/subtype` pair without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.top_level, self.subtype)
    }

    /// True if nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.top_level, self.subtype)?;
        for (key, value) in &self.parameters {
            write!(f, "; {key}={value}")?;
        }
        Ok(())
    }
}
