//! Markup dialects for the Kestrel browser core.
//!
//! # Scope
//!
//! Each dialect is a pure function `(text, root location, style) -> Document`:
//! - **Gemtext** (`text/gemini`), rendered line by line
//! - **Gophermap** (`text/gophermap`), rendered line by line
//! - **Markdown** (`text/markdown`), parsed into a [`Node`] tree
//! - **HTML** (`text/html`), tokenized into the same [`Node`] tree
//! - **Plain text**, one preformatted block per line
//!
//! The tree-shaped dialects share one renderer ([`render::render_tree`]),
//! and all of them share the link classification in
//! [`render::classify_link`].
//!
//! # Not Yet Implemented
//!
//! - Inline images (image references render as links)
//! - Tables beyond one line per row

/// Gemtext dialect.
pub mod gemtext;
/// Gophermap dialect.
pub mod gophermap;
/// HTML dialect.
pub mod html;
/// Markdown dialect.
pub mod markdown;
/// Markup node tree.
pub mod node;
/// Plain text dialect.
pub mod plaintext;
/// Tree renderer and link classification.
pub mod render;

use kestrel_common::Location;
use kestrel_document::{Document, DocumentStyle};
use serde::Serialize;
use strum_macros::{Display, EnumString};

pub use node::Node;
pub use render::{LinkClass, classify_link, render_tree};

/// A supported markup format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `text/gemini`
    Gemtext,
    /// `text/gophermap`
    Gophermap,
    /// `text/markdown`
    Markdown,
    /// `text/html`
    Html,
    /// Any other `text/*`
    #[strum(to_string = "plaintext", serialize = "plain")]
    PlainText,
}

impl Dialect {
    /// Render `text` in this dialect.
    ///
    /// Markdown falls back to plain text when the parser is compiled out.
    #[must_use]
    pub fn render(self, text: &str, root: &Location, style: &DocumentStyle) -> Document {
        match self {
            Self::Gemtext => gemtext::render(text, root, style),
            Self::Gophermap => gophermap::render(text, root, style),
            Self::Markdown => markdown::render(text, root, style)
                .unwrap_or_else(|| plaintext::render(text, style)),
            Self::Html => html::render(text, root, style),
            Self::PlainText => plaintext::render(text, style),
        }
    }
}
