//! HTML dialect.
//!
//! Pages are tokenized, mapped onto the shared [`Node`](crate::node::Node)
//! tree and rendered by the same renderer as Markdown. Scripts, styles and
//! forms are ignored; the `<title>` element becomes the page title.

/// Character reference decoding.
pub mod entities;
/// HTML tokenizer.
pub mod tokenizer;
/// Tree construction.
pub mod tree;

use kestrel_common::Location;
use kestrel_document::{Document, DocumentStyle};

pub use tokenizer::{Attribute, HtmlTokenizer, Token};
pub use tree::{HtmlDocument, parse};

/// Render an HTML page.
#[must_use]
pub fn render(text: &str, root: &Location, style: &DocumentStyle) -> Document {
    let page = parse(text);
    crate::render::render_tree_titled(&page.body, page.title.as_deref(), root, style)
}
