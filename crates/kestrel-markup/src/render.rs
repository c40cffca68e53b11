//! Tree renderer shared by the Markdown and HTML dialects.
//!
//! Walks a [`Node`] tree depth-first and drives a [`DocumentWriter`].
//! Character styles flow down the recursion: emphasis and strong emphasis
//! are additive, links replace the role and color but keep both.

use kestrel_common::warning::Warnings;
use kestrel_common::{CONTROL_SCHEME, Location};
use kestrel_document::{BlockRole, CharStyle, Document, DocumentStyle, DocumentWriter, TextRole};

use crate::node::Node;

/// How a hyperlink is presented relative to the page it appears on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClass {
    /// Text role of the link.
    pub role: TextRole,
    /// Visible annotation appended after the link text (` [GOPHER]`).
    pub suffix: Option<String>,
}

/// Classify `target` as seen from a page at `root`.
///
/// Same host → internal. A different scheme (other than the browser's
/// control scheme) → cross-protocol, annotated with the scheme in uppercase,
/// even on the same host. Anything else → external.
#[must_use]
pub fn classify_link(root: &Location, target: &Location) -> LinkClass {
    let mut role = if target.host() == root.host() {
        TextRole::InternalLink
    } else {
        TextRole::ExternalLink
    };
    let mut suffix = None;
    if target.scheme() != root.scheme() && target.scheme() != CONTROL_SCHEME {
        role = TextRole::CrossProtocolLink;
        suffix = Some(format!(" [{}]", target.scheme().to_uppercase()));
    }
    LinkClass { role, suffix }
}

/// Render a node tree into a document.
#[must_use]
pub fn render_tree(tree: &Node, root: &Location, style: &DocumentStyle) -> Document {
    render_tree_titled(tree, None, root, style)
}

/// Render a node tree whose dialect declares its own page title.
///
/// A declared title takes precedence over the first level-1 heading.
#[must_use]
pub fn render_tree_titled(
    tree: &Node,
    title: Option<&str>,
    root: &Location,
    style: &DocumentStyle,
) -> Document {
    let mut renderer = TreeRenderer {
        writer: DocumentWriter::new(style),
        root,
        warnings: Warnings::new("render"),
    };
    if let Some(title) = title {
        renderer.writer.set_title(title);
    }
    let standard = style.char_style(TextRole::Standard);
    renderer.render_node(tree, &standard);
    renderer.writer.finish()
}

struct TreeRenderer<'s, 'r> {
    writer: DocumentWriter<'s>,
    root: &'r Location,
    warnings: Warnings,
}

impl TreeRenderer<'_, '_> {
    fn render_children(&mut self, node: &Node, current: &CharStyle) {
        for child in node.children() {
            self.render_node(child, current);
        }
    }

    fn render_node(&mut self, node: &Node, current: &CharStyle) {
        let style = self.writer.style();
        match node {
            Node::Document(_) | Node::ListItem(_) => self.render_children(node, current),

            Node::BlockQuote(_) => {
                self.writer.begin_quote();
                let quoted = CharStyle {
                    bold: current.bold,
                    ..style.char_style(TextRole::BlockQuote)
                };
                self.render_children(node, &quoted);
                self.writer.end_quote();
            }

            Node::List { ordered, start, items } => {
                self.writer.begin_list(*ordered, *start);
                for item in items {
                    self.writer.begin_item();
                    self.render_node(item, current);
                }
                self.writer.end_list();
            }

            Node::CodeBlock { literal, .. } => {
                self.writer.emit_new_block();
                self.writer.set_block_role(BlockRole::Preformatted);
                let code = literal.strip_suffix('\n').unwrap_or(literal);
                self.writer
                    .insert_text(code, &style.char_style(TextRole::Preformatted));
                self.writer.reset_formatting(None);
            }

            Node::Paragraph(_) => {
                self.writer.emit_new_block();
                self.render_children(node, current);
            }

            Node::Heading { level, .. } => {
                let text = node.plain_text();
                self.writer.begin_heading(*level, &text, None);
                let heading = style.char_style(TextRole::heading(*level));
                self.render_children(node, &heading);
                self.writer.end_heading();
            }

            Node::Text(text) => self.writer.insert_text(text, current),
            Node::SoftBreak => self.writer.insert_text(" ", current),
            Node::LineBreak => self.writer.emit_new_block(),
            Node::InlineCode(code) => self
                .writer
                .insert_text(code, &style.char_style(TextRole::Preformatted)),

            Node::Emphasis(_) => self.render_children(node, &current.italicized()),
            Node::Strong(_) => self.render_children(node, &current.bolded()),

            Node::Link {
                destination: target,
                ..
            }
            | Node::Image { source: target, .. } => self.render_link(node, target, current),

            Node::ThematicBreak => self.warnings.warn("skipping thematic break"),
            Node::HtmlBlock(_) => self.warnings.warn("skipping raw HTML block"),
            Node::HtmlInline(_) => self.warnings.warn("skipping inline HTML"),
        }
    }

    fn render_link(&mut self, node: &Node, target: &str, current: &CharStyle) {
        let Ok(absolute) = self.root.resolve(target) else {
            self.warnings.warn_about("unresolvable link target", target);
            self.render_children(node, current);
            return;
        };

        let class = classify_link(self.root, &absolute);
        let format = CharStyle {
            bold: current.bold,
            italic: current.italic,
            anchor: Some(absolute.as_str().to_string()),
            ..self.writer.style().char_style(class.role)
        };

        if node.children().is_empty() {
            self.writer.insert_text(target, &format);
        } else {
            self.render_children(node, &format);
        }
        if let Some(suffix) = class.suffix {
            self.writer.insert_text(&suffix, &format);
        }
    }
}
