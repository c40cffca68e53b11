//! Markdown (CommonMark) dialect.
//!
//! Parsing is delegated to `pulldown-cmark`; its event stream is folded
//! into a [`Node`] tree and handed to the shared tree renderer. The parser
//! is an optional dependency behind the `markdown` cargo feature; without it
//! [`render`] returns `None` and callers fall back to plain text.

use kestrel_common::Location;
use kestrel_document::{Document, DocumentStyle};

#[cfg(feature = "markdown")]
use crate::node::Node;

/// True when the Markdown parser was compiled in.
pub const AVAILABLE: bool = cfg!(feature = "markdown");

/// Render Markdown text, or `None` if Markdown support is compiled out.
#[must_use]
pub fn render(text: &str, root: &Location, style: &DocumentStyle) -> Option<Document> {
    #[cfg(feature = "markdown")]
    {
        Some(crate::render::render_tree(&parse(text), root, style))
    }
    #[cfg(not(feature = "markdown"))]
    {
        let _ = (text, root, style);
        None
    }
}

#[cfg(feature = "markdown")]
pub use parser::parse;

#[cfg(feature = "markdown")]
mod parser {
    use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

    use crate::node::{MAX_DEPTH, Node};

    struct Frame {
        node: Node,
        implicit: bool,
    }

    /// Builds the tree from start/end events with a stack of open nodes.
    struct TreeBuilder {
        stack: Vec<Frame>,
        /// Start events dropped past [`MAX_DEPTH`], awaiting their end.
        flattened: usize,
    }

    impl TreeBuilder {
        fn new() -> Self {
            Self {
                stack: vec![Frame {
                    node: Node::Document(Vec::new()),
                    implicit: false,
                }],
                flattened: 0,
            }
        }

        fn top(&self) -> Option<&Node> {
            self.stack.last().map(|frame| &frame.node)
        }

        fn open(&mut self, node: Node, implicit: bool) {
            self.stack.push(Frame { node, implicit });
        }

        /// Pop the top node and attach it to its parent.
        fn close(&mut self) {
            if self.stack.len() < 2 {
                return;
            }
            if let Some(frame) = self.stack.pop() {
                self.append(frame.node);
            }
        }

        fn close_implicit(&mut self) {
            while self.stack.last().is_some_and(|frame| frame.implicit) {
                self.close();
            }
        }

        fn append(&mut self, node: Node) {
            if let Some(children) = self
                .stack
                .last_mut()
                .and_then(|frame| frame.node.children_mut())
            {
                children.push(node);
            }
        }

        /// Tight list items carry inline content without a paragraph; wrap
        /// it so every item renders as its own block.
        fn ensure_inline_context(&mut self) {
            if self.top().is_some_and(Node::is_block_container) {
                self.open(Node::Paragraph(Vec::new()), true);
            }
        }

        fn start(&mut self, tag: Tag<'_>) {
            let node = match tag {
                Tag::Paragraph => Node::Paragraph(Vec::new()),
                Tag::Heading(level, _, _) => Node::Heading {
                    level: heading_level(level),
                    children: Vec::new(),
                },
                Tag::BlockQuote => Node::BlockQuote(Vec::new()),
                Tag::CodeBlock(kind) => Node::CodeBlock {
                    info: match kind {
                        CodeBlockKind::Fenced(info) if !info.is_empty() => Some(info.to_string()),
                        _ => None,
                    },
                    literal: String::new(),
                },
                Tag::List(start) => Node::List {
                    ordered: start.is_some(),
                    start: start.unwrap_or(1),
                    items: Vec::new(),
                },
                Tag::Item => Node::ListItem(Vec::new()),
                Tag::Emphasis => Node::Emphasis(Vec::new()),
                Tag::Strong => Node::Strong(Vec::new()),
                Tag::Link(_, destination, title) => Node::Link {
                    destination: destination.to_string(),
                    title: title.to_string(),
                    children: Vec::new(),
                },
                Tag::Image(_, source, title) => Node::Image {
                    source: source.to_string(),
                    title: title.to_string(),
                    children: Vec::new(),
                },
                Tag::TableHead | Tag::TableRow => Node::Paragraph(Vec::new()),
                Tag::TableCell => {
                    if self.top().is_some_and(|node| !node.children().is_empty()) {
                        self.append(Node::Text(" | ".to_string()));
                    }
                    return;
                }
                // Rendered through their children.
                Tag::Table(_) | Tag::FootnoteDefinition(_) | Tag::Strikethrough => return,
            };

            if self.flattened > 0 || self.stack.len() >= MAX_DEPTH {
                self.flattened += 1;
                return;
            }
            if is_inline(&node) {
                self.ensure_inline_context();
            } else {
                self.close_implicit();
            }
            self.open(node, false);
        }

        fn end(&mut self, tag: &Tag<'_>) {
            if matches!(
                tag,
                Tag::TableCell | Tag::Table(_) | Tag::FootnoteDefinition(_) | Tag::Strikethrough
            ) {
                return;
            }
            if self.flattened > 0 {
                self.flattened -= 1;
                return;
            }
            self.close_implicit();
            self.close();
        }

        fn inline(&mut self, node: Node) {
            self.ensure_inline_context();
            self.append(node);
        }

        fn text(&mut self, text: &str) {
            if let Some(Frame {
                node: Node::CodeBlock { literal, .. },
                ..
            }) = self.stack.last_mut()
            {
                literal.push_str(text);
                return;
            }
            self.inline(Node::Text(text.to_string()));
        }

        fn html(&mut self, html: &str) {
            if self.top().is_some_and(Node::is_block_container) {
                self.append(Node::HtmlBlock(html.to_string()));
            } else {
                self.append(Node::HtmlInline(html.to_string()));
            }
        }

        fn finish(mut self) -> Node {
            while self.stack.len() > 1 {
                self.close();
            }
            self.stack
                .pop()
                .map_or_else(|| Node::Document(Vec::new()), |frame| frame.node)
        }
    }

    const fn is_inline(node: &Node) -> bool {
        matches!(
            node,
            Node::Emphasis(_) | Node::Strong(_) | Node::Link { .. } | Node::Image { .. }
        )
    }

    const fn heading_level(level: HeadingLevel) -> u8 {
        match level {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }

    /// Parse CommonMark text (with tables, footnotes, strikethrough and task
    /// lists) into a node tree.
    #[must_use]
    pub fn parse(text: &str) -> Node {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut builder = TreeBuilder::new();
        for event in Parser::new_ext(text, options) {
            match event {
                Event::Start(tag) => builder.start(tag),
                Event::End(tag) => builder.end(&tag),
                Event::Text(text) => builder.text(&text),
                Event::Code(code) => builder.inline(Node::InlineCode(code.to_string())),
                Event::Html(html) => builder.html(&html),
                Event::FootnoteReference(label) => builder.inline(Node::Text(format!("[{label}]"))),
                Event::SoftBreak => builder.inline(Node::SoftBreak),
                Event::HardBreak => builder.inline(Node::LineBreak),
                Event::Rule => {
                    builder.close_implicit();
                    builder.append(Node::ThematicBreak);
                }
                Event::TaskListMarker(checked) => {
                    builder.inline(Node::Text(if checked { "[x] " } else { "[ ] " }.to_string()));
                }
            }
        }
        builder.finish()
    }
}

#[cfg(feature = "markdown")]
impl Node {
    /// Parse Markdown text into a node tree.
    #[must_use]
    pub fn from_markdown(text: &str) -> Self {
        parse(text)
    }
}
