//! Markup node tree.
//!
//! The tree-shaped dialects (Markdown and HTML) parse into this tagged
//! union before rendering. Each case carries only the fields relevant to it
//! and owns its children exclusively; the tree is built once per render and
//! dropped afterwards.
//!
//! Tree builders never nest deeper than [`MAX_DEPTH`] explicit elements;
//! content past that depth is attached to the innermost open node. The
//! renderer walks the tree recursively, so the cap keeps hostile pages from
//! exhausting the stack.

/// Deepest element nesting a tree builder will produce.
pub const MAX_DEPTH: usize = 128;

/// One node of a parsed markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root of the tree.
    Document(Vec<Node>),
    /// Quoted block content.
    BlockQuote(Vec<Node>),
    /// Ordered or unordered list; children are [`Node::ListItem`]s.
    List {
        /// Numbered list.
        ordered: bool,
        /// Number of the first item.
        start: u64,
        /// The items.
        items: Vec<Node>,
    },
    /// One list item.
    ListItem(Vec<Node>),
    /// Verbatim code block.
    CodeBlock {
        /// Info string after the opening fence, if any.
        info: Option<String>,
        /// The code, newline-terminated lines.
        literal: String,
    },
    /// Paragraph of inline content.
    Paragraph(Vec<Node>),
    /// Heading of level 1 to 6.
    Heading {
        /// Heading level.
        level: u8,
        /// Inline content.
        children: Vec<Node>,
    },
    /// Horizontal rule.
    ThematicBreak,
    /// Literal text.
    Text(String),
    /// Line break inside a paragraph that renders as a space.
    SoftBreak,
    /// Forced line break.
    LineBreak,
    /// Inline code span.
    InlineCode(String),
    /// Emphasized (italic) content.
    Emphasis(Vec<Node>),
    /// Strongly emphasized (bold) content.
    Strong(Vec<Node>),
    /// Hyperlink.
    Link {
        /// Link target as written.
        destination: String,
        /// Title attribute.
        title: String,
        /// Link text.
        children: Vec<Node>,
    },
    /// Image reference; rendered like a link.
    Image {
        /// Image location as written.
        source: String,
        /// Title attribute.
        title: String,
        /// Alternative text.
        children: Vec<Node>,
    },
    /// Raw HTML at block level.
    HtmlBlock(String),
    /// Raw HTML inside inline content.
    HtmlInline(String),
}

impl Node {
    /// Children of a container node; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Document(children)
            | Self::BlockQuote(children)
            | Self::List {
                items: children, ..
            }
            | Self::ListItem(children)
            | Self::Paragraph(children)
            | Self::Heading { children, .. }
            | Self::Emphasis(children)
            | Self::Strong(children)
            | Self::Link { children, .. }
            | Self::Image { children, .. } => children,
            Self::CodeBlock { .. }
            | Self::ThematicBreak
            | Self::Text(_)
            | Self::SoftBreak
            | Self::LineBreak
            | Self::InlineCode(_)
            | Self::HtmlBlock(_)
            | Self::HtmlInline(_) => &[],
        }
    }

    /// Mutable children of a container node; `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Document(children)
            | Self::BlockQuote(children)
            | Self::List {
                items: children, ..
            }
            | Self::ListItem(children)
            | Self::Paragraph(children)
            | Self::Heading { children, .. }
            | Self::Emphasis(children)
            | Self::Strong(children)
            | Self::Link { children, .. }
            | Self::Image { children, .. } => Some(children),
            Self::CodeBlock { .. }
            | Self::ThematicBreak
            | Self::Text(_)
            | Self::SoftBreak
            | Self::LineBreak
            | Self::InlineCode(_)
            | Self::HtmlBlock(_)
            | Self::HtmlInline(_) => None,
        }
    }

    /// True for nodes that hold block content and wrap stray inline content
    /// in an implicit paragraph.
    #[must_use]
    pub const fn is_block_container(&self) -> bool {
        matches!(
            self,
            Self::Document(_) | Self::BlockQuote(_) | Self::ListItem(_)
        )
    }

    /// Concatenated literal text of the subtree; breaks become spaces.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) | Self::InlineCode(text) => out.push_str(text),
            Self::CodeBlock { literal, .. } => out.push_str(literal),
            Self::SoftBreak | Self::LineBreak => out.push(' '),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}
