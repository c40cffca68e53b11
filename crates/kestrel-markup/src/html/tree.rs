//! HTML tree construction onto the markup [`Node`] tree.
//!
//! This is not the WHATWG tree construction algorithm: there are no
//! insertion modes, no adoption agency and no foster parenting. Structural
//! tags map onto the node kinds the renderer understands, everything else
//! is transparent, and misnested markup is repaired by closing open
//! elements up to the nearest match.

use super::tokenizer::{HtmlTokenizer, Token};
use crate::node::{MAX_DEPTH, Node};

/// Result of parsing an HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    /// Text of the `<title>` element, if present and non-empty.
    pub title: Option<String>,
    /// Body content as a node tree rooted at [`Node::Document`].
    pub body: Node,
}

/// Tags that only separate blocks; their content belongs to the parent.
const BLOCK_BOUNDARIES: [&str; 22] = [
    "address", "article", "aside", "body", "center", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "html", "main", "nav",
    "section", "summary", "table",
];

/// Elements whose content is dropped.
const SKIPPED: [&str; 5] = ["script", "style", "textarea", "noscript", "template"];

#[derive(Debug)]
enum Mode {
    Normal,
    Pre(String),
    Code(String),
    Title(String),
    Skip(String),
}

#[derive(Debug)]
struct Frame {
    tag: String,
    node: Node,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    mode: Mode,
    title: Option<String>,
    after_space: bool,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                tag: "#document".to_string(),
                node: Node::Document(Vec::new()),
            }],
            mode: Mode::Normal,
            title: None,
            after_space: true,
        }
    }

    fn top(&self) -> Option<&Node> {
        self.stack.last().map(|frame| &frame.node)
    }

    /// Push a new open element. Past [`MAX_DEPTH`] explicit tags are
    /// ignored and their content flows into the current node; implied
    /// paragraphs and list items (`#`-prefixed) are still opened so inline
    /// content keeps a home.
    fn open(&mut self, tag: &str, node: Node) {
        if self.stack.len() >= MAX_DEPTH && !tag.starts_with('#') {
            return;
        }
        self.stack.push(Frame {
            tag: tag.to_string(),
            node,
        });
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

    /// Pop the top frame and attach it to its parent.
    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(Frame { mut node, .. }) = self.stack.pop() else {
            return;
        };
        let empty_paragraph = match &mut node {
            Node::Paragraph(children) => {
                trim_trailing_space(children);
                children.is_empty()
            }
            Node::Heading { children, .. } => {
                trim_trailing_space(children);
                false
            }
            _ => false,
        };
        if empty_paragraph {
            self.after_space = true;
            return;
        }
        if !is_inline(&node) {
            self.after_space = true;
        }
        self.append(node);
    }

    /// Close every open element up to and including the nearest `tag`.
    fn close_tag(&mut self, tag: &str) {
        if let Some(depth) = self.stack.iter().rposition(|frame| frame.tag == tag) {
            if depth == 0 {
                return;
            }
            while self.stack.len() > depth {
                self.close();
            }
        }
    }

    /// Close paragraphs, headings and inline formatting so block content can
    /// follow.
    fn close_inline(&mut self) {
        while self
            .top()
            .is_some_and(|node| !node.is_block_container() && !matches!(node, Node::List { .. }))
        {
            self.close();
        }
    }

    /// Make sure inline content has a paragraph to go into.
    fn ensure_inline_context(&mut self) {
        if matches!(self.top(), Some(Node::List { .. })) {
            self.open("#li", Node::ListItem(Vec::new()));
        }
        if self.top().is_some_and(Node::is_block_container) {
            self.open("#p", Node::Paragraph(Vec::new()));
            self.after_space = true;
        }
    }

    fn ensure_block_context(&mut self) {
        self.close_inline();
        if matches!(self.top(), Some(Node::List { .. })) {
            self.open("#li", Node::ListItem(Vec::new()));
        }
    }

    fn inline(&mut self, node: Node) {
        self.ensure_inline_context();
        self.after_space = matches!(node, Node::LineBreak);
        self.append(node);
    }

    fn text(&mut self, text: &str) {
        let collapsed = collapse_whitespace(text);
        let at_block_level = self
            .top()
            .is_some_and(|node| node.is_block_container() || matches!(node, Node::List { .. }));
        if at_block_level && collapsed.trim().is_empty() {
            return;
        }
        self.ensure_inline_context();
        let text = if self.after_space {
            collapsed.trim_start()
        } else {
            collapsed.as_str()
        };
        if text.is_empty() {
            return;
        }
        self.after_space = text.ends_with(' ');
        self.append(Node::Text(text.to_string()));
    }

    fn start_tag(&mut self, token: &Token) {
        let Token::StartTag { name, .. } = token else {
            return;
        };
        let name = name.as_str();
        match name {
            "p" => {
                self.ensure_block_context();
                self.open(name, Node::Paragraph(Vec::new()));
                self.after_space = true;
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.ensure_block_context();
                let level = name[1..].parse().unwrap_or(1);
                self.open(
                    name,
                    Node::Heading {
                        level,
                        children: Vec::new(),
                    },
                );
                self.after_space = true;
            }
            "blockquote" => {
                self.ensure_block_context();
                self.open(name, Node::BlockQuote(Vec::new()));
            }
            "ul" | "ol" | "menu" => {
                self.ensure_block_context();
                let start = token
                    .attribute("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                self.open(
                    name,
                    Node::List {
                        ordered: name == "ol",
                        start,
                        items: Vec::new(),
                    },
                );
            }
            "li" => {
                self.close_inline();
                if matches!(self.top(), Some(Node::ListItem(_))) {
                    self.close();
                }
                if !matches!(self.top(), Some(Node::List { .. })) {
                    self.open(
                        "#ul",
                        Node::List {
                            ordered: false,
                            start: 1,
                            items: Vec::new(),
                        },
                    );
                }
                self.open(name, Node::ListItem(Vec::new()));
            }
            "tr" => {
                self.ensure_block_context();
                self.open(name, Node::Paragraph(Vec::new()));
                self.after_space = true;
            }
            "td" | "th" => {
                if matches!(self.top(), Some(Node::Paragraph(children)) if !children.is_empty()) {
                    self.append(Node::Text(" | ".to_string()));
                    self.after_space = true;
                }
            }
            "pre" | "listing" | "xmp" => {
                self.ensure_block_context();
                self.mode = Mode::Pre(String::new());
            }
            "code" | "tt" | "kbd" | "samp" => self.mode = Mode::Code(String::new()),
            "title" => self.mode = Mode::Title(String::new()),
            "em" | "i" | "cite" | "var" | "dfn" => {
                self.ensure_inline_context();
                self.open(name, Node::Emphasis(Vec::new()));
            }
            "strong" | "b" => {
                self.ensure_inline_context();
                self.open(name, Node::Strong(Vec::new()));
            }
            "a" => {
                if let Some(href) = token.attribute("href") {
                    self.ensure_inline_context();
                    self.open(
                        name,
                        Node::Link {
                            destination: href.trim().to_string(),
                            title: token.attribute("title").unwrap_or_default().to_string(),
                            children: Vec::new(),
                        },
                    );
                }
            }
            "img" => {
                if let Some(src) = token.attribute("src") {
                    let alt = token.attribute("alt").unwrap_or_default().trim();
                    let children = if alt.is_empty() {
                        Vec::new()
                    } else {
                        vec![Node::Text(alt.to_string())]
                    };
                    self.inline(Node::Image {
                        source: src.trim().to_string(),
                        title: token.attribute("title").unwrap_or_default().to_string(),
                        children,
                    });
                    self.after_space = false;
                }
            }
            "br" => self.inline(Node::LineBreak),
            "hr" => {
                self.ensure_block_context();
                self.append(Node::ThematicBreak);
            }
            _ if SKIPPED.contains(&name) => self.mode = Mode::Skip(name.to_string()),
            _ if BLOCK_BOUNDARIES.contains(&name) => self.close_inline(),
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "td" | "th" => {}
            _ if BLOCK_BOUNDARIES.contains(&name) => self.close_inline(),
            _ => self.close_tag(name),
        }
    }

    /// Feed one token while inside a verbatim or skipped element.
    /// Returns `true` if the token was consumed.
    fn collect(&mut self, token: &Token) -> bool {
        let ends = |tags: &[&str]| matches!(token, Token::EndTag { name } if tags.contains(&name.as_str()));
        match &mut self.mode {
            Mode::Normal => return false,
            Mode::Pre(buffer) => match token {
                Token::Text(text) => buffer.push_str(text),
                Token::StartTag { name, .. } if name == "br" => buffer.push('\n'),
                _ if ends(&["pre", "listing", "xmp"]) => {
                    let literal = buffer.strip_prefix('\n').unwrap_or(buffer.as_str()).to_string();
                    self.mode = Mode::Normal;
                    self.append(Node::CodeBlock {
                        info: None,
                        literal,
                    });
                    self.after_space = true;
                }
                _ => {}
            },
            Mode::Code(buffer) => match token {
                Token::Text(text) => buffer.push_str(&collapse_whitespace(text)),
                _ if ends(&["code", "tt", "kbd", "samp"]) => {
                    let code = std::mem::take(buffer);
                    self.mode = Mode::Normal;
                    if !code.is_empty() {
                        self.inline(Node::InlineCode(code));
                    }
                }
                _ => {}
            },
            Mode::Title(buffer) => match token {
                Token::Text(text) => buffer.push_str(text),
                _ if ends(&["title"]) => {
                    let title = collapse_whitespace(buffer).trim().to_string();
                    self.mode = Mode::Normal;
                    if self.title.is_none() && !title.is_empty() {
                        self.title = Some(title);
                    }
                }
                _ => {}
            },
            Mode::Skip(tag) => {
                if matches!(token, Token::EndTag { name } if name.as_str() == tag.as_str()) {
                    self.mode = Mode::Normal;
                }
            }
        }
        true
    }

    fn feed(&mut self, token: &Token) {
        if self.collect(token) {
            return;
        }
        match token {
            Token::Text(text) => self.text(text),
            Token::StartTag { .. } => self.start_tag(token),
            Token::EndTag { name } => self.end_tag(name),
            Token::Doctype | Token::Comment(_) => {}
        }
    }

    fn finish(mut self) -> HtmlDocument {
        while self.stack.len() > 1 {
            self.close();
        }
        let body = self
            .stack
            .pop()
            .map_or_else(|| Node::Document(Vec::new()), |frame| frame.node);
        HtmlDocument {
            title: self.title,
            body,
        }
    }
}

const fn is_inline(node: &Node) -> bool {
    matches!(
        node,
        Node::Text(_)
            | Node::SoftBreak
            | Node::InlineCode(_)
            | Node::Emphasis(_)
            | Node::Strong(_)
            | Node::Link { .. }
            | Node::Image { .. }
            | Node::HtmlInline(_)
    )
}

/// Replace every run of ASCII whitespace with a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn trim_trailing_space(children: &mut Vec<Node>) {
    if let Some(Node::Text(text)) = children.last_mut() {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
        if text.is_empty() {
            let _ = children.pop();
        }
    }
}

/// Parse an HTML page.
#[must_use]
pub fn parse(source: &str) -> HtmlDocument {
    let mut builder = TreeBuilder::new();
    for token in HtmlTokenizer::new(source) {
        builder.feed(&token);
    }
    builder.finish()
}
