//! A small, tolerant HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! Covers tags with quoted and unquoted attributes, comments, DOCTYPEs,
//! character references, and the raw-text elements whose content must not
//! be tokenized (`script`, `style`, `title`, `textarea`). Malformed markup
//! degrades to text instead of failing.

use std::collections::VecDeque;

use super::entities;

/// An attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercase attribute name.
    pub name: String,
    /// Decoded attribute value.
    pub value: String,
}

/// Tokens emitted to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE ...>`
    Doctype,
    /// Opening tag.
    StartTag {
        /// Lowercase tag name.
        name: String,
        /// `<br/>` style self-closing flag.
        self_closing: bool,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },
    /// Closing tag.
    EndTag {
        /// Lowercase tag name.
        name: String,
    },
    /// `<!-- ... -->`
    Comment(String),
    /// Decoded character data.
    Text(String),
}

impl Token {
    /// Value of the named attribute on a start tag.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "title", "textarea"];

/// Splits HTML source into [`Token`]s.
pub struct HtmlTokenizer<'a> {
    input: &'a str,
    pos: usize,
    pending_raw: Option<String>,
    queue: VecDeque<Token>,
}

impl<'a> HtmlTokenizer<'a> {
    /// Tokenize `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending_raw: None,
            queue: VecDeque::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Queue the content of a raw-text element and its end tag, consuming
    /// input through the end tag.
    fn raw_text(&mut self, name: &str) {
        let rest = self.rest();
        let closing = format!("</{name}");
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        let content = &rest[..end];
        let after = &rest[end..];
        self.pos += end + after.find('>').map_or(after.len(), |gt| gt + 1);

        if !content.is_empty() {
            let text = if name == "title" || name == "textarea" {
                entities::decode(content)
            } else {
                content.to_string()
            };
            self.queue.push_back(Token::Text(text));
        }
        self.queue.push_back(Token::EndTag {
            name: name.to_string(),
        });
    }

    fn markup_declaration(&mut self) -> Token {
        let rest = self.rest();
        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body.find("-->");
            let comment = end.map_or(body, |e| &body[..e]).to_string();
            self.pos += 4 + end.map_or(body.len(), |e| e + 3);
            return Token::Comment(comment);
        }
        let end = rest.find('>').map_or(rest.len(), |e| e + 1);
        self.pos += end;
        if rest
            .get(2..9)
            .is_some_and(|keyword| keyword.eq_ignore_ascii_case("doctype"))
        {
            return Token::Doctype;
        }
        let body_end = if rest[..end].ends_with('>') { end - 1 } else { end };
        Token::Comment(rest.get(2..body_end).unwrap_or_default().to_string())
    }

    fn tag(&mut self) -> Option<Token> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let closing = bytes.get(1) == Some(&b'/');
        let name_start = if closing { 2 } else { 1 };
        if !bytes
            .get(name_start)
            .is_some_and(u8::is_ascii_alphabetic)
        {
            return None;
        }

        let name_end = rest[name_start..]
            .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
            .map_or(rest.len(), |i| i + name_start);
        let name = rest[name_start..name_end].to_ascii_lowercase();

        let mut attributes = Vec::new();
        let mut self_closing = false;
        let mut i = name_end;
        loop {
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            match bytes.get(i) {
                None => break,
                Some(b'>') => {
                    i += 1;
                    break;
                }
                Some(b'/') => {
                    self_closing = true;
                    i += 1;
                }
                Some(_) => {
                    let (attribute, next) = parse_attribute(rest, i);
                    // Duplicate attributes keep the first value.
                    let fresh = attribute.filter(|attr| {
                        !closing && !attributes.iter().any(|a: &Attribute| a.name == attr.name)
                    });
                    if let Some(attribute) = fresh {
                        attributes.push(attribute);
                    }
                    i = next;
                }
            }
        }
        self.pos += i;

        if closing {
            return Some(Token::EndTag { name });
        }
        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing {
            self.pending_raw = Some(name.clone());
        }
        Some(Token::StartTag {
            name,
            self_closing,
            attributes,
        })
    }
}

/// Parse one attribute at byte offset `start`; returns it (if it has a
/// name) and the offset just past it.
fn parse_attribute(tag: &str, start: usize) -> (Option<Attribute>, usize) {
    let bytes = tag.as_bytes();
    let mut i = start;
    while bytes
        .get(i)
        .is_some_and(|&b| !b.is_ascii_whitespace() && b != b'=' && b != b'>' && b != b'/')
    {
        i += 1;
    }
    // A stray '=' with no name: skip it so the loop always advances.
    let name = tag[start..i].to_ascii_lowercase();
    if i == start {
        return (None, i + 1);
    }

    let mut j = i;
    while bytes.get(j).is_some_and(u8::is_ascii_whitespace) {
        j += 1;
    }
    if bytes.get(j) != Some(&b'=') {
        return (Some(Attribute { name, value: String::new() }), i);
    }
    j += 1;
    while bytes.get(j).is_some_and(u8::is_ascii_whitespace) {
        j += 1;
    }

    let (raw, next) = match bytes.get(j) {
        Some(&quote @ (b'"' | b'\'')) => {
            let body = &tag[j + 1..];
            let end = body.find(char::from(quote)).unwrap_or(body.len());
            (&body[..end], (j + 1 + end + 1).min(tag.len()))
        }
        _ => {
            let end = tag[j..]
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .map_or(tag.len(), |e| e + j);
            (&tag[j..end], end)
        }
    };
    (
        Some(Attribute {
            name,
            value: entities::decode(raw),
        }),
        next,
    )
}

impl Iterator for HtmlTokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(name) = self.pending_raw.take() {
            self.raw_text(&name);
        }
        if let Some(token) = self.queue.pop_front() {
            return Some(token);
        }

        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with('<') {
            if rest.starts_with("<!") || rest.starts_with("<?") {
                return Some(self.markup_declaration());
            }
            if let Some(token) = self.tag() {
                return Some(token);
            }
            // Not a tag: a literal '<'.
            self.pos += 1;
            return Some(Token::Text("<".to_string()));
        }

        let end = rest.find('<').unwrap_or(rest.len());
        self.pos += end;
        Some(Token::Text(entities::decode(&rest[..end])))
    }
}
