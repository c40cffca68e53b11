//! Gophermap (directory listing) dialect.
//!
//! [RFC 1436 § 3.8](https://www.rfc-editor.org/rfc/rfc1436#section-3.8)
//!
//! Each line is `<type><display>\t<selector>\t<host>\t<port>`; a line
//! holding a single `.` ends the menu. The whole listing is rendered in the
//! preformatted style with a type tag in front of every entry so the
//! columns line up.

use kestrel_common::warning::Warnings;
use kestrel_common::{Location, LocationError};
use kestrel_document::{BlockRole, CharStyle, Document, DocumentStyle, DocumentWriter, TextRole};

use crate::render::classify_link;

/// Width of the type tag column (`[DIR] `).
const TAG_WIDTH: usize = 6;

/// A parsed menu line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<'a> {
    /// Item type character.
    pub kind: char,
    /// Display string.
    pub display: &'a str,
    /// Selector on the target server.
    pub selector: &'a str,
    /// Target host.
    pub host: &'a str,
    /// Target port.
    pub port: u16,
}

impl<'a> MenuItem<'a> {
    /// Parse one menu line. Returns `None` for an empty line.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut chars = line.chars();
        let kind = chars.next()?;
        let mut fields = chars.as_str().split('\t');
        let display = fields.next().unwrap_or_default();
        let selector = fields.next().unwrap_or_default();
        let host = fields.next().unwrap_or_default().trim();
        let port = fields
            .next()
            .and_then(|port| port.trim().parse().ok())
            .unwrap_or(70);
        Some(Self {
            kind,
            display,
            selector,
            host,
            port,
        })
    }

    /// Short tag shown before the entry.
    #[must_use]
    pub const fn tag(&self) -> Option<&'static str> {
        Some(match self.kind {
            '0' => "[TXT]",
            '1' => "[DIR]",
            '2' => "[CSO]",
            '4' | '5' | '6' | '9' => "[BIN]",
            '7' => "[QRY]",
            '8' | 'T' => "[TEL]",
            'g' | 'I' | 'p' => "[IMG]",
            'h' => "[WWW]",
            's' => "[SND]",
            'd' => "[DOC]",
            '+' => "[MIR]",
            ';' => "[VID]",
            _ => return None,
        })
    }

    /// True for lines that only carry text.
    #[must_use]
    pub const fn is_info(&self) -> bool {
        matches!(self.kind, 'i' | '3')
    }

    /// Location this entry links to.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if the fields do not form a valid URL.
    pub fn target(&self) -> Result<Location, LocationError> {
        if let ('h', Some(url)) = (self.kind, self.selector.strip_prefix("URL:")) {
            return Location::parse(url);
        }
        if matches!(self.kind, '8' | 'T') {
            return Location::parse(&format!("telnet://{}:{}", self.host, self.port));
        }
        Location::parse(&format!(
            "gopher://{}:{}/{}{}",
            self.host, self.port, self.kind, self.selector
        ))
    }
}

/// Render a gophermap.
#[must_use]
pub fn render(text: &str, root: &Location, style: &DocumentStyle) -> Document {
    let mut writer = DocumentWriter::new(style);
    let pre = style.char_style(TextRole::Preformatted);
    let blank = " ".repeat(TAG_WIDTH);
    let mut warnings = Warnings::new("gophermap");

    for line in text.lines() {
        if line == "." {
            break;
        }
        writer.emit_new_block();
        writer.set_block_role(BlockRole::Preformatted);

        let Some(item) = MenuItem::parse(line) else {
            continue;
        };

        if item.is_info() {
            writer.insert_text(&blank, &pre);
            writer.insert_text(item.display, &pre);
            continue;
        }

        let Some(tag) = item.tag() else {
            warnings.warn_about("unknown item type", &item.kind.to_string());
            writer.insert_text(&blank, &pre);
            writer.insert_text(item.display, &pre);
            continue;
        };

        writer.insert_text(&format!("{tag:<width$}", width = TAG_WIDTH), &pre);
        match item.target() {
            Ok(target) => {
                let class = classify_link(root, &target);
                let format = CharStyle {
                    monospace: true,
                    font_family: pre.font_family.clone(),
                    anchor: Some(target.as_str().to_string()),
                    ..style.char_style(class.role)
                };
                writer.insert_text(item.display, &format);
                if let Some(suffix) = class.suffix {
                    writer.insert_text(&suffix, &format);
                }
            }
            Err(err) => {
                warnings.warn_about("invalid menu entry", &err.to_string());
                writer.insert_text(item.display, &pre);
            }
        }
    }
    writer.finish()
}
