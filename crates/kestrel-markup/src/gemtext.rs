//! Gemtext (`text/gemini`) dialect.
//!
//! Gemtext is line oriented; every line type is recognized by its prefix:
//!
//! ```text
//! => url [label]     link, one per line
//! # / ## / ###       headings
//! * item             unordered list item
//! > quote            quote line
//! ```
//!
//! A line starting with three backticks toggles preformatted mode.
//!
//! Consecutive list items form one list and consecutive quote lines one
//! quote. Headings get the anchors `auto-title-1`, `auto-title-2`, ... so the
//! outline can jump to them.

use kestrel_common::Location;
use kestrel_common::warning::Warnings;
use kestrel_document::{BlockRole, CharStyle, Document, DocumentStyle, DocumentWriter, TextRole};

use crate::render::classify_link;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    None,
    List,
    Quote,
}

struct GemtextRenderer<'s, 'r> {
    writer: DocumentWriter<'s>,
    root: &'r Location,
    group: Group,
    preformatted: bool,
    anchors: usize,
    warnings: Warnings,
}

impl<'s> GemtextRenderer<'s, '_> {
    fn style(&self) -> &'s DocumentStyle {
        self.writer.style()
    }

    fn enter_group(&mut self, group: Group) {
        if self.group == group {
            return;
        }
        match self.group {
            Group::List => self.writer.end_list(),
            Group::Quote => self.writer.end_quote(),
            Group::None => {}
        }
        match group {
            Group::List => self.writer.begin_list(false, 1),
            Group::Quote => self.writer.begin_quote(),
            Group::None => {}
        }
        self.group = group;
    }

    fn text_block(&mut self, role: BlockRole, text: &str, style: &CharStyle) {
        self.writer.emit_new_block();
        self.writer.set_block_role(role);
        self.writer.insert_text(text, style);
    }

    fn line(&mut self, line: &str) {
        if line.starts_with("```") {
            self.enter_group(Group::None);
            self.preformatted = !self.preformatted;
            return;
        }

        if self.preformatted {
            let pre = self.style().char_style(TextRole::Preformatted);
            self.text_block(BlockRole::Preformatted, line, &pre);
            return;
        }

        if let Some(rest) = line.strip_prefix("=>") {
            self.enter_group(Group::None);
            self.link(rest);
        } else if line.starts_with('#') {
            self.enter_group(Group::None);
            self.heading(line);
        } else if let Some(item) = line.strip_prefix("* ") {
            self.enter_group(Group::List);
            self.writer.begin_item();
            let standard = self.style().char_style(TextRole::Standard);
            self.text_block(BlockRole::Standard, item.trim(), &standard);
        } else if let Some(quote) = line.strip_prefix('>') {
            self.enter_group(Group::Quote);
            let quoted = self.style().char_style(TextRole::BlockQuote);
            self.text_block(BlockRole::BlockQuote, quote.trim(), &quoted);
        } else {
            self.enter_group(Group::None);
            let standard = self.style().char_style(TextRole::Standard);
            self.text_block(BlockRole::Standard, line, &standard);
        }
    }

    fn heading(&mut self, line: &str) {
        let level = line.chars().take_while(|&c| c == '#').count().min(3);
        let text = line[level..].trim_start_matches('#').trim();
        let level = u8::try_from(level).unwrap_or(3);

        self.anchors += 1;
        let anchor = format!("auto-title-{}", self.anchors);
        self.writer.begin_heading(level, text, Some(anchor));
        let heading = self.style().char_style(TextRole::heading(level));
        self.writer.insert_text(text, &heading);
        self.writer.end_heading();
    }

    fn link(&mut self, rest: &str) {
        let rest = rest.trim();
        let (target, label) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(target, label)| (target, label.trim()));
        let label = if label.is_empty() { target } else { label };

        let Ok(absolute) = self.root.resolve(target) else {
            self.warnings.warn_about("unresolvable link target", target);
            let standard = self.style().char_style(TextRole::Standard);
            self.text_block(BlockRole::Standard, label, &standard);
            return;
        };

        let class = classify_link(self.root, &absolute);
        let prefix = if class.role == TextRole::InternalLink {
            &self.style().internal_link_prefix
        } else {
            &self.style().external_link_prefix
        };
        let format = CharStyle {
            anchor: Some(absolute.as_str().to_string()),
            ..self.style().char_style(class.role)
        };

        self.writer.emit_new_block();
        self.writer.set_block_role(BlockRole::Standard);
        self.writer.insert_text(prefix, &format);
        self.writer.insert_text(label, &format);
        if let Some(suffix) = class.suffix {
            self.writer.insert_text(&suffix, &format);
        }
    }
}

/// Render a gemtext document.
#[must_use]
pub fn render(text: &str, root: &Location, style: &DocumentStyle) -> Document {
    let mut renderer = GemtextRenderer {
        writer: DocumentWriter::new(style),
        root,
        group: Group::None,
        preformatted: false,
        anchors: 0,
        warnings: Warnings::new("gemtext"),
    };
    for line in text.lines() {
        renderer.line(line);
    }
    renderer.enter_group(Group::None);
    renderer.writer.finish()
}
