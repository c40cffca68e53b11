//! Plain text dialect: every line becomes one preformatted block.

use kestrel_document::{BlockRole, Document, DocumentStyle, DocumentWriter, TextRole};

/// Render plain text.
#[must_use]
pub fn render(text: &str, style: &DocumentStyle) -> Document {
    let mut writer = DocumentWriter::new(style);
    let pre = style.char_style(TextRole::Preformatted);
    for line in text.lines() {
        writer.emit_new_block();
        writer.set_block_role(BlockRole::Preformatted);
        writer.insert_text(line, &pre);
    }
    writer.finish()
}
