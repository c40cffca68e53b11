//! Incremental document construction.
//!
//! [`DocumentWriter`] is the cursor every renderer writes through. It owns
//! the block emission rules shared by all dialects:
//!
//! - The very first block never produces a preceding break: the writer
//!   starts with one empty block and `suppress_next_block` set, so the first
//!   [`emit_new_block`](DocumentWriter::emit_new_block) reuses it.
//! - New blocks inherit the block style of the block before them, minus any
//!   list marker, so content inside a quote or list stays inside it.
//! - [`reset_formatting`](DocumentWriter::reset_formatting) closes the
//!   current element (heading, code block, list) by starting a fresh block
//!   that the next emission reuses instead of leaving an empty line.
//! - Headings feed the outline and the page title; the first level-1
//!   heading is centered when the style asks for it.

use crate::model::{Alignment, Block, BlockRole, BlockStyle, CharStyle, Document, ListMarker, Run};
use crate::outline::OutlineBuilder;
use crate::style::DocumentStyle;

#[derive(Debug)]
struct ListFrame {
    ordered: bool,
    next_number: u64,
    outer: BlockStyle,
}

/// Builds a [`Document`] block by block.
#[derive(Debug)]
pub struct DocumentWriter<'a> {
    style: &'a DocumentStyle,
    blocks: Vec<Block>,
    suppress_next_block: bool,
    outline: OutlineBuilder,
    title: Option<String>,
    centre_first_h1: bool,
    lists: Vec<ListFrame>,
    quotes: Vec<BlockStyle>,
    pending_marker: Option<ListMarker>,
    open_quote: bool,
}

impl<'a> DocumentWriter<'a> {
    /// Start a document styled by `style`.
    #[must_use]
    pub fn new(style: &'a DocumentStyle) -> Self {
        Self {
            style,
            blocks: vec![Block {
                style: style.block_style(BlockRole::Standard),
                ..Block::default()
            }],
            suppress_next_block: true,
            outline: OutlineBuilder::new(),
            title: None,
            centre_first_h1: style.centre_h1,
            lists: Vec::new(),
            quotes: Vec::new(),
            pending_marker: None,
            open_quote: false,
        }
    }

    /// The style bundle this document is rendered with.
    #[must_use]
    pub const fn style(&self) -> &'a DocumentStyle {
        self.style
    }

    /// Page title recorded so far.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the page title unless one is already known.
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        if self.title.is_none() && !title.is_empty() {
            self.title = Some(title.to_string());
        }
    }

    /// Current list nesting depth.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        self.lists.len()
    }

    fn current(&self) -> &Block {
        // The block list is never empty: `new` seeds it and nothing removes
        // blocks before `finish`.
        &self.blocks[self.blocks.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Block {
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    fn push_block(&mut self) {
        let mut style = self.current().style.clone();
        style.list = None;
        self.blocks.push(Block {
            style,
            ..Block::default()
        });
    }

    /// Block style for `role` in the current list/quote context.
    #[must_use]
    pub fn context_style(&self, role: BlockRole) -> BlockStyle {
        let role = match role {
            BlockRole::Standard if !self.quotes.is_empty() => BlockRole::BlockQuote,
            other => other,
        };
        let mut style = self.style.block_style(role);
        style.indent = u32::try_from(self.lists.len()).unwrap_or(u32::MAX);
        style.quote_depth = u32::try_from(self.quotes.len()).unwrap_or(u32::MAX);
        style
    }

    /// Style of the block text is currently inserted into.
    #[must_use]
    pub fn block_style(&self) -> &BlockStyle {
        &self.current().style
    }

    /// Start a new block, unless the previous operation asked for the next
    /// one to be suppressed, in which case the current block is reused.
    pub fn emit_new_block(&mut self) {
        if !self.suppress_next_block {
            self.push_block();
        }
        self.suppress_next_block = false;
        if let Some(marker) = self.pending_marker.take() {
            self.current_mut().style.list = Some(marker);
        }
    }

    /// Replace the style of the current block.
    pub fn set_block_style(&mut self, style: BlockStyle) {
        let marker = self.current().style.list;
        let block = self.current_mut();
        block.style = style;
        if block.style.list.is_none() {
            block.style.list = marker;
        }
    }

    /// Switch the current block to `role`, keeping the list/quote context.
    pub fn set_block_role(&mut self, role: BlockRole) {
        let style = self.context_style(role);
        self.set_block_style(style);
    }

    /// Name the current block so the outline can jump to it.
    pub fn set_block_anchor(&mut self, anchor: impl Into<String>) {
        self.current_mut().anchor = Some(anchor.into());
    }

    /// Close the current element: start a block with `style` (or the plain
    /// style of the current context) that the next emission reuses.
    pub fn reset_formatting(&mut self, style: Option<BlockStyle>) {
        self.emit_new_block();
        self.suppress_next_block = true;
        let style = style.unwrap_or_else(|| self.context_style(BlockRole::Standard));
        let block = self.current_mut();
        block.style = style;
        block.style.list = None;
    }

    /// Append text to the current block.
    ///
    /// Embedded newlines continue the text in new blocks of the same style.
    /// Adjacent runs with identical styles are merged.
    pub fn insert_text(&mut self, text: &str, style: &CharStyle) {
        if text.is_empty() {
            return;
        }
        let text = if self.style.fancy_quotes && !style.monospace && text.contains('"') {
            self.replace_quotes(text)
        } else {
            text.to_string()
        };

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.push_block();
                self.suppress_next_block = false;
            }
            self.append_run(line.trim_end_matches('\r'), style);
        }
    }

    fn append_run(&mut self, text: &str, style: &CharStyle) {
        if text.is_empty() {
            return;
        }
        let block = self.current_mut();
        match block.runs.last_mut() {
            Some(last) if last.style == *style => last.text.push_str(text),
            _ => block.runs.push(Run {
                text: text.to_string(),
                style: style.clone(),
            }),
        }
    }

    fn replace_quotes(&mut self, text: &str) -> String {
        text.chars()
            .map(|c| {
                if c == '"' {
                    self.open_quote = !self.open_quote;
                    if self.open_quote { '\u{201C}' } else { '\u{201D}' }
                } else {
                    c
                }
            })
            .collect()
    }

    /// Open a list. Every item must be announced with
    /// [`begin_item`](Self::begin_item).
    pub fn begin_list(&mut self, ordered: bool, start: u64) {
        let outer = self.current().style.clone();
        self.emit_new_block();
        self.lists.push(ListFrame {
            ordered,
            next_number: start,
            outer,
        });
        let style = self.context_style(BlockRole::Standard);
        self.set_block_style(style);
        self.suppress_next_block = true;
    }

    /// Mark the next emitted block as the first block of a new list item.
    pub fn begin_item(&mut self) {
        if let Some(frame) = self.lists.last_mut() {
            self.pending_marker = Some(if frame.ordered {
                let number = frame.next_number;
                frame.next_number = frame.next_number.saturating_add(1);
                ListMarker::Number(number)
            } else {
                ListMarker::Bullet
            });
        }
    }

    /// Close the innermost list and restore the style from before it.
    pub fn end_list(&mut self) {
        self.pending_marker = None;
        if let Some(frame) = self.lists.pop() {
            self.reset_formatting(Some(frame.outer));
        }
    }

    /// Open a block quote occupying its own block region.
    pub fn begin_quote(&mut self) {
        self.emit_new_block();
        self.suppress_next_block = true;
        let outer = self.current().style.clone();
        self.quotes.push(outer);
        let style = self.context_style(BlockRole::BlockQuote);
        self.set_block_style(style);
    }

    /// Close the innermost block quote; the next block continues after it.
    pub fn end_quote(&mut self) {
        let Some(mut outer) = self.quotes.pop() else {
            return;
        };
        outer.list = None;
        if self.suppress_next_block && self.current().is_empty() {
            self.current_mut().style = outer;
        } else {
            self.push_block();
            self.current_mut().style = outer;
        }
        self.suppress_next_block = true;
    }

    /// Start a heading block.
    ///
    /// Levels 1 to 3 are recorded in the outline; deeper levels share the
    /// third-level look and are not tracked. The first level-1 heading
    /// becomes the page title if none is set yet.
    pub fn begin_heading(&mut self, level: u8, text: &str, anchor: Option<String>) {
        self.emit_new_block();
        let mut style = self.context_style(BlockRole::Heading(level));
        if level == 1 {
            self.set_title(text);
            if self.centre_first_h1 {
                style.alignment = Alignment::Center;
                self.centre_first_h1 = false;
            }
        }
        let _ = self.outline.push(level, text.trim(), anchor.clone());
        self.set_block_style(style);
        self.current_mut().anchor = anchor;
    }

    /// Close a heading started with [`begin_heading`](Self::begin_heading).
    pub fn end_heading(&mut self) {
        self.reset_formatting(None);
    }

    /// Finish the render pass.
    ///
    /// Trailing empty blocks are dropped, but the document always keeps at
    /// least one block.
    #[must_use]
    pub fn finish(mut self) -> Document {
        while self.blocks.len() > 1 && self.blocks.last().is_some_and(Block::is_empty) {
            let _ = self.blocks.pop();
        }
        Document {
            blocks: self.blocks,
            title: self.title,
            outline: self.outline.finish(),
            background: self.style.background,
            margin_h: self.style.margin_h,
            margin_v: self.style.margin_v,
            indent_size: self.style.indent_size,
        }
    }
}
