//! The styled document model produced by every renderer.
//!
//! A [`Document`] is an ordered sequence of [`Block`]s. Each block carries a
//! block-level style and an ordered sequence of [`Run`]s; each run is a piece
//! of text with a character-level style and an optional link target.

use serde::Serialize;
use strum_macros::Display;

use crate::color::Color;
use crate::outline::Outline;

/// Semantic role of a run of text, resolved to concrete attributes by the
/// active [`DocumentStyle`](crate::DocumentStyle).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum TextRole {
    /// Body text.
    #[default]
    Standard,
    /// First-level heading.
    Heading1,
    /// Second-level heading.
    Heading2,
    /// Third-level heading (also used for levels 4 to 6).
    Heading3,
    /// Fixed-width text.
    Preformatted,
    /// Quoted text.
    BlockQuote,
    /// Link to the same host.
    InternalLink,
    /// Link to another host over the same scheme.
    ExternalLink,
    /// Link to another scheme.
    CrossProtocolLink,
}

impl TextRole {
    /// Role for a heading of the given level; levels above 3 share the
    /// third-level role.
    #[must_use]
    pub const fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            _ => Self::Heading3,
        }
    }

    /// True for the three link roles.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(
            self,
            Self::InternalLink | Self::ExternalLink | Self::CrossProtocolLink
        )
    }
}

/// Character-level style of a [`Run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharStyle {
    /// Semantic role.
    pub role: TextRole,
    /// Foreground color.
    pub color: Color,
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub point_size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Fixed-width font.
    pub monospace: bool,
    /// Link target (fully encoded), if this run is a hyperlink.
    pub anchor: Option<String>,
}

impl CharStyle {
    /// Copy with bold weight.
    #[must_use]
    pub fn bolded(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    /// Copy with italic slant.
    #[must_use]
    pub fn italicized(&self) -> Self {
        Self {
            italic: true,
            ..self.clone()
        }
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Alignment {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
}

/// Semantic role of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
pub enum BlockRole {
    /// Ordinary paragraph.
    #[default]
    Standard,
    /// Heading of the given level (1 to 6).
    Heading(u8),
    /// Preformatted text.
    Preformatted,
    /// Content of a block quote.
    BlockQuote,
}

/// Marker drawn before the first block of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    /// Bullet of an unordered list.
    Bullet,
    /// Number of an ordered list item.
    Number(u64),
}

/// Block-level style of a [`Block`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockStyle {
    /// Semantic role.
    pub role: BlockRole,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// List marker, present only on the first block of a list item.
    pub list: Option<ListMarker>,
    /// Indentation level (list nesting depth).
    pub indent: u32,
    /// Block quote nesting depth.
    pub quote_depth: u32,
    /// Space above the block, in points.
    pub margin_top: f64,
    /// Space below the block, in points.
    pub margin_bottom: f64,
}

/// A styled piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// The text.
    pub text: String,
    /// Character style.
    pub style: CharStyle,
}

/// A paragraph-like unit of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    /// Block-level style.
    pub style: BlockStyle,
    /// In-document anchor name, for outline navigation.
    pub anchor: Option<String>,
    /// Ordered runs.
    pub runs: Vec<Run>,
}

impl Block {
    /// Concatenated text of all runs.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// True if the block holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }
}

/// A rendered document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Ordered blocks; never empty for a finished document.
    pub blocks: Vec<Block>,
    /// Page title (first level-1 heading, or a dialect-specific title).
    pub title: Option<String>,
    /// Heading outline.
    pub outline: Outline,
    /// Page background color.
    pub background: Color,
    /// Horizontal page margin, in points.
    pub margin_h: f64,
    /// Vertical page margin, in points.
    pub margin_v: f64,
    /// Width of one indentation level, in points.
    pub indent_size: f64,
}

impl Document {
    /// Plain text of the document, one line per block.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All link targets in document order. Adjacent runs of the same link
    /// count once.
    #[must_use]
    pub fn links(&self) -> Vec<&str> {
        let mut links: Vec<&str> = self
            .blocks
            .iter()
            .flat_map(|block| block.runs.iter())
            .filter_map(|run| run.style.anchor.as_deref())
            .collect();
        links.dedup();
        links
    }

    /// Index of the block carrying the given anchor name.
    #[must_use]
    pub fn find_anchor(&self, anchor: &str) -> Option<usize> {
        self.blocks
            .iter()
            .position(|block| block.anchor.as_deref() == Some(anchor))
    }
}
