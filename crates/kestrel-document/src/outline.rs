//! Heading outline.
//!
//! The outline is built during a single render pass through an
//! [`OutlineBuilder`]. Only [`OutlineBuilder::finish`] yields an
//! [`Outline`], so a half-built outline can never be observed.

use serde::Serialize;

/// One heading recorded in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Heading level, 1 to 3.
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// In-document anchor, if the dialect assigns one.
    pub anchor: Option<String>,
}

/// Ordered list of headings of a rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
}

/// A heading with the headings nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    /// The heading.
    pub entry: OutlineEntry,
    /// Lower-level headings that follow it.
    pub children: Vec<OutlineNode>,
}

impl Outline {
    /// Entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    /// True if no heading was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(level, title)` pairs in document order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(u8, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.level, entry.title.as_str()))
            .collect()
    }

    /// Nest each heading under the nearest preceding heading of a lower
    /// level. Headings with no such predecessor stay at the top.
    #[must_use]
    pub fn tree(&self) -> Vec<OutlineNode> {
        let mut roots: Vec<OutlineNode> = Vec::new();
        for entry in &self.entries {
            insert_node(&mut roots, entry.clone());
        }
        roots
    }
}

fn insert_node(siblings: &mut Vec<OutlineNode>, entry: OutlineEntry) {
    match siblings.last_mut() {
        Some(last) if last.entry.level < entry.level => insert_node(&mut last.children, entry),
        _ => siblings.push(OutlineNode {
            entry,
            children: Vec::new(),
        }),
    }
}

/// Accumulates headings during one render pass.
#[derive(Debug, Default)]
pub struct OutlineBuilder {
    entries: Vec<OutlineEntry>,
}

impl OutlineBuilder {
    /// Start an empty outline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heading. Levels outside 1..=3 are ignored and `false` is
    /// returned.
    pub fn push(&mut self, level: u8, title: impl Into<String>, anchor: Option<String>) -> bool {
        if !(1..=3).contains(&level) {
            return false;
        }
        self.entries.push(OutlineEntry {
            level,
            title: title.into(),
            anchor,
        });
        true
    }

    /// End the render pass and yield the outline.
    #[must_use]
    pub fn finish(self) -> Outline {
        Outline {
            entries: self.entries,
        }
    }
}
