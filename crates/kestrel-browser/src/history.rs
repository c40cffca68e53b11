//! Navigation history.
//!
//! An ordered list of visited locations with a cursor. Pushing while the
//! cursor is not at the end drops every entry after it, the way back/forward
//! works in every mainstream browser.

use kestrel_common::Location;
use serde::Serialize;

/// Back/forward availability for the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
    /// A back step is possible.
    pub can_go_back: bool,
    /// A forward step is possible.
    pub can_go_forward: bool,
}

/// Visited locations plus a cursor.
///
/// The cursor is `None` until the first push and always in bounds after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<Location>,
    cursor: Option<usize>,
}

impl History {
    /// Empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// Record `location` after the cursor, dropping forward entries, and
    /// move the cursor onto it. Returns the new cursor.
    pub fn push(&mut self, location: Location) -> usize {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push(location);
        let cursor = self.entries.len() - 1;
        self.cursor = Some(cursor);
        cursor
    }

    /// Index one step back from the cursor.
    #[must_use]
    pub fn one_backward(&self) -> Option<usize> {
        self.cursor?.checked_sub(1)
    }

    /// Index one step forward from the cursor.
    #[must_use]
    pub fn one_forward(&self) -> Option<usize> {
        let next = self.cursor? + 1;
        (next < self.entries.len()).then_some(next)
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Location> {
        self.entries.get(index)
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.entries.get(self.cursor?)
    }

    /// Current cursor.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Move the cursor. Out-of-range indices are rejected.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    /// True if [`one_backward`](Self::one_backward) would succeed.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.one_backward().is_some()
    }

    /// True if [`one_forward`](Self::one_forward) would succeed.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.one_forward().is_some()
    }

    /// Back/forward availability.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
        }
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first push.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
