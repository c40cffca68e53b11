//! What the session hands back to the presentation layer.

use std::time::Duration;

use kestrel_common::{Location, MimeType};
use serde::Serialize;

use crate::dispatch::RenderOutcome;
use crate::history::HistorySnapshot;

/// Size, type and timing of the current load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Bytes received.
    pub size: u64,
    /// Declared type; `None` while the request is still running.
    pub mime: Option<MimeType>,
    /// Time since the navigation started.
    pub elapsed: Duration,
}

/// A page installed by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Location the page was loaded from.
    pub location: Location,
    /// Rendered result.
    pub outcome: RenderOutcome,
    /// Load statistics.
    pub stats: LoadStats,
    /// Back/forward availability after the load.
    pub history: HistorySnapshot,
    /// Locally generated page (error or `about:`).
    pub internal: bool,
}

impl PageView {
    /// Page title: the document's own title, or the location.
    #[must_use]
    pub fn title(&self) -> String {
        self.outcome
            .document()
            .and_then(|document| document.title.clone())
            .unwrap_or_else(|| self.location.to_string())
    }
}

/// Receives session updates. Every method defaults to doing nothing.
pub trait SessionObserver {
    /// A page was installed.
    fn page_loaded(&mut self, _page: &PageView) {}

    /// Load statistics changed.
    fn progress(&mut self, _stats: &LoadStats) {}

    /// The current location changed.
    fn location_changed(&mut self, _location: &Location) {}

    /// Stop any media playing for the previous page.
    fn stop_media(&mut self) {}
}

/// Observer that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}
