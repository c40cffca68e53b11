//! Deduplicated warnings for unsupported input.
//!
//! Renderers meet markup they deliberately do not handle (raw HTML blocks,
//! thematic breaks, unknown gophermap item types). Every occurrence is
//! harmless, so each render pass owns a [`Warnings`] log that emits every
//! distinct message once instead of once per node. The log lives only as
//! long as the render pass; nothing is shared between pages or threads.

use std::collections::HashSet;

/// Per-render warning log.
///
/// Messages are static strings so the set of keys stays bounded no matter
/// what the page contains; the offending input goes in the `detail` field.
///
/// # Example
/// ```ignore
/// let mut warnings = Warnings::new("markdown");
/// warnings.warn("skipping raw HTML block");
/// warnings.warn_about("unresolvable link target", "::bad");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    component: &'static str,
    seen: HashSet<&'static str>,
}

impl Warnings {
    /// Empty log for `component` (the dialect or pass name).
    #[must_use]
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            seen: HashSet::new(),
        }
    }

    /// Warn about an unsupported construct (logged once per unique message).
    pub fn warn(&mut self, message: &'static str) {
        self.warn_about(message, "");
    }

    /// Like [`warn`](Self::warn), attaching the input that triggered it.
    /// Only the first detail for each message is logged.
    pub fn warn_about(&mut self, message: &'static str, detail: &str) {
        if self.seen.insert(message) {
            tracing::warn!(component = self.component, detail, "{message}");
        }
    }

    /// True if `message` has been emitted.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.seen.contains(message)
    }

    /// Number of distinct messages emitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True if nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
