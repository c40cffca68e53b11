//! Built-in handlers for the schemes that need no network: `about:`,
//! `file:` and `data:`.
//!
//! All three answer synchronously: `start_request` pushes its events into
//! the sink before returning, and the session picks them up on its next
//! [`pump_events`](crate::Session::pump_events).

mod about;
mod data;
mod file;

pub use about::AboutHandler;
pub use data::DataHandler;
pub use file::{FileHandler, mime_for_path};

use crate::handler::{EventSink, HandlerEvent, Request};

/// Sink plumbing shared by the local handlers.
#[derive(Debug, Default)]
struct LocalSink {
    sink: Option<EventSink>,
}

impl LocalSink {
    fn attach(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    /// Send every event for `request`; `false` if unattached or closed.
    fn reply(&self, request: &Request, events: Vec<HandlerEvent>) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };
        events
            .into_iter()
            .all(|event| sink.send(request.id, event))
    }
}

/// Builds the complete response for a local request.
fn complete(data: Vec<u8>, mime: &str) -> Vec<HandlerEvent> {
    let transferred = u64::try_from(data.len()).unwrap_or(u64::MAX);
    vec![
        HandlerEvent::Progress { transferred },
        HandlerEvent::Complete {
            data,
            mime: mime.to_string(),
        },
    ]
}
