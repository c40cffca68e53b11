//! `data:` URLs.

use kestrel_common::DataUrl;

use super::{LocalSink, complete};
use crate::handler::{EventSink, HandlerEvent, NetworkErrorKind, ProtocolHandler, Request};
use crate::identity::ClientIdentity;

/// Decodes inline `data:` payloads.
#[derive(Debug, Default)]
pub struct DataHandler {
    sink: LocalSink,
}

impl DataHandler {
    /// New handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProtocolHandler for DataHandler {
    fn supports_scheme(&self, scheme: &str) -> bool {
        scheme == "data"
    }

    fn attach(&mut self, sink: EventSink) {
        self.sink.attach(sink);
    }

    fn start_request(&mut self, request: Request) -> bool {
        let events = match DataUrl::parse(request.location.as_str()) {
            Ok(data) => complete(data.payload, &data.mime.to_string()),
            Err(err) => vec![HandlerEvent::NetworkError {
                kind: NetworkErrorKind::BadRequest,
                reason: err.to_string(),
            }],
        };
        self.sink.reply(&request, events)
    }

    fn cancel_request(&mut self) -> bool {
        true
    }

    fn is_in_progress(&self) -> bool {
        false
    }

    fn enable_client_certificate(&mut self, _identity: &ClientIdentity) -> bool {
        false
    }

    fn disable_client_certificate(&mut self) {}
}
