//! `about:` pages.

use std::fmt::Write as _;

use kestrel_common::Location;

use super::{LocalSink, complete};
use crate::favourites::SharedFavourites;
use crate::handler::{EventSink, HandlerEvent, NetworkErrorKind, ProtocolHandler, Request};
use crate::identity::ClientIdentity;

const HELP: &str = "# Kestrel

A browser for the small web.

## Local pages
=> about:blank Empty page
=> about:favourites Favourites
=> about:version Version

## Supported documents
* text/gemini
* text/gophermap
* text/markdown
* text/html
* any other text/* as plain text
";

/// Serves the browser's built-in pages.
#[derive(Default)]
pub struct AboutHandler {
    sink: LocalSink,
    favourites: Option<SharedFavourites>,
}

impl AboutHandler {
    /// Handler without a favourites page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `about:favourites` from `favourites`.
    #[must_use]
    pub fn with_favourites(mut self, favourites: SharedFavourites) -> Self {
        self.favourites = Some(favourites);
        self
    }

    fn page(&self, location: &Location) -> Option<String> {
        match location.path() {
            "blank" => Some(String::new()),
            "help" => Some(HELP.to_string()),
            "version" => Some(format!(
                "# Kestrel\n\nBrowser core version {}.\n",
                env!("CARGO_PKG_VERSION")
            )),
            "favourites" => Some(self.favourites_page()),
            _ => None,
        }
    }

    fn favourites_page(&self) -> String {
        let mut page = String::from("# Favourites\n\n");
        let locations = self
            .favourites
            .as_ref()
            .map(|store| store.borrow().locations())
            .unwrap_or_default();
        if locations.is_empty() {
            page.push_str("No favourites yet.\n");
        }
        for location in locations {
            let _ = writeln!(page, "=> {location}");
        }
        page
    }
}

impl ProtocolHandler for AboutHandler {
    fn supports_scheme(&self, scheme: &str) -> bool {
        scheme == "about"
    }

    fn attach(&mut self, sink: EventSink) {
        self.sink.attach(sink);
    }

    fn start_request(&mut self, request: Request) -> bool {
        let events = match self.page(&request.location) {
            Some(page) => complete(page.into_bytes(), "text/gemini"),
            None => vec![HandlerEvent::NetworkError {
                kind: NetworkErrorKind::ResourceNotFound,
                reason: format!("unknown page {}", request.location),
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
