//! The protocol handler contract.
//!
//! A handler performs the actual exchange for one or more schemes. It is
//! handed an [`EventSink`] once, when the session registers it, and reports
//! everything that happens to a request through that sink, tagged with the
//! request's [`RequestId`]. The session compares the tag against its active
//! request and drops events from requests it has already abandoned.

use std::fmt;
use std::sync::mpsc;

use kestrel_common::Location;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::identity::ClientIdentity;

/// Identifies one dispatched request. Every dispatch, including redirects
/// and retries, gets a fresh id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestId(u64);

impl RequestId {
    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-request switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestOptions {
    /// Normal request.
    #[default]
    Default,
    /// Retry ignoring TLS verification errors.
    IgnoreTlsErrors,
}

/// A request handed to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Tag to attach to every event about this request.
    pub id: RequestId,
    /// Target location.
    pub location: Location,
    /// Request switches.
    pub options: RequestOptions,
}

/// Transport failure categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NetworkErrorKind {
    /// Anything not covered below.
    Unknown,
    /// The server broke the protocol.
    ProtocolViolation,
    /// DNS lookup failed.
    HostNotFound,
    /// The server refused the connection.
    ConnectionRefused,
    /// The resource does not exist.
    ResourceNotFound,
    /// The server rejected the request.
    BadRequest,
    /// The server refuses to proxy.
    ProxyRequest,
    /// The server failed internally.
    InternalServerError,
    /// The server rejected the client certificate.
    InvalidClientCertificate,
    /// The server's certificate is not trusted.
    UntrustedHost,
    /// The server's certificate changed since the last visit.
    MistrustedHost,
    /// The client certificate is not authorized.
    Unauthorized,
    /// The TLS handshake failed.
    TlsFailure,
    /// The request timed out.
    Timeout,
}

/// Something that happened to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerEvent {
    /// Bytes received so far.
    Progress {
        /// Total bytes transferred.
        transferred: u64,
    },
    /// The response is complete.
    Complete {
        /// Response body.
        data: Vec<u8>,
        /// Declared content type.
        mime: String,
    },
    /// The server redirected the request.
    Redirected {
        /// Redirect target.
        location: Location,
        /// Permanent redirect.
        permanent: bool,
    },
    /// The server asks for a line of input.
    InputRequired {
        /// Prompt text from the server.
        prompt: String,
    },
    /// The server asks for a client certificate.
    CertificateRequired {
        /// Reason given by the server.
        reason: String,
    },
    /// The request failed in transport.
    NetworkError {
        /// Failure category.
        kind: NetworkErrorKind,
        /// Detail from the handler.
        reason: String,
    },
}

/// A [`HandlerEvent`] tagged with the request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    /// Originating request.
    pub request: RequestId,
    /// The event.
    pub event: HandlerEvent,
}

/// Sending half of a session's event queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<TaggedEvent>,
}

impl EventSink {
    /// Create a sink and the receiver the session drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<TaggedEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Report `event` for `request`. Returns `false` if the session is gone.
    pub fn send(&self, request: RequestId, event: HandlerEvent) -> bool {
        self.tx.send(TaggedEvent { request, event }).is_ok()
    }
}

/// A protocol implementation for one or more schemes.
pub trait ProtocolHandler {
    /// True if this handler serves `scheme`.
    fn supports_scheme(&self, scheme: &str) -> bool;

    /// Receive the sink to report events through. Called once, at
    /// registration.
    fn attach(&mut self, sink: EventSink);

    /// Start `request`. Returns `false` if it could not be started.
    fn start_request(&mut self, request: Request) -> bool;

    /// Cancel the running request. Returns `true` if nothing is running
    /// afterwards.
    fn cancel_request(&mut self) -> bool;

    /// True while a request is running.
    fn is_in_progress(&self) -> bool;

    /// Use `identity` for following requests. Returns `false` if the
    /// scheme has no notion of client certificates.
    fn enable_client_certificate(&mut self, identity: &ClientIdentity) -> bool;

    /// Stop using any client certificate.
    fn disable_client_certificate(&mut self);
}
