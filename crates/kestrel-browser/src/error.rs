//! Error types for the browser session.
//!
//! Policy errors end a navigation attempt with a message, encoding errors
//! can be retried with the raw fallback, and transport failures never show
//! up here at all: they arrive as handler events and become error pages.

use kestrel_common::Location;
use thiserror::Error;

/// Failure to convert a payload to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    /// The declared charset has no known encoder.
    #[error("unsupported charset '{0}'")]
    UnsupportedCharset(String),
    /// Conversion produced no output at all.
    #[error("failed to convert input charset {0} to UTF-8")]
    ConversionFailed(String),
}

/// Failure to turn a response into a render outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The payload could not be converted to UTF-8.
    #[error(transparent)]
    Charset(#[from] CharsetError),
}

/// Why a navigation attempt ended early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The scheme is known but switched off.
    #[error("URI scheme disabled: {0}")]
    SchemeDisabled(String),
    /// No handler is configured for the scheme.
    #[error("URI scheme not supported: {0}")]
    UnsupportedScheme(String),
    /// The in-flight request refused to stop.
    #[error("failed to cancel running request")]
    CancelFailed,
    /// An enabled scheme has no registered handler.
    #[error("no protocol handler registered for enabled scheme '{0}'")]
    MissingHandler(String),
    /// The handler refused to start the request.
    #[error("failed to execute request to {0}")]
    RequestDispatchFailed(Location),
    /// The user declined to continue without a client certificate.
    #[error("request to a {0} location without client certificate declined")]
    CredentialDeclined(String),
    /// The per-navigation redirect limit was reached.
    #[error("too many consecutive redirections, last target was {0}")]
    TooManyRedirects(Location),
    /// The user declined a redirect.
    #[error("redirection to {0} cancelled by user")]
    RedirectCancelled(Location),
    /// The user dismissed an input prompt.
    #[error("site requires input: {0}")]
    InputCancelled(String),
    /// A certificate was requested but none was supplied.
    #[error("site requires a client certificate: {0}")]
    CertificateMissing(String),
    /// The user declined to display an unconvertible payload.
    #[error("failed to convert input charset {0} to UTF-8")]
    CharsetDeclined(String),
    /// The operation needs a current location and there is none.
    #[error("no current location")]
    NoLocation,
    /// A link target could not be parsed.
    #[error("invalid link target '{0}'")]
    InvalidLink(String),
}

/// Failure to construct a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// An enabled scheme has no registered handler.
    #[error("no protocol handler registered for enabled scheme '{0}'")]
    MissingHandler(String),
}
