//! Canned gemtext pages for transport failures.

use std::fmt::Write as _;

use kestrel_common::CONTROL_SCHEME;

use crate::handler::NetworkErrorKind;

fn explanation(kind: NetworkErrorKind) -> (&'static str, &'static str) {
    match kind {
        NetworkErrorKind::Unknown => (
            "Unknown error",
            "Something went wrong while loading the page.",
        ),
        NetworkErrorKind::ProtocolViolation => (
            "Protocol violation",
            "The server sent a response that does not follow the protocol.",
        ),
        NetworkErrorKind::HostNotFound => (
            "Host not found",
            "The host name could not be resolved. Check the address for typos.",
        ),
        NetworkErrorKind::ConnectionRefused => (
            "Connection refused",
            "The server refused the connection. It may be down or not serving this protocol.",
        ),
        NetworkErrorKind::ResourceNotFound => (
            "Not found",
            "The requested resource does not exist on this server.",
        ),
        NetworkErrorKind::BadRequest => (
            "Bad request",
            "The server could not understand the request.",
        ),
        NetworkErrorKind::ProxyRequest => (
            "Proxy request refused",
            "The server does not accept proxy requests for other hosts.",
        ),
        NetworkErrorKind::InternalServerError => (
            "Internal server error",
            "The server failed while processing the request. Try again later.",
        ),
        NetworkErrorKind::InvalidClientCertificate => (
            "Invalid client certificate",
            "The server rejected the client certificate that was sent.",
        ),
        NetworkErrorKind::UntrustedHost => (
            "Untrusted host",
            "The certificate of this host could not be verified.",
        ),
        NetworkErrorKind::MistrustedHost => (
            "Mistrusted host",
            "The certificate of this host changed since your last visit. \
             Someone may be intercepting the connection.",
        ),
        NetworkErrorKind::Unauthorized => (
            "Unauthorized",
            "The client certificate is not authorized to access this resource.",
        ),
        NetworkErrorKind::TlsFailure => (
            "TLS failure",
            "The secure connection could not be established.",
        ),
        NetworkErrorKind::Timeout => (
            "Timeout",
            "The server did not answer in time.",
        ),
    }
}

/// True for failures a user may choose to bypass by ignoring TLS errors.
#[must_use]
pub const fn offers_tls_bypass(kind: NetworkErrorKind) -> bool {
    matches!(
        kind,
        NetworkErrorKind::UntrustedHost | NetworkErrorKind::MistrustedHost | NetworkErrorKind::TlsFailure
    )
}

/// The gemtext page shown for `kind`, with the handler's `reason` quoted.
///
/// Every line of the reason becomes a quote line, so it can never add links
/// (control links in particular) to the page.
#[must_use]
pub fn error_page(kind: NetworkErrorKind, reason: &str) -> String {
    let (title, body) = explanation(kind);
    let mut page = format!("# {title}\n\n{body}\n\n");
    if reason.is_empty() {
        page.push_str(">\n");
    }
    for line in reason.lines() {
        let _ = writeln!(page, "> {line}");
    }
    if offers_tls_bypass(kind) {
        let _ = writeln!(
            page,
            "\n=> {CONTROL_SCHEME}:ignore-tls Ignore the problem and load the page anyway"
        );
    }
    page
}

/// The plain-text page shown when a navigation attempt ends with `message`.
#[must_use]
pub fn message_page(message: &str) -> String {
    format!("An error happened:\n{message}")
}
