//! Modal prompts the session needs answered.
//!
//! The session never talks to the user directly. Everything it needs to ask
//! or tell goes through an injected [`Prompter`]; the texts come from the
//! [`Display`](std::fmt::Display) impls here so every front end words them
//! the same way.

use std::fmt;

use kestrel_common::Location;

use crate::identity::ClientIdentity;

/// A yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// Redirect confirmation under the always-warn policy.
    Redirect {
        /// Redirect target.
        target: Location,
    },
    /// Redirect to another host with another scheme.
    RedirectHostAndScheme {
        /// New scheme.
        scheme: String,
        /// New host.
        host: String,
    },
    /// Redirect to another scheme.
    RedirectScheme {
        /// New scheme.
        scheme: String,
    },
    /// Redirect to another host.
    RedirectHost {
        /// New host.
        host: String,
    },
    /// The handler for this scheme cannot use client certificates.
    ProceedWithoutCertificate {
        /// Scheme of the request.
        scheme: String,
    },
    /// Keep the client certificate while visiting a new host.
    KeepCertificate {
        /// The new host.
        host: String,
    },
    /// Charset conversion failed; show the bytes anyway.
    DisplayUnconverted {
        /// Declared charset.
        charset: String,
    },
    /// Retry the current location ignoring TLS errors.
    IgnoreTlsErrors,
    /// Drop a transient identity that cannot be restored.
    DropTransientIdentity,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect { target } => write!(
                f,
                "The location you visited wants to redirect you to another location:\n\
                 {target}\n\
                 Do you want to allow the redirection?"
            ),
            Self::RedirectHostAndScheme { scheme, host } => write!(
                f,
                "The location you visited wants to redirect you to another host and switch the protocol.\n\
                 Protocol: {scheme}\n\
                 New Host: {host}\n\
                 Do you want to allow the redirection?"
            ),
            Self::RedirectScheme { scheme } => write!(
                f,
                "The location you visited wants to switch the protocol.\n\
                 Protocol: {scheme}\n\
                 Do you want to allow the redirection?"
            ),
            Self::RedirectHost { host } => write!(
                f,
                "The location you visited wants to redirect you to another host.\n\
                 New Host: {host}\n\
                 Do you want to allow the redirection?"
            ),
            Self::ProceedWithoutCertificate { scheme } => write!(
                f,
                "You requested a {scheme} location with a client certificate, \
                 but these are not supported for this scheme. Continue?"
            ),
            Self::KeepCertificate { host } => write!(
                f,
                "You want to visit a new host ({host}) with a client certificate enabled. \
                 This may expose your identity to another host.\n\
                 Do you want to keep the certificate enabled?"
            ),
            Self::DisplayUnconverted { charset } => write!(
                f,
                "Failed to convert input charset {charset} to UTF-8. Cannot display the file.\n\
                 Do you want to display unconverted data anyways?"
            ),
            Self::IgnoreTlsErrors => f.write_str(
                "The certificate of this site could not be verified! This may be a \
                 man-in-the-middle attack, or a configuration mistake by the server admin.\n\
                 Are you sure you want to continue?",
            ),
            Self::DropTransientIdentity => f.write_str(
                "You currently have a transient session active!\n\
                 If you disable the session, you will not be able to restore it. Continue?",
            ),
        }
    }
}

/// A message that needs no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Input would make the request line too long.
    InputTooLong {
        /// Encoded length of the resulting location.
        length: usize,
        /// Exclusive upper bound.
        max: usize,
    },
    /// A non-internal page used the control scheme.
    ForgedControl {
        /// Host of the offending page.
        host: String,
    },
    /// A link points at a disabled scheme.
    SchemeDisabled {
        /// Link target.
        location: Location,
    },
    /// A link points at a scheme nobody handles.
    UnsupportedScheme {
        /// Link target.
        location: Location,
    },
    /// The selected identity lacks a certificate or key.
    InvalidIdentity,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputTooLong { length, max } => write!(
                f,
                "Your input message is too long. Your input is {length} bytes, \
                 but a maximum of {max} bytes are allowed.\n\
                 Please cancel or shorten your input."
            ),
            Self::ForgedControl { host } => write!(
                f,
                "Malicious site detected! {host} tries to use the browser control scheme!\n\
                 A trustworthy site does not do this!"
            ),
            Self::SchemeDisabled { location } => write!(
                f,
                "The requested location uses a scheme that has been disabled in the settings:\n\
                 {location}"
            ),
            Self::UnsupportedScheme { location } => {
                write!(f, "The requested location cannot be processed:\n{location}")
            }
            Self::InvalidIdentity => f.write_str("Failed to use the selected client identity."),
        }
    }
}

/// Front end for everything that needs the user.
pub trait Prompter {
    /// Ask a yes/no question.
    fn confirm(&mut self, question: &Question) -> bool;

    /// Ask for a line of text; `None` if the user cancelled.
    fn input(&mut self, prompt: &str) -> Option<String>;

    /// Ask the user to pick or create a client identity.
    fn select_identity(&mut self, reason: &str) -> Option<ClientIdentity>;

    /// Show a message.
    fn notify(&mut self, notice: &Notice);
}
