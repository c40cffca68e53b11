//! Session configuration.
//!
//! Every field has a default so partial JSON files load:
//!
//! ```json
//! { "max_redirections": 3, "protocols": { "gemini": true } }
//! ```

use std::collections::BTreeMap;

use kestrel_common::Location;
use serde::{Deserialize, Serialize};

use crate::prompt::Question;

/// Limit for consecutive redirects of one navigation.
pub const DEFAULT_MAX_REDIRECTIONS: u32 = 5;

/// When a redirect needs confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectPolicy {
    /// Ask for every redirect.
    pub warn_always: bool,
    /// Ask when the host changes.
    pub warn_on_host_change: bool,
    /// Ask when the scheme changes.
    pub warn_on_scheme_change: bool,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            warn_always: false,
            warn_on_host_change: true,
            warn_on_scheme_change: true,
        }
    }
}

impl RedirectPolicy {
    /// The confirmation a redirect from `from` to `to` requires, if any.
    #[must_use]
    pub fn question(&self, from: &Location, to: &Location) -> Option<Question> {
        let cross_protocol = from.is_cross_protocol(to);
        let cross_host = from.is_cross_host(to);
        let host = || to.host().unwrap_or_default().to_string();
        let scheme = || to.scheme().to_string();

        if self.warn_always {
            Some(Question::Redirect { target: to.clone() })
        } else if (self.warn_on_host_change || self.warn_on_scheme_change)
            && cross_protocol
            && cross_host
        {
            Some(Question::RedirectHostAndScheme {
                scheme: scheme(),
                host: host(),
            })
        } else if self.warn_on_scheme_change && cross_protocol {
            Some(Question::RedirectScheme { scheme: scheme() })
        } else if self.warn_on_host_change && cross_host {
            Some(Question::RedirectHost { host: host() })
        } else {
            None
        }
    }
}

/// How text documents are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDisplay {
    /// Render each dialect.
    #[default]
    Formatted,
    /// Show every text type as plain text.
    PlainText,
}

/// Whether a scheme may be navigated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeSupport {
    /// Handled and switched on.
    Enabled,
    /// Handled but switched off.
    Disabled,
    /// Not handled at all.
    Unsupported,
}

/// Options for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Consecutive redirects allowed per navigation.
    pub max_redirections: u32,
    /// When redirects need confirmation.
    pub redirection_policy: RedirectPolicy,
    /// Formatted or plain text display.
    pub text_display: TextDisplay,
    /// Hand links with unsupported schemes to the operating system.
    pub use_os_scheme_handler: bool,
    /// Scheme to enabled flag. Schemes not listed are unsupported.
    pub protocols: BTreeMap<String, bool>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        let protocols = ["about", "data", "file"]
            .into_iter()
            .map(|scheme| (scheme.to_string(), true))
            .collect();
        Self {
            max_redirections: DEFAULT_MAX_REDIRECTIONS,
            redirection_policy: RedirectPolicy::default(),
            text_display: TextDisplay::default(),
            use_os_scheme_handler: false,
            protocols,
        }
    }
}

impl SessionOptions {
    /// Support status of `scheme`.
    #[must_use]
    pub fn scheme_support(&self, scheme: &str) -> SchemeSupport {
        match self.protocols.get(scheme) {
            Some(true) => SchemeSupport::Enabled,
            Some(false) => SchemeSupport::Disabled,
            None => SchemeSupport::Unsupported,
        }
    }

    /// Schemes that are switched on.
    pub fn enabled_schemes(&self) -> impl Iterator<Item = &str> {
        self.protocols
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(scheme, _)| scheme.as_str())
    }

    /// Switch `scheme` on or off, adding it if unknown.
    pub fn set_protocol(&mut self, scheme: &str, enabled: bool) {
        let _ = self.protocols.insert(scheme.to_ascii_lowercase(), enabled);
    }
}
