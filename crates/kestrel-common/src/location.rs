//! Resource locations.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! A [`Location`] is an immutable, parsed resource address. Navigation never
//! mutates a location in place: resolving a link or attaching a query
//! produces a new value that replaces the old one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Pseudo-scheme used by locally generated pages to trigger browser actions
/// (for example "ignore TLS errors and retry").
pub const CONTROL_SCHEME: &str = "kestrel+ctrl";

/// Error produced when a string cannot be parsed or resolved as a location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location '{input}': {source}")]
pub struct LocationError {
    /// The rejected input.
    pub input: String,
    /// Underlying parse failure.
    #[source]
    pub source: url::ParseError,
}

/// A parsed resource address: scheme, host, path, query and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Url);

impl Location {
    /// Parse an absolute location.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if `input` is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        Url::parse(input.trim()).map(Self).map_err(|source| LocationError {
            input: input.to_string(),
            source,
        })
    }

    /// [URL Standard § 4.3](https://url.spec.whatwg.org/#concept-basic-url-parser)
    ///
    /// Resolve a potentially relative reference against this location.
    ///
    /// STEP 1: "If url is an absolute URL, return url."
    ///
    /// STEP 2: "Otherwise, resolve url relative to base."
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if the reference is malformed, or if it is
    /// relative and this location cannot act as a base (`about:`, `data:`).
    pub fn resolve(&self, reference: &str) -> Result<Self, LocationError> {
        self.0
            .join(reference.trim())
            .map(Self)
            .map_err(|source| LocationError {
                input: reference.to_string(),
                source,
            })
    }

    /// Copy of this location with its query replaced by `query`.
    ///
    /// The text is percent-encoded as required by the query component.
    #[must_use]
    pub fn with_query(&self, query: &str) -> Self {
        let mut url = self.0.clone();
        url.set_query(Some(query));
        Self(url)
    }

    /// Copy of this location without its fragment.
    #[must_use]
    pub fn without_fragment(&self) -> Self {
        let mut url = self.0.clone();
        url.set_fragment(None);
        Self(url)
    }

    /// The scheme, lowercase, without the trailing `:`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// The host, if the location has an authority.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// The explicit port, if any.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.0.port()
    }

    /// The path component (percent-encoded).
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// The query component, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.0.query()
    }

    /// The fragment, without the leading `#`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.0.fragment()
    }

    /// The fully encoded string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The underlying URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// True if `other` lives on a different host.
    #[must_use]
    pub fn is_cross_host(&self, other: &Self) -> bool {
        self.host() != other.host()
    }

    /// True if `other` uses a different scheme.
    #[must_use]
    pub fn is_cross_protocol(&self, other: &Self) -> bool {
        self.scheme() != other.scheme()
    }

    /// True for the browser's own control pseudo-scheme.
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.scheme() == CONTROL_SCHEME
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
