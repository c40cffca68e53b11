//! Client identities (TLS client certificates).

use std::fmt;

/// A client certificate bound to a session.
///
/// The certificate and key are opaque to the core; only the handler that
/// performs the TLS exchange interprets them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Name shown to the user.
    pub display_name: String,
    /// Certificate bytes.
    pub certificate: Vec<u8>,
    /// Private key bytes.
    pub private_key: Vec<u8>,
    /// Stored on disk (true) or generated for this session only (false).
    pub is_persistent: bool,
}

impl ClientIdentity {
    /// A transient identity that lives only as long as the session.
    #[must_use]
    pub fn transient(
        display_name: impl Into<String>,
        certificate: Vec<u8>,
        private_key: Vec<u8>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            certificate,
            private_key,
            is_persistent: false,
        }
    }

    /// Mark the identity as persistent.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.is_persistent = true;
        self
    }

    /// True if both certificate and key are present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.certificate.is_empty() && !self.private_key.is_empty()
    }
}

// Key material stays out of logs.
impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("display_name", &self.display_name)
            .field("certificate", &format_args!("{} bytes", self.certificate.len()))
            .field("private_key", &"<redacted>")
            .field("is_persistent", &self.is_persistent)
            .finish()
    }
}
