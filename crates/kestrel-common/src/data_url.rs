//! `data:` URL decoding.
//!
//! [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397)
//!
//! ```text
//! dataurl    := "data:" [ mediatype ] [ ";base64" ] "," data
//! mediatype  := [ type "/" subtype ] *( ";" parameter )
//! ```

use base64::Engine;

use crate::mime::MimeType;

/// Media type assumed when a `data:` URL omits one.
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

/// Errors produced while decoding a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUrlError {
    /// The input does not start with `data:`.
    #[error("not a data URL")]
    NotDataUrl,
    /// No `,` separates the metadata from the payload.
    #[error("invalid data URL: missing comma")]
    MissingComma,
    /// The payload is flagged `;base64` but does not decode.
    #[error("base64 decode error: {0}")]
    Base64(String),
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type (defaults to [`DEFAULT_MEDIA_TYPE`]).
    pub mime: MimeType,
    /// Decoded payload bytes.
    pub payload: Vec<u8>,
}

impl DataUrl {
    /// Decode a full `data:` URL string.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError`] if the prefix or separator is missing, or
    /// if a base64 payload is malformed.
    pub fn parse(raw: &str) -> Result<Self, DataUrlError> {
        let rest = raw
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("data:"))
            .map(|_| &raw[5..])
            .ok_or(DataUrlError::NotDataUrl)?;

        // STEP 1: Split metadata from payload at the first comma.
        let (metadata, data) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

        // STEP 2: Detect and strip the base64 marker.
        let (media, is_base64) = match metadata.len().checked_sub(7) {
            Some(at) if metadata[at..].eq_ignore_ascii_case(";base64") => (&metadata[..at], true),
            _ => (metadata, false),
        };

        // STEP 3: Decode the payload.
        let payload = if is_base64 {
            let compact: String = percent_decode(data)
                .into_iter()
                .filter(|b| !b.is_ascii_whitespace())
                .map(char::from)
                .collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| DataUrlError::Base64(e.to_string()))?
        } else {
            percent_decode(data)
        };

        // STEP 4: An empty media type (";charset=..." included) falls back
        // to text/plain.
        let mime = if media.trim().is_empty() {
            MimeType::parse(DEFAULT_MEDIA_TYPE)
        } else if media.trim_start().starts_with(';') {
            MimeType::parse(&format!("text/plain{media}"))
        } else {
            MimeType::parse(media)
        };

        Ok(Self { mime, payload })
    }
}

/// Decode `%XX` escapes, leaving malformed escapes untouched.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).and_then(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
            });
            if let Some(byte) = hex {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
