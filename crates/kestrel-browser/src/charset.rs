//! Charset normalization.
//!
//! Payloads are converted to UTF-8 in 4 KiB output chunks. A malformed or
//! truncated sequence is replaced by exactly one U+FFFD, exactly one input
//! byte is skipped from the start of the bad sequence, and decoding resumes
//! with a fresh decoder. Progress is guaranteed and the rest of the stream
//! is never dropped.

use encoding_rs::{DecoderResult, Encoding, UTF_8};
use kestrel_common::MimeType;

use crate::error::CharsetError;

/// Size of one output chunk in bytes.
pub const CHUNK_SIZE: usize = 4096;

/// Charset assumed when a content type does not declare one.
pub const DEFAULT_CHARSET: &str = "utf-8";

const REPLACEMENT: char = '\u{FFFD}';

/// True if `charset` names UTF-8 under any of its labels.
#[must_use]
pub fn is_utf8(charset: &str) -> bool {
    Encoding::for_label(charset.trim().as_bytes()) == Some(UTF_8)
}

/// True if a payload of this type must go through [`convert_to_utf8`]:
/// textual, non-empty and declared in a charset other than UTF-8.
#[must_use]
pub fn needs_conversion(mime: &MimeType, bytes: &[u8]) -> bool {
    mime.top_level == "text"
        && !bytes.is_empty()
        && !is_utf8(mime.parameter("charset", DEFAULT_CHARSET))
}

/// Convert `bytes` declared as `charset` to UTF-8.
///
/// # Errors
///
/// Returns [`CharsetError::UnsupportedCharset`] for unknown labels and
/// [`CharsetError::ConversionFailed`] when non-empty input yields no output.
pub fn convert_to_utf8(bytes: &[u8], charset: &str) -> Result<String, CharsetError> {
    let encoding = Encoding::for_label(charset.trim().as_bytes())
        .ok_or_else(|| CharsetError::UnsupportedCharset(charset.to_string()))?;

    let mut output = String::with_capacity(bytes.len());
    let mut chunk = String::with_capacity(CHUNK_SIZE);
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut input = bytes;

    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(input, &mut chunk, true);
        output.push_str(&chunk);
        chunk.clear();

        match result {
            DecoderResult::InputEmpty => break,
            // Full chunk: flush and keep going with the same decoder.
            DecoderResult::OutputFull => input = &input[read..],
            DecoderResult::Malformed(bad, extra) => {
                let consumed = usize::from(bad) + usize::from(extra);
                let start = read.saturating_sub(consumed);
                output.push(REPLACEMENT);
                input = input.get(start + 1..).unwrap_or_default();
                decoder = encoding.new_decoder_without_bom_handling();
            }
        }
    }

    if output.is_empty() && !bytes.is_empty() {
        return Err(CharsetError::ConversionFailed(charset.to_string()));
    }
    Ok(output)
}
