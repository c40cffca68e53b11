//! Response dispatch.
//!
//! Maps a response (bytes plus declared content type) onto exactly one
//! outcome:
//!
//! ```text
//! text/*                  -> Document (dialect chosen by subtype)
//! image/*                 -> Media { Image }
//! video/*, audio/*        -> Media { Video | Audio }
//! anything else           -> Unsupported (a notice document)
//! ```

use kestrel_common::{Location, MimeType, size_human};
use kestrel_document::{Document, DocumentStyle};
use kestrel_markup::{Dialect, markdown};
use serde::Serialize;
use strum_macros::Display;
use tracing::debug;

use crate::charset::{DEFAULT_CHARSET, convert_to_utf8, needs_conversion};
use crate::error::DispatchError;

/// Switches that change how a response is dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Show the bytes unconverted (lossy UTF-8) if charset conversion fails.
    pub raw_fallback: bool,
    /// Render every `text/*` type as plain text.
    pub plaintext_only: bool,
}

/// A rendered text page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// The rendered document.
    pub document: Document,
    /// Dialect that rendered it.
    pub dialect: Dialect,
    /// True if the payload went through charset conversion.
    pub converted: bool,
}

/// Kind of opaque media payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// `audio/*`
    Audio,
}

/// A payload handed to the media layer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Media category.
    pub kind: MediaKind,
    /// Declared content type.
    pub mime: MimeType,
    /// Raw bytes.
    pub payload: Vec<u8>,
}

/// Result of dispatching a response.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// A text document.
    Document(RenderedPage),
    /// An image, video or audio payload.
    Media(MediaPayload),
    /// A notice naming a type that cannot be displayed.
    Unsupported(Document),
}

impl RenderOutcome {
    /// The displayable document, if this outcome has one.
    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        match self {
            Self::Document(page) => Some(&page.document),
            Self::Unsupported(document) => Some(document),
            Self::Media(_) => None,
        }
    }

    /// Short name of the outcome kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Media(_) => "media",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

/// Pick the dialect for a text type.
#[must_use]
pub fn select_dialect(mime: &MimeType, plaintext_only: bool) -> Dialect {
    if plaintext_only {
        return Dialect::PlainText;
    }
    match mime.subtype.as_str() {
        "gemini" => Dialect::Gemtext,
        "gophermap" => Dialect::Gophermap,
        "html" => Dialect::Html,
        "markdown" | "x-markdown" if markdown::AVAILABLE => Dialect::Markdown,
        // text/finger and every other subtype
        _ => Dialect::PlainText,
    }
}

/// Dispatch a response.
///
/// # Errors
///
/// Returns [`DispatchError::Charset`] if a text payload cannot be converted
/// to UTF-8 and `options.raw_fallback` is not set.
pub fn dispatch(
    bytes: &[u8],
    content_type: &str,
    root: &Location,
    style: &DocumentStyle,
    options: DispatchOptions,
) -> Result<RenderOutcome, DispatchError> {
    let mime = MimeType::parse(content_type);

    let media = match mime.top_level.as_str() {
        "text" => None,
        "image" => Some(MediaKind::Image),
        "video" => Some(MediaKind::Video),
        "audio" => Some(MediaKind::Audio),
        _ => {
            debug!(mime = %mime, "unsupported content type");
            return Ok(RenderOutcome::Unsupported(unsupported_notice(
                &mime,
                bytes.len(),
                root,
                style,
            )));
        }
    };
    if let Some(kind) = media {
        debug!(mime = %mime, %kind, "media payload");
        return Ok(RenderOutcome::Media(MediaPayload {
            kind,
            mime,
            payload: bytes.to_vec(),
        }));
    }

    // STEP 1: Normalize the encoding.
    let charset = mime.parameter("charset", DEFAULT_CHARSET);
    let (text, converted) = if needs_conversion(&mime, bytes) {
        match convert_to_utf8(bytes, charset) {
            Ok(text) => (text, true),
            Err(err) if options.raw_fallback => {
                debug!(%err, "displaying unconverted payload");
                (String::from_utf8_lossy(bytes).into_owned(), false)
            }
            Err(err) => return Err(err.into()),
        }
    } else {
        (String::from_utf8_lossy(bytes).into_owned(), false)
    };

    // STEP 2: Select and run the renderer.
    let dialect = select_dialect(&mime, options.plaintext_only);
    debug!(mime = %mime, %dialect, converted, "rendering text payload");
    Ok(RenderOutcome::Document(RenderedPage {
        document: dialect.render(&text, root, style),
        dialect,
        converted,
    }))
}

fn unsupported_notice(
    mime: &MimeType,
    size: usize,
    root: &Location,
    style: &DocumentStyle,
) -> Document {
    let size = u64::try_from(size).unwrap_or(u64::MAX);
    let text = format!(
        "You accessed an unsupported media type!\n\
         \n\
         Save the file to your local disk or navigate somewhere else. It cannot be displayed here.\n\
         \n\
         Info:\n\
         MIME Type: {}\n\
         File Size: {}\n",
        mime.essence(),
        size_human(size)
    );
    Dialect::Gemtext.render(&text, root, style)
}
