//! Common utilities for the Kestrel browser core.
//!
//! This crate provides shared infrastructure used by all browser components:
//! - **Locations** - parsed resource addresses and relative resolution
//! - **MIME types** - content type parsing with parameters
//! - **Data URLs** - decoding of inline `data:` payloads
//! - **Sizes** - human-readable byte counts for notices and statistics
//! - **Warning System** - deduplicated diagnostics for unsupported input

/// Inline `data:` URL decoding.
pub mod data_url;
/// Parsed resource locations.
pub mod location;
/// MIME type parsing.
pub mod mime;
/// Human-readable byte sizes.
pub mod size;
/// Deduplicated warnings.
pub mod warning;

pub use data_url::{DataUrl, DataUrlError};
pub use location::{CONTROL_SCHEME, Location, LocationError};
pub use mime::MimeType;
pub use size::size_human;
