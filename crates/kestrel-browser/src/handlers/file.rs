//! `file:` locations.
//!
//! Files are served with a MIME type guessed from the extension;
//! directories are listed as gemtext so every entry is a link.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use url::Url;

use super::{LocalSink, complete};
use crate::handler::{EventSink, HandlerEvent, NetworkErrorKind, ProtocolHandler, Request};
use crate::identity::ClientIdentity;

/// Content type for a file, by extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "gmi" | "gemini" => "text/gemini",
        "gophermap" => "text/gophermap",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" | "xhtml" => "text/html",
        "txt" | "text" | "log" | "rs" | "toml" | "c" | "h" => "text/plain",
        "css" => "text/css",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn error_kind(err: &io::Error) -> NetworkErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => NetworkErrorKind::ResourceNotFound,
        io::ErrorKind::PermissionDenied => NetworkErrorKind::Unauthorized,
        _ => NetworkErrorKind::Unknown,
    }
}

/// Reads local files and directories.
#[derive(Debug, Default)]
pub struct FileHandler {
    sink: LocalSink,
}

impl FileHandler {
    /// New handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn load(path: &Path) -> io::Result<(Vec<u8>, &'static str)> {
        if path.is_dir() {
            return Ok((Self::listing(path)?.into_bytes(), "text/gemini"));
        }
        Ok((fs::read(path)?, mime_for_path(path)))
    }

    fn listing(path: &Path) -> io::Result<String> {
        let mut names: Vec<(String, bool)> = fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| {
                let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
                (entry.file_name().to_string_lossy().into_owned(), is_dir)
            })
            .collect();
        names.sort();

        let mut page = format!("# Index of {}\n\n", path.display());
        if let Some(parent) = path.parent().and_then(|p| Url::from_directory_path(p).ok()) {
            let _ = writeln!(page, "=> {parent} ..");
        }
        for (name, is_dir) in names {
            let entry = path.join(&name);
            let target = if is_dir {
                Url::from_directory_path(&entry)
            } else {
                Url::from_file_path(&entry)
            };
            let Ok(target) = target else {
                continue;
            };
            let slash = if is_dir { "/" } else { "" };
            let _ = writeln!(page, "=> {target} {name}{slash}");
        }
        Ok(page)
    }
}

impl ProtocolHandler for FileHandler {
    fn supports_scheme(&self, scheme: &str) -> bool {
        scheme == "file"
    }

    fn attach(&mut self, sink: EventSink) {
        self.sink.attach(sink);
    }

    fn start_request(&mut self, request: Request) -> bool {
        let Ok(path) = request.location.as_url().to_file_path() else {
            return self.sink.reply(
                &request,
                vec![HandlerEvent::NetworkError {
                    kind: NetworkErrorKind::BadRequest,
                    reason: format!("{} is not a local path", request.location),
                }],
            );
        };
        let events = match Self::load(&path) {
            Ok((data, mime)) => complete(data, mime),
            Err(err) => vec![HandlerEvent::NetworkError {
                kind: error_kind(&err),
                reason: format!("{}: {err}", path.display()),
            }],
        };
        self.sink.reply(&request, events)
    }

    fn cancel_request(&mut self) -> bool {
        true
    }

    fn is_in_progress(&self) -> bool {
        false
    }

    fn enable_client_certificate(&mut self, _identity: &ClientIdentity) -> bool {
        false
    }

    fn disable_client_certificate(&mut self) {}
}
