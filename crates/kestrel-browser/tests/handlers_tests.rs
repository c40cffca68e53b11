//! Tests for the built-in local handlers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use kestrel_browser::handlers::{AboutHandler, DataHandler, FileHandler, mime_for_path};
use kestrel_browser::{
    ClientIdentity, EventSink, Favourites, HandlerEvent, NetworkErrorKind,
    ProtocolHandler, Request, RequestId, RequestOptions, TaggedEvent,
};
use kestrel_common::Location;
use url::Url;

fn request(location: Location) -> Request {
    Request {
        id: RequestId::default().next(),
        location,
        options: RequestOptions::Default,
    }
}

fn serve(handler: &mut dyn ProtocolHandler, location: &str) -> Vec<HandlerEvent> {
    let (sink, events) = EventSink::channel();
    handler.attach(sink);
    let location = Location::parse(location).unwrap();
    assert!(handler.supports_scheme(location.scheme()));
    assert!(handler.start_request(request(location)));
    drain(&events)
}

fn drain(events: &Receiver<TaggedEvent>) -> Vec<HandlerEvent> {
    events.try_iter().map(|tagged| tagged.event).collect()
}

fn completed(events: &[HandlerEvent]) -> (String, &str) {
    match events.last() {
        Some(HandlerEvent::Complete { data, mime }) => {
            (String::from_utf8_lossy(data).into_owned(), mime.as_str())
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

fn failure(events: &[HandlerEvent]) -> NetworkErrorKind {
    match events {
        [HandlerEvent::NetworkError { kind, .. }] => *kind,
        other => panic!("expected one network error, got {other:?}"),
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kestrel-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn file_url(path: &Path) -> String {
    Url::from_file_path(path).unwrap().to_string()
}

// ========== about ==========

#[test]
fn test_about_pages() {
    let mut handler = AboutHandler::new();

    let events = serve(&mut handler, "about:blank");
    assert!(matches!(events[0], HandlerEvent::Progress { transferred: 0 }));
    assert_eq!(completed(&events), (String::new(), "text/gemini"));

    let events = serve(&mut handler, "about:help");
    assert!(completed(&events).0.starts_with("# Kestrel"));

    let events = serve(&mut handler, "about:version");
    assert!(completed(&events).0.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_about_unknown_page() {
    let mut handler = AboutHandler::new();
    let events = serve(&mut handler, "about:nothing");
    assert_eq!(failure(&events), NetworkErrorKind::ResourceNotFound);
}

#[test]
fn test_about_favourites() {
    let favourites = Favourites::new().shared();
    let mut handler = AboutHandler::new().with_favourites(favourites.clone());

    let events = serve(&mut handler, "about:favourites");
    assert!(completed(&events).0.contains("No favourites yet."));

    let location = Location::parse("gemini://host/page").unwrap();
    assert!(favourites.borrow_mut().add(&location));
    let events = serve(&mut handler, "about:favourites");
    assert!(completed(&events).0.contains("=> gemini://host/page"));
}

#[test]
fn test_local_handlers_refuse_certificates() {
    let identity = ClientIdentity::transient("me", vec![1], vec![2]);
    assert!(!AboutHandler::new().enable_client_certificate(&identity));
    assert!(!DataHandler::new().enable_client_certificate(&identity));
    assert!(!FileHandler::new().enable_client_certificate(&identity));
}

#[test]
fn test_unattached_handler_cannot_start() {
    let mut handler = AboutHandler::new();
    let location = Location::parse("about:blank").unwrap();
    assert!(!handler.start_request(request(location)));
}

// ========== data ==========

#[test]
fn test_data_url() {
    let mut handler = DataHandler::new();
    let events = serve(&mut handler, "data:text/gemini;base64,IyBIaQ==");
    let (text, mime) = completed(&events);
    assert_eq!(text, "# Hi");
    assert!(mime.starts_with("text/gemini"), "{mime}");
}

#[test]
fn test_malformed_data_url() {
    let mut handler = DataHandler::new();
    let events = serve(&mut handler, "data:text/plain;base64");
    assert_eq!(failure(&events), NetworkErrorKind::BadRequest);
}

// ========== file ==========

#[test]
fn test_mime_for_path() {
    assert_eq!(mime_for_path(Path::new("a/index.gmi")), "text/gemini");
    assert_eq!(mime_for_path(Path::new("README.MD")), "text/markdown");
    assert_eq!(mime_for_path(Path::new("page.htm")), "text/html");
    assert_eq!(mime_for_path(Path::new("song.mp3")), "audio/mpeg");
    assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
}

#[test]
fn test_file_contents() {
    let dir = scratch_dir("file");
    let path = dir.join("hello.gmi");
    fs::write(&path, "# Hello\n").unwrap();

    let mut handler = FileHandler::new();
    let events = serve(&mut handler, &file_url(&path));
    assert_eq!(completed(&events), ("# Hello\n".to_string(), "text/gemini"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_directory_listing() {
    let dir = scratch_dir("listing");
    fs::write(dir.join("b.txt"), "b").unwrap();
    fs::create_dir(dir.join("a")).unwrap();

    let mut handler = FileHandler::new();
    let events = serve(&mut handler, &file_url(&dir));
    let (text, mime) = completed(&events);
    assert_eq!(mime, "text/gemini");
    assert!(text.starts_with("# Index of "), "{text}");
    let a_url = Url::from_directory_path(dir.join("a")).unwrap().to_string();
    let a = text.find(&format!("=> {a_url} a/")).unwrap();
    let b = text.find(&format!("=> {} b.txt", file_url(&dir.join("b.txt")))).unwrap();
    assert!(a < b, "{text}");
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file() {
    let dir = scratch_dir("missing");
    let mut handler = FileHandler::new();
    let events = serve(&mut handler, &file_url(&dir.join("nope.txt")));
    assert_eq!(failure(&events), NetworkErrorKind::ResourceNotFound);
    fs::remove_dir_all(&dir).unwrap();
}
