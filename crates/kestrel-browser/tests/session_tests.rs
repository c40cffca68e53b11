//! Tests for the navigation session, driven by a scripted handler and
//! recording prompter and observer.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use kestrel_browser::handlers::{AboutHandler, DataHandler, FileHandler};
use kestrel_browser::{
    ClientIdentity, Collaborators, EventSink, Favourites, HandlerEvent, LinkAction, LoadStats,
    NavigationError, NetworkErrorKind, Notice, PageView, Prompter, ProtocolHandler, PushMode,
    Question, Request, RequestOptions, Session, SessionError, SessionObserver, SessionOptions,
    SessionState, SharedFavourites, TaggedEvent,
};
use kestrel_common::Location;
use kestrel_document::DocumentStyle;

// ========== fakes ==========

/// What the scripted server answers and what it saw.
#[derive(Default)]
struct Server {
    scripts: HashMap<String, VecDeque<Vec<HandlerEvent>>>,
    requests: Vec<Request>,
    refuse_start: bool,
    refuse_cancel: bool,
    no_certificates: bool,
    certificate: Option<String>,
}

impl Server {
    fn script(&mut self, path: &str, events: Vec<HandlerEvent>) {
        self.scripts
            .entry(path.to_string())
            .or_default()
            .push_back(events);
    }
}

/// Gemini stand-in: replies from the script, or with `# <path>` once the
/// script for a path runs out.
struct ScriptedHandler {
    sink: Option<EventSink>,
    server: Rc<RefCell<Server>>,
    in_progress: bool,
}

impl ProtocolHandler for ScriptedHandler {
    fn supports_scheme(&self, scheme: &str) -> bool {
        scheme == "gemini"
    }

    fn attach(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    fn start_request(&mut self, request: Request) -> bool {
        let mut server = self.server.borrow_mut();
        server.requests.push(request.clone());
        if server.refuse_start {
            return false;
        }
        let path = request.location.path().to_string();
        let events = server
            .scripts
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                vec![HandlerEvent::Complete {
                    data: format!("# {path}\n").into_bytes(),
                    mime: "text/gemini".to_string(),
                }]
            });
        self.in_progress = events.is_empty();
        let sink = self.sink.as_ref().unwrap();
        for event in events {
            assert!(sink.send(request.id, event));
        }
        true
    }

    fn cancel_request(&mut self) -> bool {
        if self.server.borrow().refuse_cancel {
            return false;
        }
        self.in_progress = false;
        true
    }

    fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    fn enable_client_certificate(&mut self, identity: &ClientIdentity) -> bool {
        let mut server = self.server.borrow_mut();
        if server.no_certificates {
            return false;
        }
        server.certificate = Some(identity.display_name.clone());
        true
    }

    fn disable_client_certificate(&mut self) {
        self.server.borrow_mut().certificate = None;
    }
}

#[derive(Default)]
struct Dialogs {
    answers: VecDeque<bool>,
    inputs: VecDeque<String>,
    identity: Option<ClientIdentity>,
    questions: Vec<Question>,
    notices: Vec<Notice>,
}

struct RecordingPrompter(Rc<RefCell<Dialogs>>);

impl Prompter for RecordingPrompter {
    fn confirm(&mut self, question: &Question) -> bool {
        let mut dialogs = self.0.borrow_mut();
        dialogs.questions.push(question.clone());
        dialogs.answers.pop_front().unwrap_or(true)
    }

    fn input(&mut self, _prompt: &str) -> Option<String> {
        self.0.borrow_mut().inputs.pop_front()
    }

    fn select_identity(&mut self, _reason: &str) -> Option<ClientIdentity> {
        self.0.borrow().identity.clone()
    }

    fn notify(&mut self, notice: &Notice) {
        self.0.borrow_mut().notices.push(notice.clone());
    }
}

#[derive(Default)]
struct Seen {
    titles: Vec<String>,
    locations: Vec<String>,
    stops: usize,
    last_stats: Option<LoadStats>,
}

struct RecordingObserver(Rc<RefCell<Seen>>);

impl SessionObserver for RecordingObserver {
    fn page_loaded(&mut self, page: &PageView) {
        self.0.borrow_mut().titles.push(page.title());
    }

    fn progress(&mut self, stats: &LoadStats) {
        self.0.borrow_mut().last_stats = Some(stats.clone());
    }

    fn location_changed(&mut self, location: &Location) {
        self.0.borrow_mut().locations.push(location.to_string());
    }

    fn stop_media(&mut self) {
        self.0.borrow_mut().stops += 1;
    }
}

struct Harness {
    session: Session,
    server: Rc<RefCell<Server>>,
    dialogs: Rc<RefCell<Dialogs>>,
    seen: Rc<RefCell<Seen>>,
}

fn options() -> SessionOptions {
    let mut options = SessionOptions::default();
    options.set_protocol("gemini", true);
    options.set_protocol("gopher", false);
    options
}

fn harness_with(options: SessionOptions) -> Harness {
    let server = Rc::new(RefCell::new(Server::default()));
    let dialogs = Rc::new(RefCell::new(Dialogs::default()));
    let seen = Rc::new(RefCell::new(Seen::default()));
    let favourites: SharedFavourites = Favourites::new().shared();

    let handlers: Vec<Box<dyn ProtocolHandler>> = vec![
        Box::new(ScriptedHandler {
            sink: None,
            server: Rc::clone(&server),
            in_progress: false,
        }),
        Box::new(AboutHandler::new().with_favourites(Rc::clone(&favourites))),
        Box::new(DataHandler::new()),
        Box::new(FileHandler::new()),
    ];
    let collaborators = Collaborators {
        prompter: Box::new(RecordingPrompter(Rc::clone(&dialogs))),
        observer: Box::new(RecordingObserver(Rc::clone(&seen))),
        favourites,
    };
    let session = Session::new(options, DocumentStyle::default(), handlers, collaborators).unwrap();
    Harness {
        session,
        server,
        dialogs,
        seen,
    }
}

fn harness() -> Harness {
    harness_with(options())
}

fn loc(path: &str) -> Location {
    Location::parse(&format!("gemini://host{path}")).unwrap()
}

fn visit(h: &mut Harness, path: &str) {
    h.session.navigate(loc(path), PushMode::Immediate).unwrap();
    let _ = h.session.pump_events();
}

fn page_text(session: &Session) -> String {
    session
        .page()
        .and_then(|page| page.outcome.document())
        .map(|document| document.plain_text())
        .unwrap_or_default()
}

fn complete(text: &str, mime: &str) -> Vec<HandlerEvent> {
    vec![HandlerEvent::Complete {
        data: text.as_bytes().to_vec(),
        mime: mime.to_string(),
    }]
}

fn redirect(to: &str) -> Vec<HandlerEvent> {
    vec![HandlerEvent::Redirected {
        location: Location::parse(to).unwrap(),
        permanent: false,
    }]
}

// ========== construction ==========

#[test]
fn test_enabled_scheme_without_handler_is_rejected() {
    let mut options = options();
    options.set_protocol("finger", true);
    let collaborators = Collaborators {
        prompter: Box::new(RecordingPrompter(Rc::default())),
        observer: Box::new(RecordingObserver(Rc::default())),
        favourites: Favourites::new().shared(),
    };
    let handlers: Vec<Box<dyn ProtocolHandler>> = vec![Box::new(AboutHandler::new())];
    let result = Session::new(options, DocumentStyle::default(), handlers, collaborators);
    assert!(matches!(result, Err(SessionError::MissingHandler(_))));
}

#[test]
fn test_fresh_session() {
    let h = harness();
    assert_eq!(h.session.state(), SessionState::Idle);
    assert_eq!(h.session.location_string(), "");
    assert!(h.session.page().is_none());
    assert!(h.session.history().is_empty());
}

// ========== navigation ==========

#[test]
fn test_navigate_installs_page() {
    let mut h = harness();
    visit(&mut h, "/index");

    let session = &h.session;
    assert_eq!(session.state(), SessionState::Completed);
    assert!(session.successfully_loaded());
    assert_eq!(session.location_string(), "gemini://host/index");
    assert_eq!(session.history().entries(), [loc("/index")]);
    assert_eq!(session.current_mime().unwrap().essence(), "text/gemini");
    assert_eq!(session.payload(), b"# /index\n");
    assert_eq!(session.stats().size, 9);
    assert!(session.active_request().is_none());
    assert!(!session.is_internal_location());

    let seen = h.seen.borrow();
    assert_eq!(seen.titles, ["/index"]);
    assert_eq!(seen.locations, ["gemini://host/index"]);
    assert_eq!(seen.stops, 1);
    assert_eq!(seen.last_stats.as_ref().unwrap().size, 9);
}

#[test]
fn test_disabled_and_unsupported_schemes_change_nothing() {
    let mut h = harness();
    visit(&mut h, "/index");

    let gopher = Location::parse("gopher://host/").unwrap();
    assert_eq!(
        h.session.navigate(gopher, PushMode::Immediate),
        Err(NavigationError::SchemeDisabled("gopher".to_string()))
    );
    let ftp = Location::parse("ftp://host/").unwrap();
    assert_eq!(
        h.session.navigate(ftp, PushMode::Immediate),
        Err(NavigationError::UnsupportedScheme("ftp".to_string()))
    );

    assert_eq!(h.session.location(), Some(&loc("/index")));
    assert_eq!(h.session.history().len(), 1);
    assert_eq!(h.session.state(), SessionState::Completed);
}

#[test]
fn test_refused_cancel_keeps_location() {
    let mut h = harness();
    h.server.borrow_mut().script("/slow", Vec::new());
    visit(&mut h, "/slow");
    assert_eq!(h.session.state(), SessionState::Requesting);
    assert!(h.session.is_in_progress());

    h.server.borrow_mut().refuse_cancel = true;
    assert_eq!(
        h.session.navigate(loc("/other"), PushMode::Immediate),
        Err(NavigationError::CancelFailed)
    );
    assert_eq!(h.session.location(), Some(&loc("/slow")));
    assert_eq!(h.session.history().entries(), [loc("/slow")]);
}

#[test]
fn test_refused_dispatch_fails() {
    let mut h = harness();
    h.server.borrow_mut().refuse_start = true;
    let result = h.session.navigate(loc("/index"), PushMode::Immediate);
    assert_eq!(result, Err(NavigationError::RequestDispatchFailed(loc("/index"))));
    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(h.session.history().is_empty());
}

#[test]
fn test_refused_dispatch_after_load_clears_loaded_flag() {
    let mut h = harness();
    visit(&mut h, "/index");
    assert!(h.session.successfully_loaded());

    h.server.borrow_mut().refuse_start = true;
    let result = h.session.navigate(loc("/x"), PushMode::Immediate);
    assert_eq!(result, Err(NavigationError::RequestDispatchFailed(loc("/x"))));
    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(!h.session.successfully_loaded());
    assert_eq!(h.session.history().entries(), [loc("/index")]);
}

#[test]
fn test_stale_events_are_ignored() {
    let mut h = harness();
    h.server.borrow_mut().script("/slow", Vec::new());
    visit(&mut h, "/slow");
    let stale = h.session.active_request().unwrap();

    visit(&mut h, "/fast");
    let late = TaggedEvent {
        request: stale,
        event: HandlerEvent::Complete {
            data: b"# Late".to_vec(),
            mime: "text/gemini".to_string(),
        },
    };
    assert!(!h.session.handle_event(late));
    assert_eq!(h.session.page().unwrap().title(), "/fast");
}

#[test]
fn test_stop() {
    let mut h = harness();
    h.server.borrow_mut().script("/slow", Vec::new());
    visit(&mut h, "/slow");

    assert!(h.session.stop());
    assert_eq!(h.session.state(), SessionState::Idle);
    assert!(h.session.active_request().is_none());
    assert!(!h.session.is_in_progress());
}

#[test]
fn test_request_ids_increase() {
    let mut h = harness();
    h.server.borrow_mut().script("/a", Vec::new());
    h.server.borrow_mut().script("/b", Vec::new());
    visit(&mut h, "/a");
    let first = h.session.active_request().unwrap();
    visit(&mut h, "/b");
    let second = h.session.active_request().unwrap();
    assert!(second > first);
}

// ========== history ==========

#[test]
fn test_back_and_forward() {
    let mut h = harness();
    visit(&mut h, "/a");
    visit(&mut h, "/b");

    assert!(h.session.go_back().unwrap());
    let _ = h.session.pump_events();
    assert_eq!(h.session.location(), Some(&loc("/a")));
    assert_eq!(h.session.history().cursor(), Some(0));
    assert!(h.session.page().unwrap().history.can_go_forward);
    assert!(!h.session.go_back().unwrap());

    assert!(h.session.go_forward().unwrap());
    let _ = h.session.pump_events();
    assert_eq!(h.session.location(), Some(&loc("/b")));
    assert_eq!(h.session.history().len(), 2);
}

#[test]
fn test_navigate_after_back_truncates() {
    let mut h = harness();
    visit(&mut h, "/a");
    visit(&mut h, "/b");
    assert!(h.session.go_back().unwrap());
    let _ = h.session.pump_events();

    visit(&mut h, "/c");
    assert_eq!(h.session.history().entries(), [loc("/a"), loc("/c")]);
    assert!(!h.session.history().can_go_forward());
}

#[test]
fn test_reload_does_not_push() {
    let mut h = harness();
    assert!(!h.session.reload().unwrap());
    visit(&mut h, "/a");
    assert!(h.session.reload().unwrap());
    let _ = h.session.pump_events();
    assert_eq!(h.session.history().len(), 1);
    assert_eq!(h.server.borrow().requests.len(), 2);
}

// ========== redirects ==========

#[test]
fn test_redirect_same_host_is_followed() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/old", redirect("gemini://host/new"));
    visit(&mut h, "/old");

    assert_eq!(h.session.state(), SessionState::Completed);
    assert_eq!(h.session.location(), Some(&loc("/new")));
    assert_eq!(h.session.redirections(), 1);
    assert_eq!(h.session.history().entries(), [loc("/old")]);
    assert!(h.dialogs.borrow().questions.is_empty());
}

#[test]
fn test_redirect_after_load_pushes_final_location() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/old", redirect("gemini://host/new"));
    h.session.navigate(loc("/old"), PushMode::AfterLoad).unwrap();
    assert!(h.session.history().is_empty());
    let _ = h.session.pump_events();

    assert_eq!(h.session.history().entries(), [loc("/new")]);
}

#[test]
fn test_redirect_limit() {
    let mut h = harness();
    for _ in 0..10 {
        h.server
            .borrow_mut()
            .script("/loop", redirect("gemini://host/loop"));
    }
    visit(&mut h, "/loop");

    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(!h.session.successfully_loaded());
    assert_eq!(h.session.redirections(), 5);
    // The initial request plus five followed redirects.
    assert_eq!(h.server.borrow().requests.len(), 6);
    assert!(page_text(&h.session).contains("Too many consecutive redirections"));
}

#[test]
fn test_redirect_counter_resets_on_navigate() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/old", redirect("gemini://host/new"));
    visit(&mut h, "/old");
    assert_eq!(h.session.redirections(), 1);
    visit(&mut h, "/plain");
    assert_eq!(h.session.redirections(), 0);
}

#[test]
fn test_cross_host_redirect_declined() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/old", redirect("gemini://other/x"));
    h.dialogs.borrow_mut().answers.push_back(false);
    visit(&mut h, "/old");

    assert_eq!(
        h.dialogs.borrow().questions,
        [Question::RedirectHost {
            host: "other".to_string()
        }]
    );
    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(page_text(&h.session).contains("cancelled by user"));
    assert_eq!(h.server.borrow().requests.len(), 1);
}

#[test]
fn test_redirect_to_disabled_scheme_fails() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/old", redirect("gopher://host/"));
    visit(&mut h, "/old");

    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(page_text(&h.session).contains("Redirection to gopher://host/ failed"));
}

// ========== input ==========

#[test]
fn test_input_becomes_query() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/search",
        vec![HandlerEvent::InputRequired {
            prompt: "Query?".to_string(),
        }],
    );
    h.dialogs
        .borrow_mut()
        .inputs
        .push_back("hello world".to_string());
    visit(&mut h, "/search");

    assert_eq!(h.session.state(), SessionState::Completed);
    assert_eq!(
        h.session.location_string(),
        "gemini://host/search?hello%20world"
    );
    assert_eq!(h.session.history().entries(), [loc("/search")]);
}

#[test]
fn test_input_too_long_is_asked_again() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/search",
        vec![HandlerEvent::InputRequired {
            prompt: "Query?".to_string(),
        }],
    );
    {
        let mut dialogs = h.dialogs.borrow_mut();
        dialogs.inputs.push_back("x".repeat(2000));
        dialogs.inputs.push_back("ok".to_string());
    }
    visit(&mut h, "/search");

    assert!(matches!(
        h.dialogs.borrow().notices.as_slice(),
        [Notice::InputTooLong { max: 1020, .. }]
    ));
    assert_eq!(h.session.location().unwrap().query(), Some("ok"));
}

#[test]
fn test_input_cancelled() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/search",
        vec![HandlerEvent::InputRequired {
            prompt: "Query?".to_string(),
        }],
    );
    visit(&mut h, "/search");

    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(page_text(&h.session).contains("Site requires input:"));
}

// ========== content ==========

#[test]
fn test_charset_fallback_accepted() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/raw", complete("abc", "text/plain; charset=klingon-8"));
    visit(&mut h, "/raw");

    assert_eq!(
        h.dialogs.borrow().questions,
        [Question::DisplayUnconverted {
            charset: "klingon-8".to_string()
        }]
    );
    assert_eq!(h.session.state(), SessionState::Completed);
    assert_eq!(page_text(&h.session), "abc");
}

#[test]
fn test_charset_fallback_declined() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/raw", complete("abc", "text/plain; charset=klingon-8"));
    h.dialogs.borrow_mut().answers.push_back(false);
    visit(&mut h, "/raw");

    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(!h.session.successfully_loaded());
    assert!(page_text(&h.session).contains("Failed to convert input charset klingon-8"));
}

#[test]
fn test_media_outcome() {
    let mut h = harness();
    h.server
        .borrow_mut()
        .script("/cat.png", complete("png", "image/png"));
    visit(&mut h, "/cat.png");

    let page = h.session.page().unwrap();
    assert_eq!(page.outcome.kind(), "media");
    assert_eq!(page.title(), "gemini://host/cat.png");
}

#[test]
fn test_plaintext_display_option() {
    let mut options = options();
    options.text_display = kestrel_browser::TextDisplay::PlainText;
    let mut h = harness_with(options);
    visit(&mut h, "/index");
    assert_eq!(page_text(&h.session), "# /index");
}

// ========== errors and control links ==========

#[test]
fn test_network_error_page() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/bad",
        vec![HandlerEvent::NetworkError {
            kind: NetworkErrorKind::UntrustedHost,
            reason: "self-signed".to_string(),
        }],
    );
    visit(&mut h, "/bad");

    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(!h.session.successfully_loaded());
    assert!(h.session.is_internal_location());
    assert!(h.session.page().unwrap().internal);
    let text = page_text(&h.session);
    assert!(text.contains("Untrusted host"), "{text}");
    assert!(text.contains("self-signed"), "{text}");

    let action = h.session.activate_link("kestrel+ctrl:ignore-tls").unwrap();
    assert_eq!(action, LinkAction::ControlHandled);
    assert_eq!(h.dialogs.borrow().questions, [Question::IgnoreTlsErrors]);
    let server = h.server.borrow();
    let last = server.requests.last().unwrap();
    assert_eq!(last.location, loc("/bad"));
    assert_eq!(last.options, RequestOptions::IgnoreTlsErrors);
}

#[test]
fn test_network_error_reason_cannot_add_links() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/slow",
        vec![HandlerEvent::NetworkError {
            kind: NetworkErrorKind::Timeout,
            reason: "gave up\n=> kestrel+ctrl:ignore-tls Continue\r\n=> gemini://evil/ x".to_string(),
        }],
    );
    visit(&mut h, "/slow");

    assert!(h.session.is_internal_location());
    let page = h.session.page().unwrap();
    let document = page.outcome.document().unwrap();
    assert!(document.links().is_empty(), "{:?}", document.links());
    let text = page_text(&h.session);
    assert!(text.contains("=> kestrel+ctrl:ignore-tls Continue"), "{text}");
}

#[test]
fn test_network_error_after_load_is_not_pushed() {
    let mut h = harness();
    visit(&mut h, "/index");
    h.server.borrow_mut().script(
        "/gone",
        vec![HandlerEvent::NetworkError {
            kind: NetworkErrorKind::ResourceNotFound,
            reason: "missing".to_string(),
        }],
    );
    h.session.navigate(loc("/gone"), PushMode::AfterLoad).unwrap();
    let _ = h.session.pump_events();

    assert_eq!(h.session.state(), SessionState::Failed);
    assert_eq!(h.session.location(), Some(&loc("/gone")));
    assert_eq!(h.session.history().entries(), [loc("/index")]);
}

#[test]
fn test_forged_control_link() {
    let mut h = harness();
    visit(&mut h, "/index");

    let action = h.session.activate_link("kestrel+ctrl:ignore-tls").unwrap();
    assert_eq!(action, LinkAction::RejectedForgedControl);
    assert_eq!(
        h.dialogs.borrow().notices,
        [Notice::ForgedControl {
            host: "host".to_string()
        }]
    );
    assert_eq!(h.server.borrow().requests.len(), 1);
}

#[test]
fn test_link_to_enabled_scheme() {
    let mut h = harness();
    visit(&mut h, "/dir/index");
    let action = h.session.activate_link("next").unwrap();
    assert_eq!(action, LinkAction::Navigated(loc("/dir/next")));
    let _ = h.session.pump_events();
    assert_eq!(h.session.history().len(), 2);
}

#[test]
fn test_link_to_disabled_and_unknown_schemes() {
    let mut h = harness();
    visit(&mut h, "/index");

    let gopher = Location::parse("gopher://host/").unwrap();
    assert_eq!(
        h.session.activate_link("gopher://host/").unwrap(),
        LinkAction::Refused(gopher.clone())
    );
    let mailto = Location::parse("mailto:me@host").unwrap();
    assert_eq!(
        h.session.activate_link("mailto:me@host").unwrap(),
        LinkAction::Refused(mailto.clone())
    );
    assert_eq!(
        h.dialogs.borrow().notices,
        [
            Notice::SchemeDisabled { location: gopher },
            Notice::UnsupportedScheme { location: mailto },
        ]
    );
}

#[test]
fn test_link_to_os_handler() {
    let mut options = options();
    options.use_os_scheme_handler = true;
    let mut h = harness_with(options);
    visit(&mut h, "/index");

    let mailto = Location::parse("mailto:me@host").unwrap();
    assert_eq!(
        h.session.activate_link("mailto:me@host").unwrap(),
        LinkAction::OpenExternally(mailto)
    );
    assert!(h.dialogs.borrow().notices.is_empty());
}

#[test]
fn test_invalid_link() {
    let mut h = harness();
    let result = h.session.activate_link("not a url");
    assert_eq!(
        result,
        Err(NavigationError::InvalidLink("not a url".to_string()))
    );
}

// ========== client certificates ==========

fn identity() -> ClientIdentity {
    ClientIdentity::transient("me", vec![1], vec![2])
}

#[test]
fn test_certificate_required_and_supplied() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/private",
        vec![HandlerEvent::CertificateRequired {
            reason: "members only".to_string(),
        }],
    );
    h.dialogs.borrow_mut().identity = Some(identity());
    visit(&mut h, "/private");

    assert_eq!(h.session.state(), SessionState::Completed);
    assert!(h.session.client_certificate_enabled());
    assert_eq!(h.session.identity().unwrap().display_name, "me");
    assert_eq!(h.server.borrow().certificate.as_deref(), Some("me"));
    assert_eq!(h.server.borrow().requests.len(), 2);
}

#[test]
fn test_certificate_required_but_missing() {
    let mut h = harness();
    h.server.borrow_mut().script(
        "/private",
        vec![HandlerEvent::CertificateRequired {
            reason: "members only".to_string(),
        }],
    );
    visit(&mut h, "/private");

    assert_eq!(h.session.state(), SessionState::Failed);
    assert!(!h.session.client_certificate_enabled());
    assert!(page_text(&h.session).contains("members only"));
}

#[test]
fn test_invalid_identity_is_reported() {
    let mut h = harness();
    h.dialogs.borrow_mut().identity = Some(ClientIdentity::transient("broken", Vec::new(), vec![2]));
    assert!(!h.session.enable_client_certificate());
    assert_eq!(h.dialogs.borrow().notices, [Notice::InvalidIdentity]);
}

#[test]
fn test_certificate_host_change_declined() {
    let mut h = harness();
    visit(&mut h, "/index");
    h.dialogs.borrow_mut().identity = Some(identity());
    assert!(h.session.set_client_certificate_enabled(true));

    h.dialogs.borrow_mut().answers.push_back(false);
    let other = Location::parse("gemini://other/").unwrap();
    h.session.navigate(other, PushMode::Immediate).unwrap();

    assert_eq!(
        h.dialogs.borrow().questions,
        [Question::KeepCertificate {
            host: "other".to_string()
        }]
    );
    assert!(!h.session.client_certificate_enabled());
    assert_eq!(h.server.borrow().certificate, None);
}

#[test]
fn test_certificate_unsupported_by_handler() {
    let mut h = harness();
    visit(&mut h, "/index");
    h.dialogs.borrow_mut().identity = Some(identity());
    assert!(h.session.enable_client_certificate());
    h.server.borrow_mut().no_certificates = true;

    h.dialogs.borrow_mut().answers.push_back(false);
    let result = h.session.navigate(loc("/next"), PushMode::Immediate);
    assert_eq!(
        result,
        Err(NavigationError::CredentialDeclined("gemini".to_string()))
    );
    assert_eq!(h.session.location(), Some(&loc("/index")));
    assert!(h.session.client_certificate_enabled());
}

#[test]
fn test_reset_transient_identity_asks_first() {
    let mut h = harness();
    h.dialogs.borrow_mut().identity = Some(identity());
    assert!(h.session.enable_client_certificate());

    h.dialogs.borrow_mut().answers.push_back(false);
    assert!(!h.session.reset_client_certificate());
    assert!(h.session.client_certificate_enabled());

    assert!(h.session.reset_client_certificate());
    assert!(!h.session.client_certificate_enabled());
    assert!(h.session.identity().is_none());
    assert_eq!(
        h.dialogs.borrow().questions,
        [Question::DropTransientIdentity, Question::DropTransientIdentity]
    );
}

#[test]
fn test_reset_persistent_identity_does_not_ask() {
    let mut h = harness();
    h.dialogs.borrow_mut().identity = Some(identity().persistent());
    assert!(h.session.enable_client_certificate());
    assert!(!h.session.set_client_certificate_enabled(false));
    assert!(h.dialogs.borrow().questions.is_empty());
}

// ========== favourites and local pages ==========

#[test]
fn test_toggle_favourite() {
    let mut h = harness();
    assert!(!h.session.toggle_favourite());
    visit(&mut h, "/a");

    assert!(h.session.toggle_favourite());
    assert!(h.session.is_favourite());

    let favourites = Location::parse("about:favourites").unwrap();
    h.session.navigate(favourites, PushMode::Immediate).unwrap();
    let _ = h.session.pump_events();
    assert!(h.session.is_internal_location());
    assert!(page_text(&h.session).contains("gemini://host/a"));

    visit(&mut h, "/a");
    assert!(!h.session.toggle_favourite());
    assert!(!h.session.is_favourite());
}

#[test]
fn test_data_location() {
    let mut h = harness();
    let data = Location::parse("data:text/plain,hello").unwrap();
    h.session.navigate(data, PushMode::Immediate).unwrap();
    let _ = h.session.pump_events();
    assert_eq!(h.session.state(), SessionState::Completed);
    assert_eq!(page_text(&h.session), "hello");
}
