//! The navigation session.
//!
//! A [`Session`] owns one tab's navigation state and drives every request
//! through its lifecycle:
//!
//! ```text
//!            navigate                 complete
//!   Idle ─────────────▶ Requesting ─────────────▶ Completed
//!     ▲                   │  │  ▲
//!     │ stop              │  │  │ redirected / input / certificate
//!     └───────────────────┘  │  └──────────────── (re-dispatch)
//!                            ▼
//!                          Failed  (dispatch failure, error pages)
//! ```
//!
//! Handlers report through the session's event queue; the caller drains it
//! with [`Session::pump_events`]. Each dispatch gets a fresh [`RequestId`],
//! and events carrying any other id are dropped.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use kestrel_common::{Location, MimeType};
use kestrel_document::DocumentStyle;
use kestrel_markup::{Dialect, plaintext};
use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, info, warn};

use crate::charset::DEFAULT_CHARSET;
use crate::dispatch::{DispatchOptions, RenderOutcome, RenderedPage, dispatch};
use crate::error::{DispatchError, NavigationError, SessionError};
use crate::error_pages::{error_page, message_page};
use crate::favourites::SharedFavourites;
use crate::handler::{
    EventSink, HandlerEvent, NetworkErrorKind, ProtocolHandler, Request, RequestId,
    RequestOptions, TaggedEvent,
};
use crate::history::History;
use crate::identity::ClientIdentity;
use crate::observer::{LoadStats, PageView, SessionObserver};
use crate::options::{SchemeSupport, SessionOptions, TextDisplay};
use crate::prompt::{Notice, Prompter, Question};

/// Locations whose encoded form reaches this length are refused as input
/// targets; line-based protocols cap the request line at 1024 bytes
/// including the trailing CRLF.
pub const MAX_REQUEST_LENGTH: usize = 1020;

/// Where a session is in the request lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
pub enum SessionState {
    /// Nothing running.
    #[default]
    Idle,
    /// A request is in flight.
    Requesting,
    /// The last request installed a page.
    Completed,
    /// The last attempt failed.
    Failed,
}

/// When a navigation is recorded in history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushMode {
    /// Push the requested location right away.
    #[default]
    Immediate,
    /// Push the final location once a page is installed.
    AfterLoad,
    /// Leave history alone (back/forward, reload, input).
    Never,
}

/// What activating a link did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// A navigation to the target started.
    Navigated(Location),
    /// A control action from an internal page was handled.
    ControlHandled,
    /// A non-internal page tried to use the control scheme.
    RejectedForgedControl,
    /// The target should go to the operating system's handler.
    OpenExternally(Location),
    /// The target's scheme is disabled or unsupported.
    Refused(Location),
}

/// Collaborators injected into a session.
pub struct Collaborators {
    /// Answers questions and shows notices.
    pub prompter: Box<dyn Prompter>,
    /// Receives pages and progress.
    pub observer: Box<dyn SessionObserver>,
    /// Favourite locations.
    pub favourites: SharedFavourites,
}

/// One tab's navigation state machine.
pub struct Session {
    options: SessionOptions,
    style: DocumentStyle,
    handlers: Vec<Box<dyn ProtocolHandler>>,
    current_handler: Option<usize>,
    events: Receiver<TaggedEvent>,
    prompter: Box<dyn Prompter>,
    observer: Box<dyn SessionObserver>,
    favourites: SharedFavourites,

    history: History,
    state: SessionState,
    location: Option<Location>,
    mime: Option<MimeType>,
    payload: Vec<u8>,
    page: Option<PageView>,
    stats: LoadStats,
    started: Instant,
    redirections: u32,
    push_mode: PushMode,
    is_internal: bool,
    successfully_loaded: bool,

    identity: Option<ClientIdentity>,
    certificate_enabled: bool,

    last_request: RequestId,
    active_request: Option<RequestId>,
}

impl Session {
    /// Create a session and register `handlers`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingHandler`] if a scheme enabled in
    /// `options` has no handler.
    pub fn new(
        options: SessionOptions,
        style: DocumentStyle,
        mut handlers: Vec<Box<dyn ProtocolHandler>>,
        collaborators: Collaborators,
    ) -> Result<Self, SessionError> {
        if let Some(scheme) = options
            .enabled_schemes()
            .find(|scheme| !handlers.iter().any(|handler| handler.supports_scheme(scheme)))
        {
            return Err(SessionError::MissingHandler(scheme.to_string()));
        }

        let (sink, events) = EventSink::channel();
        for handler in &mut handlers {
            handler.attach(sink.clone());
        }

        Ok(Self {
            options,
            style,
            handlers,
            current_handler: None,
            events,
            prompter: collaborators.prompter,
            observer: collaborators.observer,
            favourites: collaborators.favourites,
            history: History::new(),
            state: SessionState::Idle,
            location: None,
            mime: None,
            payload: Vec::new(),
            page: None,
            stats: LoadStats::default(),
            started: Instant::now(),
            redirections: 0,
            push_mode: PushMode::Never,
            is_internal: false,
            successfully_loaded: false,
            identity: None,
            certificate_enabled: false,
            last_request: RequestId::default(),
            active_request: None,
        })
    }

    // ---------- navigation ----------

    /// Navigate to `location`.
    ///
    /// # Errors
    ///
    /// - [`NavigationError::SchemeDisabled`] / [`NavigationError::UnsupportedScheme`]
    ///   before anything changes
    /// - [`NavigationError::CancelFailed`] if the running request refuses to
    ///   stop; location and history stay as they are
    /// - [`NavigationError::CredentialDeclined`] if the user declines to
    ///   continue without a certificate
    /// - [`NavigationError::RequestDispatchFailed`] if the handler refuses the
    ///   request; the session is left [`Failed`](SessionState::Failed) and
    ///   [`successfully_loaded`](Self::successfully_loaded) is cleared
    pub fn navigate(&mut self, location: Location, mode: PushMode) -> Result<(), NavigationError> {
        self.check_scheme(&location)?;
        self.cancel_active()?;

        info!(%location, ?mode, "navigate");
        if let Err(err) = self.start_request(&location, RequestOptions::Default) {
            warn!(%location, %err, "navigation failed");
            return Err(err);
        }

        // Handlers only queue events, so nothing has been handled yet.
        self.redirections = 0;
        self.successfully_loaded = false;
        self.started = Instant::now();
        self.push_mode = mode;
        if mode == PushMode::Immediate {
            let _ = self.history.push(location);
        }
        Ok(())
    }

    /// Step back in history.
    ///
    /// Returns `Ok(false)` if there is nothing to go back to.
    ///
    /// # Errors
    ///
    /// As [`navigate`](Self::navigate); the cursor only moves on success.
    pub fn go_back(&mut self) -> Result<bool, NavigationError> {
        match self.history.one_backward() {
            Some(index) => self.navigate_history(index),
            None => Ok(false),
        }
    }

    /// Step forward in history.
    ///
    /// # Errors
    ///
    /// As [`go_back`](Self::go_back).
    pub fn go_forward(&mut self) -> Result<bool, NavigationError> {
        match self.history.one_forward() {
            Some(index) => self.navigate_history(index),
            None => Ok(false),
        }
    }

    fn navigate_history(&mut self, index: usize) -> Result<bool, NavigationError> {
        let Some(location) = self.history.get(index).cloned() else {
            return Ok(false);
        };
        self.navigate(location, PushMode::Never)?;
        let _ = self.history.set_cursor(index);
        Ok(true)
    }

    /// Load the current location again without touching history.
    ///
    /// # Errors
    ///
    /// As [`navigate`](Self::navigate).
    pub fn reload(&mut self) -> Result<bool, NavigationError> {
        let Some(location) = self.location.clone() else {
            return Ok(false);
        };
        self.navigate(location, PushMode::Never)?;
        Ok(true)
    }

    /// Follow `href` from the current page.
    ///
    /// Control-scheme links are honored only on internal pages. Links to
    /// schemes that are not enabled are refused, or handed to the operating
    /// system if the options allow it.
    ///
    /// # Errors
    ///
    /// [`NavigationError::InvalidLink`] if `href` does not resolve, plus
    /// anything [`navigate`](Self::navigate) returns.
    pub fn activate_link(&mut self, href: &str) -> Result<LinkAction, NavigationError> {
        let target = match &self.location {
            Some(current) => current.resolve(href),
            None => Location::parse(href),
        }
        .map_err(|_| NavigationError::InvalidLink(href.to_string()))?;

        if target.is_control() {
            return self.control_action(&target);
        }

        match self.options.scheme_support(target.scheme()) {
            SchemeSupport::Enabled => {
                self.navigate(target.clone(), PushMode::Immediate)?;
                Ok(LinkAction::Navigated(target))
            }
            _ if self.options.use_os_scheme_handler => Ok(LinkAction::OpenExternally(target)),
            SchemeSupport::Disabled => {
                self.prompter.notify(&Notice::SchemeDisabled {
                    location: target.clone(),
                });
                Ok(LinkAction::Refused(target))
            }
            SchemeSupport::Unsupported => {
                self.prompter.notify(&Notice::UnsupportedScheme {
                    location: target.clone(),
                });
                Ok(LinkAction::Refused(target))
            }
        }
    }

    fn control_action(&mut self, target: &Location) -> Result<LinkAction, NavigationError> {
        if !self.is_internal {
            let host = self
                .location
                .as_ref()
                .and_then(Location::host)
                .unwrap_or_default()
                .to_string();
            warn!(%target, %host, "page tried to use the control scheme");
            self.prompter.notify(&Notice::ForgedControl { host });
            return Ok(LinkAction::RejectedForgedControl);
        }

        match target.path() {
            "ignore-tls" => {
                if self.prompter.confirm(&Question::IgnoreTlsErrors) {
                    let current = self.location.clone().ok_or(NavigationError::NoLocation)?;
                    info!(location = %current, "retrying ignoring TLS errors");
                    self.start_request(&current, RequestOptions::IgnoreTlsErrors)?;
                }
            }
            action => warn!(action, "unknown control action"),
        }
        Ok(LinkAction::ControlHandled)
    }

    /// Cancel the running request. Late events from it are ignored.
    ///
    /// Returns `false` if the handler refused to cancel.
    pub fn stop(&mut self) -> bool {
        let cancelled = self
            .current_handler
            .and_then(|index| self.handlers.get_mut(index))
            .is_none_or(|handler| handler.cancel_request());
        self.active_request = None;
        if self.state == SessionState::Requesting {
            self.state = if cancelled {
                SessionState::Idle
            } else {
                SessionState::Failed
            };
        }
        info!(cancelled, "stop");
        cancelled
    }

    fn check_scheme(&self, location: &Location) -> Result<(), NavigationError> {
        let scheme = location.scheme();
        match self.options.scheme_support(scheme) {
            SchemeSupport::Enabled => Ok(()),
            SchemeSupport::Disabled => Err(NavigationError::SchemeDisabled(scheme.to_string())),
            SchemeSupport::Unsupported => {
                Err(NavigationError::UnsupportedScheme(scheme.to_string()))
            }
        }
    }

    fn cancel_active(&mut self) -> Result<(), NavigationError> {
        let refused = self
            .current_handler
            .and_then(|index| self.handlers.get_mut(index))
            .is_some_and(|handler| !handler.cancel_request());
        if refused {
            warn!("running request refused to cancel");
            return Err(NavigationError::CancelFailed);
        }
        self.active_request = None;
        if self.state == SessionState::Requesting {
            self.state = SessionState::Idle;
        }
        Ok(())
    }

    /// Select a handler, bind the credential and dispatch `location` under a
    /// fresh request id.
    fn start_request(
        &mut self,
        location: &Location,
        options: RequestOptions,
    ) -> Result<(), NavigationError> {
        let index = self
            .handlers
            .iter()
            .position(|handler| handler.supports_scheme(location.scheme()))
            .ok_or_else(|| NavigationError::MissingHandler(location.scheme().to_string()))?;

        self.bind_credential(index, location)?;

        self.last_request = self.last_request.next();
        let id = self.last_request;
        self.current_handler = Some(index);
        let request = Request {
            id,
            location: location.clone(),
            options,
        };
        if !self.handlers[index].start_request(request) {
            self.active_request = None;
            self.successfully_loaded = false;
            self.state = SessionState::Failed;
            return Err(NavigationError::RequestDispatchFailed(location.clone()));
        }

        debug!(request = %id, %location, "request started");
        self.active_request = Some(id);
        self.is_internal = location.scheme() == "about";
        self.location = Some(location.clone());
        self.state = SessionState::Requesting;
        self.observer.location_changed(location);
        Ok(())
    }

    fn bind_credential(&mut self, index: usize, location: &Location) -> Result<(), NavigationError> {
        let identity = self
            .identity
            .as_ref()
            .filter(|identity| self.certificate_enabled && identity.is_valid())
            .cloned();
        let Some(identity) = identity else {
            self.handlers[index].disable_client_certificate();
            return Ok(());
        };

        if !self.handlers[index].enable_client_certificate(&identity) {
            let scheme = location.scheme().to_string();
            if !self.prompter.confirm(&Question::ProceedWithoutCertificate {
                scheme: scheme.clone(),
            }) {
                return Err(NavigationError::CredentialDeclined(scheme));
            }
            self.handlers[index].disable_client_certificate();
            self.certificate_enabled = false;
            return Ok(());
        }

        let host_changed = self.location.as_ref().and_then(Location::host) != location.host();
        if host_changed {
            let question = Question::KeepCertificate {
                host: location.host().unwrap_or_default().to_string(),
            };
            if !self.prompter.confirm(&question) {
                debug!(%location, "client certificate dropped for new host");
                self.handlers[index].disable_client_certificate();
                self.certificate_enabled = false;
            }
        }
        Ok(())
    }

    // ---------- handler events ----------

    /// Drain and handle every queued handler event. Returns the number of
    /// events that belonged to the active request.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.handle_event(event) {
                handled += 1;
            }
        }
        handled
    }

    /// Handle one event. Returns `false` if it came from a stale request.
    pub fn handle_event(&mut self, tagged: TaggedEvent) -> bool {
        if self.active_request != Some(tagged.request) {
            debug!(request = %tagged.request, "ignoring event from stale request");
            return false;
        }

        let result = match tagged.event {
            HandlerEvent::Progress { transferred } => {
                self.progress(transferred);
                Ok(())
            }
            HandlerEvent::Complete { data, mime } => self.request_complete(data, &mime),
            HandlerEvent::Redirected {
                location,
                permanent,
            } => self.redirected(location, permanent),
            HandlerEvent::InputRequired { prompt } => self.input_required(&prompt),
            HandlerEvent::CertificateRequired { reason } => self.certificate_required(&reason),
            HandlerEvent::NetworkError { kind, reason } => self.network_error(kind, &reason),
        };
        if let Err(err) = result {
            warn!(%err, "navigation ended");
        }
        true
    }

    /// The running request transferred `transferred` bytes so far.
    pub fn progress(&mut self, transferred: u64) {
        self.stats = LoadStats {
            size: transferred,
            mime: None,
            elapsed: self.started.elapsed(),
        };
        self.observer.progress(&self.stats);
    }

    /// The running request finished with `data` of type `content_type`.
    ///
    /// # Errors
    ///
    /// [`NavigationError::CharsetDeclined`] if conversion failed and the user
    /// chose not to see the raw bytes; an error page is installed instead.
    pub fn request_complete(
        &mut self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), NavigationError> {
        self.observer.stop_media();
        let location = self.location.clone().ok_or(NavigationError::NoLocation)?;
        let mime = MimeType::parse(content_type);
        info!(%location, mime = %mime.essence(), size = data.len(), "request complete");

        let style = self.style.derive(location.host());
        let mut options = DispatchOptions {
            raw_fallback: false,
            plaintext_only: self.options.text_display == TextDisplay::PlainText,
        };
        let outcome = match dispatch(&data, content_type, &location, &style, options) {
            Ok(outcome) => outcome,
            Err(DispatchError::Charset(err)) => {
                let charset = mime.parameter("charset", DEFAULT_CHARSET).to_string();
                warn!(%err, "charset conversion failed");
                let question = Question::DisplayUnconverted {
                    charset: charset.clone(),
                };
                if !self.prompter.confirm(&question) {
                    self.show_error(&format!("Failed to convert input charset {charset} to UTF-8."));
                    return Err(NavigationError::CharsetDeclined(charset));
                }
                options.raw_fallback = true;
                match dispatch(&data, content_type, &location, &style, options) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        self.show_error(&err.to_string());
                        return Err(NavigationError::CharsetDeclined(charset));
                    }
                }
            }
        };

        self.active_request = None;
        if self.push_mode == PushMode::AfterLoad {
            let _ = self.history.push(location.clone());
            self.push_mode = PushMode::Never;
        }
        self.install_page(location, outcome, data, mime);
        self.successfully_loaded = true;
        self.state = SessionState::Completed;
        Ok(())
    }

    /// The server redirected the running request to `target`.
    ///
    /// # Errors
    ///
    /// [`NavigationError::TooManyRedirects`] once the limit is reached (the
    /// redirect is not followed), [`NavigationError::RedirectCancelled`] if
    /// the user declines, or whatever dispatching the target returns. Each
    /// failure installs an error page.
    pub fn redirected(&mut self, target: Location, permanent: bool) -> Result<(), NavigationError> {
        debug!(%target, permanent, count = self.redirections, "redirected");
        if self.redirections >= self.options.max_redirections {
            self.show_error(&format!(
                "Too many consecutive redirections. The last redirection would have redirected you to:\n{target}"
            ));
            return Err(NavigationError::TooManyRedirects(target));
        }

        let current = self.location.clone().ok_or(NavigationError::NoLocation)?;
        let declined = self
            .options
            .redirection_policy
            .question(&current, &target)
            .is_some_and(|question| !self.prompter.confirm(&question));
        if declined {
            self.show_error(&format!("Redirection to {target} cancelled by user"));
            return Err(NavigationError::RedirectCancelled(target));
        }

        let started = self
            .check_scheme(&target)
            .and_then(|()| self.start_request(&target, RequestOptions::Default));
        if let Err(err) = started {
            self.show_error(&format!("Redirection to {target} failed: {err}"));
            return Err(err);
        }
        self.redirections += 1;
        Ok(())
    }

    /// The server wants a line of input for the current location.
    ///
    /// The answer becomes the query of the current location, which is then
    /// loaded without a history entry. Answers that would make the location
    /// [`MAX_REQUEST_LENGTH`] bytes or longer are refused and asked again.
    ///
    /// # Errors
    ///
    /// [`NavigationError::InputCancelled`] if the user cancels, or anything
    /// [`navigate`](Self::navigate) returns.
    pub fn input_required(&mut self, prompt: &str) -> Result<(), NavigationError> {
        let current = self.location.clone().ok_or(NavigationError::NoLocation)?;
        loop {
            let Some(text) = self.prompter.input(prompt) else {
                self.show_error(&format!("Site requires input:\n{prompt}"));
                return Err(NavigationError::InputCancelled(prompt.to_string()));
            };
            let target = current.with_query(&text);
            let length = target.as_str().len();
            if length < MAX_REQUEST_LENGTH {
                return self.navigate(target, PushMode::Never);
            }
            self.prompter.notify(&Notice::InputTooLong {
                length,
                max: MAX_REQUEST_LENGTH,
            });
        }
    }

    /// The server wants a client certificate.
    ///
    /// # Errors
    ///
    /// [`NavigationError::CertificateMissing`] if no valid identity was
    /// supplied, or anything [`navigate`](Self::navigate) returns.
    pub fn certificate_required(&mut self, reason: &str) -> Result<(), NavigationError> {
        if self.try_set_client_certificate(reason) {
            let current = self.location.clone().ok_or(NavigationError::NoLocation)?;
            return self.navigate(current, PushMode::Never);
        }
        self.show_error(&format!(
            "The page requested an authorized client certificate, but none was provided.\nOriginal query was: {reason}"
        ));
        Err(NavigationError::CertificateMissing(reason.to_string()))
    }

    /// The running request failed in transport; show the matching page.
    ///
    /// # Errors
    ///
    /// [`NavigationError::NoLocation`] if no request was ever started.
    pub fn network_error(
        &mut self,
        kind: NetworkErrorKind,
        reason: &str,
    ) -> Result<(), NavigationError> {
        warn!(%kind, reason, "network error");
        self.is_internal = true;
        // Error pages never take a deferred history slot.
        if self.push_mode == PushMode::AfterLoad {
            self.push_mode = PushMode::Never;
        }
        self.request_complete(error_page(kind, reason).into_bytes(), "text/gemini")?;
        self.successfully_loaded = false;
        self.state = SessionState::Failed;
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        warn!(message, "showing error page");
        self.active_request = None;
        self.successfully_loaded = false;
        self.state = SessionState::Failed;
        let Some(location) = self.location.clone() else {
            return;
        };

        let text = message_page(message);
        let style = self.style.derive(location.host());
        let outcome = RenderOutcome::Document(RenderedPage {
            document: plaintext::render(&text, &style),
            dialect: Dialect::PlainText,
            converted: false,
        });
        self.install_page(
            location,
            outcome,
            text.into_bytes(),
            MimeType::parse("text/plain; charset=utf-8"),
        );
    }

    fn install_page(
        &mut self,
        location: Location,
        outcome: RenderOutcome,
        payload: Vec<u8>,
        mime: MimeType,
    ) {
        self.stats = LoadStats {
            size: u64::try_from(payload.len()).unwrap_or(u64::MAX),
            mime: Some(mime.clone()),
            elapsed: self.started.elapsed(),
        };
        self.mime = Some(mime);
        self.payload = payload;

        let page = PageView {
            location,
            outcome,
            stats: self.stats.clone(),
            history: self.history.snapshot(),
            internal: self.is_internal,
        };
        self.observer.progress(&self.stats);
        self.observer.page_loaded(&page);
        self.page = Some(page);
    }

    // ---------- client certificates ----------

    fn try_set_client_certificate(&mut self, reason: &str) -> bool {
        match self.prompter.select_identity(reason) {
            None => {
                for handler in &mut self.handlers {
                    handler.disable_client_certificate();
                }
                self.certificate_enabled = false;
                false
            }
            Some(identity) if !identity.is_valid() => {
                self.prompter.notify(&Notice::InvalidIdentity);
                self.certificate_enabled = false;
                false
            }
            Some(identity) => {
                info!(name = %identity.display_name, "client certificate enabled");
                self.identity = Some(identity);
                self.certificate_enabled = true;
                true
            }
        }
    }

    /// Ask the user for an identity and use it for following requests.
    pub fn enable_client_certificate(&mut self) -> bool {
        self.try_set_client_certificate("")
    }

    /// Drop the identity. A transient identity cannot be restored, so the
    /// user is asked first; returns `false` if they keep it.
    pub fn reset_client_certificate(&mut self) -> bool {
        let transient = self
            .identity
            .as_ref()
            .is_some_and(|identity| identity.is_valid() && !identity.is_persistent);
        if transient && !self.prompter.confirm(&Question::DropTransientIdentity) {
            return false;
        }
        self.identity = None;
        self.certificate_enabled = false;
        for handler in &mut self.handlers {
            handler.disable_client_certificate();
        }
        true
    }

    /// Switch the client certificate on or off. Returns the resulting state.
    pub fn set_client_certificate_enabled(&mut self, enabled: bool) -> bool {
        if enabled {
            let _ = self.enable_client_certificate();
        } else {
            let _ = self.reset_client_certificate();
        }
        self.certificate_enabled
    }

    // ---------- favourites ----------

    /// Add or remove the current location. Returns the new membership.
    pub fn toggle_favourite(&mut self) -> bool {
        let Some(location) = &self.location else {
            return false;
        };
        let mut store = self.favourites.borrow_mut();
        if store.contains(location) {
            let _ = store.remove(location);
            false
        } else {
            let _ = store.add(location);
            true
        }
    }

    /// True if the current location is a favourite.
    #[must_use]
    pub fn is_favourite(&self) -> bool {
        self.location
            .as_ref()
            .is_some_and(|location| self.favourites.borrow().contains(location))
    }

    // ---------- accessors ----------

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Current location.
    #[must_use]
    pub const fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Current location as a string, empty before the first navigation.
    #[must_use]
    pub fn location_string(&self) -> String {
        self.location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Navigation history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// The installed page.
    #[must_use]
    pub const fn page(&self) -> Option<&PageView> {
        self.page.as_ref()
    }

    /// Type of the installed page.
    #[must_use]
    pub const fn current_mime(&self) -> Option<&MimeType> {
        self.mime.as_ref()
    }

    /// Raw bytes of the installed page.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Latest load statistics.
    #[must_use]
    pub const fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Redirects followed during the current navigation.
    #[must_use]
    pub const fn redirections(&self) -> u32 {
        self.redirections
    }

    /// True while showing a locally generated page.
    #[must_use]
    pub const fn is_internal_location(&self) -> bool {
        self.is_internal
    }

    /// True once the current navigation installed its page.
    #[must_use]
    pub const fn successfully_loaded(&self) -> bool {
        self.successfully_loaded
    }

    /// True if requests carry the client certificate.
    #[must_use]
    pub const fn client_certificate_enabled(&self) -> bool {
        self.certificate_enabled
    }

    /// The bound identity.
    #[must_use]
    pub const fn identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }

    /// Id of the request in flight.
    #[must_use]
    pub const fn active_request(&self) -> Option<RequestId> {
        self.active_request
    }

    /// True while the current handler is working.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.current_handler
            .and_then(|index| self.handlers.get(index))
            .is_some_and(|handler| handler.is_in_progress())
    }

    /// Session options.
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Replace the document style used for following loads.
    pub fn set_style(&mut self, style: DocumentStyle) {
        self.style = style;
    }
}
