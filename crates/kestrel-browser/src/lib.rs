//! Navigation core for the Kestrel browser.
//!
//! # Scope
//!
//! Everything between a protocol handler's bytes and a rendered page:
//! - **Charset normalization** to UTF-8 ([`charset`])
//! - **Response dispatch** by media type ([`dispatch()`])
//! - **History** with a cursor ([`History`])
//! - **The session**, one tab's request state machine ([`Session`])
//! - **Local handlers** for `about:`, `data:` and `file:` ([`handlers`])
//!
//! Network protocols plug in through [`ProtocolHandler`]. The user is reached
//! only through [`Prompter`] and [`SessionObserver`].
//!
//! # Not Yet Implemented
//!
//! - Network handlers (gemini, gopher, finger, http)
//! - Persisting history across runs

/// Charset detection and conversion.
pub mod charset;
/// Media type dispatch.
pub mod dispatch;
/// Error types.
pub mod error;
/// Canned error pages.
pub mod error_pages;
/// Favourite locations.
pub mod favourites;
/// Protocol handler contract.
pub mod handler;
/// Built-in local handlers.
pub mod handlers;
/// Navigation history.
pub mod history;
/// Client identities.
pub mod identity;
/// Presentation callbacks.
pub mod observer;
/// Session configuration.
pub mod options;
/// User prompts.
pub mod prompt;
/// The navigation session.
pub mod session;

pub use dispatch::{
    DispatchOptions, MediaKind, MediaPayload, RenderOutcome, RenderedPage, dispatch,
    select_dialect,
};
pub use error::{CharsetError, DispatchError, NavigationError, SessionError};
pub use favourites::{Favourites, FavouritesStore, SharedFavourites};
pub use handler::{
    EventSink, HandlerEvent, NetworkErrorKind, ProtocolHandler, Request, RequestId,
    RequestOptions, TaggedEvent,
};
pub use history::{History, HistorySnapshot};
pub use identity::ClientIdentity;
pub use observer::{LoadStats, NullObserver, PageView, SessionObserver};
pub use options::{RedirectPolicy, SchemeSupport, SessionOptions, TextDisplay};
pub use prompt::{Notice, Prompter, Question};
pub use session::{Collaborators, LinkAction, PushMode, Session, SessionState};
