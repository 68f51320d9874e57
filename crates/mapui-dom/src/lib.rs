#![forbid(unsafe_code)]

//! Headless element tree and event model for mapui.
//!
//! # Role in mapui
//! `mapui-dom` stands in for the browser: it owns elements, routes events
//! through them with bubbling and propagation suppression, and implements the
//! native `dialog` primitive (non-modal and modal presentation, inertness,
//! close on Escape). Widgets receive a `&mut Document` explicitly instead of
//! reaching for ambient globals, so every widget can be exercised in
//! isolation.
//!
//! # Primary responsibilities
//! - **Document**: element arena, factory (`create`, `create_button_icon`),
//!   tree mutation, listener registry.
//! - **Event**: event kinds, flags, dispatch outcome, `stop_propagation`.
//! - **Dialog primitive**: `show`, `show_modal`, `close`, `is_open`.
//!
//! Everything is single-threaded and synchronous: listeners run inside
//! [`Document::dispatch`] and may re-enter the document.

pub mod dialog;
pub mod document;
pub mod error;
pub mod event;
pub mod node;

pub use document::{Document, Handler, ListenerId, validate_token};
pub use error::{DomError, Result};
pub use event::{DispatchOutcome, Event, EventFlags, EventKind, Key, stop_propagation};
pub use node::{ClassList, Element, NodeId, Presentation};
