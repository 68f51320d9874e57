#![forbid(unsafe_code)]

//! Event types delivered through the element tree.
//!
//! Events bubble from their target to the document root unless a listener
//! stops propagation. Stopping propagation never implies preventing the
//! default action; the two are tracked by separate [`EventFlags`].

use bitflags::bitflags;

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;

/// Kind of event, matched exactly against registered listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    MouseDown,
    MouseUp,
    Click,
    DblClick,
    TouchStart,
    ContextMenu,
    Wheel,
    /// Legacy Gecko pixel scroll event.
    MozMousePixelScroll,
    KeyDown,
    /// Fired at a dialog after it transitions to closed. Does not bubble.
    Close,
}

impl EventKind {
    /// Kinds suppressed by [`Document::disable_click_propagation`].
    pub const CLICK_SEQUENCE: [Self; 5] = [
        Self::PointerDown,
        Self::MouseDown,
        Self::TouchStart,
        Self::Click,
        Self::DblClick,
    ];

    /// DOM event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::TouchStart => "touchstart",
            Self::ContextMenu => "contextmenu",
            Self::Wheel => "wheel",
            Self::MozMousePixelScroll => "MozMousePixelScroll",
            Self::KeyDown => "keydown",
            Self::Close => "close",
        }
    }

    /// Parse a DOM event name.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownEvent`] for names outside this model.
    pub fn parse(name: &str) -> Result<Self, DomError> {
        let kind = match name {
            "pointerdown" => Self::PointerDown,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "touchstart" => Self::TouchStart,
            "contextmenu" => Self::ContextMenu,
            "wheel" => Self::Wheel,
            "MozMousePixelScroll" => Self::MozMousePixelScroll,
            "keydown" => Self::KeyDown,
            "close" => Self::Close,
            other => return Err(DomError::UnknownEvent(other.to_owned())),
        };
        Ok(kind)
    }

    /// Whether events of this kind bubble to ancestors.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::Close)
    }

    /// Whether the event originates from user input, and is therefore
    /// subject to modal inertness.
    #[must_use]
    pub const fn is_user_input(self) -> bool {
        !matches!(self, Self::Close)
    }

    #[must_use]
    pub const fn cancelable(self) -> bool {
        !matches!(self, Self::Close)
    }
}

/// Keys carried by [`EventKind::KeyDown`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Char(char),
}

bitflags! {
    /// Per-dispatch event state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventFlags: u8 {
        /// Event continues to ancestors after the target.
        const BUBBLES             = 0b0001;
        /// `prevent_default` has an effect.
        const CANCELABLE          = 0b0010;
        /// A listener stopped propagation.
        const PROPAGATION_STOPPED = 0b0100;
        /// A listener cancelled the default action.
        const DEFAULT_PREVENTED   = 0b1000;
    }
}

/// An event in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    key: Option<Key>,
    target: NodeId,
    current_target: NodeId,
    flags: EventFlags,
}

impl Event {
    /// Create an event aimed at `target`, with flags derived from `kind`.
    #[must_use]
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        let mut flags = EventFlags::empty();
        flags.set(EventFlags::BUBBLES, kind.bubbles());
        flags.set(EventFlags::CANCELABLE, kind.cancelable());
        Self {
            kind,
            key: None,
            target,
            current_target: target,
            flags,
        }
    }

    /// Create a key-down event.
    #[must_use]
    pub fn key_down(key: Key, target: NodeId) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, target)
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub const fn key(&self) -> Option<Key> {
        self.key
    }

    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running.
    #[must_use]
    pub const fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = node;
    }

    #[must_use]
    pub const fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Stop the event from reaching ancestors of the current target.
    pub fn stop_propagation(&mut self) {
        self.flags.insert(EventFlags::PROPAGATION_STOPPED);
    }

    /// Cancel the default action. No effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.flags.contains(EventFlags::CANCELABLE) {
            self.flags.insert(EventFlags::DEFAULT_PREVENTED);
        }
    }

    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }

    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }
}

/// Ready-made listener that stops propagation without preventing the
/// default action.
pub fn stop_propagation(_doc: &mut Document, event: &mut Event) {
    event.stop_propagation();
}

/// Result of [`Document::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event travelled through the tree.
    Delivered {
        /// Number of listeners invoked.
        invoked: usize,
        /// Whether a listener cancelled the default action.
        default_prevented: bool,
    },
    /// The target is inert behind an open modal dialog; no listener ran.
    Blocked,
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// Listeners invoked, zero when blocked.
    #[must_use]
    pub const fn invoked(self) -> usize {
        match self {
            Self::Delivered { invoked, .. } => invoked,
            Self::Blocked => 0,
        }
    }
}
