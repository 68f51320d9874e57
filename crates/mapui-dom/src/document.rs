#![forbid(unsafe_code)]

//! Element arena, element factory, and listener registry.
//!
//! # Invariants
//!
//! 1. The root `body` element always exists and has no parent.
//! 2. Every child's `parent` points back at the element listing it.
//! 3. Removing an element drops its whole subtree and releases every
//!    listener bound anywhere inside it.
//! 4. Node handles are never reused.
//! 5. Only connected dialogs are modal: unlinking a subtree demotes every
//!    modal dialog inside it to non-modal.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::{DomError, Result};
use crate::event::{DispatchOutcome, Event, EventKind, Key, stop_propagation};
use crate::node::{ClassList, Element, NodeId};

/// Listener callback. Receives the document so it can mutate the tree
/// (close a dialog, replace content) from inside dispatch.
pub type Handler = Rc<dyn Fn(&mut Document, &mut Event)>;

/// Handle to a bound listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    kind: EventKind,
    handler: Handler,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Headless document: owns every element and every listener.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    root: NodeId,
    listeners: AHashMap<NodeId, Vec<Listener>>,
    listener_nodes: AHashMap<ListenerId, NodeId>,
    next_listener: u64,
    /// Open modal dialogs, most recently shown last.
    pub(crate) modal_stack: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root `body` element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Element::new("body", ""))],
            root: NodeId::from_raw(0),
            listeners: AHashMap::new(),
            listener_nodes: AHashMap::new(),
            next_listener: 0,
            modal_stack: Vec::new(),
        }
    }

    /// The root `body` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    // --- Element access ----------------------------------------------------

    /// Whether `id` refers to a live element.
    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(Option::is_some)
    }

    /// Borrow an element.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if the element was removed or never existed.
    pub fn element(&self, id: NodeId) -> Result<&Element> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(DomError::UnknownNode(id))
    }

    /// Tag name of an element.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn tag(&self, id: NodeId) -> Result<&str> {
        Ok(self.element(id)?.tag())
    }

    /// Ordered children of an element.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.element(id)?.children())
    }

    /// Parent of an element, `None` for the root and detached elements.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).ok().and_then(Element::parent)
    }

    /// Class list of an element.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn classes(&self, id: NodeId) -> Result<&ClassList> {
        Ok(self.element(id)?.classes())
    }

    /// Mutable class list of an element.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn classes_mut(&mut self, id: NodeId) -> Result<&mut ClassList> {
        Ok(&mut self.element_mut(id)?.classes)
    }

    /// Add a single class token, as `classList.add` does.
    ///
    /// Returns `false` if the class was already present.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidToken`] for an empty token or one containing
    /// whitespace; [`DomError::UnknownNode`] for dead handles.
    pub fn add_class(&mut self, id: NodeId, token: &str) -> Result<bool> {
        validate_token(token)?;
        Ok(self.element_mut(id)?.classes.add(token))
    }

    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|el| el.attribute(name))
    }

    /// Set an attribute, replacing any previous value.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    /// Whether `id` is reachable from the root.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.exists(id) && self.contains(self.root, id)
    }

    /// Every element below `id` (inclusive), in pre-order.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let Ok(el) = self.element(node) else {
                continue;
            };
            out.push(node);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    // --- Element factory ---------------------------------------------------

    /// Create an element and, when `parent` is given, append it there.
    ///
    /// `class_names` is whitespace separated and may be empty.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `parent` is dead.
    pub fn create(&mut self, tag: &str, class_names: &str, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.element(parent)?;
        }
        let raw = u32::try_from(self.nodes.len())
            .map_err(|_| DomError::InvalidState("node arena exhausted"))?;
        let id = NodeId::from_raw(raw);
        self.nodes.push(Some(Element::new(tag, class_names)));
        if let Some(parent) = parent {
            self.append_child(parent, id)?;
        }
        Ok(id)
    }

    /// Create an icon-only button inside `parent`.
    ///
    /// The button carries `label` as its title and accessible label, and
    /// holds a single `i.icon.icon-16.<icon_class>` glyph. Returns the button.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `parent` is dead.
    pub fn create_button_icon(
        &mut self,
        parent: NodeId,
        icon_class: &str,
        label: &str,
    ) -> Result<NodeId> {
        let button = self.create("button", "flat", Some(parent))?;
        self.set_attribute(button, "type", "button")?;
        self.set_attribute(button, "title", label)?;
        self.set_attribute(button, "aria-label", label)?;
        self.create("i", &format!("icon icon-16 {icon_class}"), Some(button))?;
        Ok(button)
    }

    // --- Tree mutation -----------------------------------------------------

    /// Append `child` as the last child of `parent`, moving it if attached
    /// elsewhere (or already under `parent`).
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles;
    /// [`DomError::HierarchyRequest`] when `child` is the root or an
    /// inclusive ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.element(parent)?;
        self.element(child)?;
        if child == self.root {
            return Err(DomError::HierarchyRequest("the root cannot be a child"));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest(
                "a node cannot be appended inside itself",
            ));
        }
        self.detach(child)?;
        self.element_mut(child)?.parent = Some(parent);
        self.element_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Unlink an element from its parent, keeping it and its listeners alive.
    ///
    /// Modal dialogs inside the unlinked subtree stay open but lose their
    /// modality.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.element_mut(id)?.parent.take() else {
            return Ok(());
        };
        if let Ok(el) = self.element_mut(parent) {
            el.children.retain(|&c| c != id);
        }
        self.demote_modals(id);
        Ok(())
    }

    /// Detach every child of `id`.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.element_mut(id)?.children);
        for child in children {
            if let Ok(el) = self.element_mut(child) {
                el.parent = None;
            }
            self.demote_modals(child);
        }
        Ok(())
    }

    /// Remove an element and drop its subtree, releasing all listeners bound
    /// on any element in it. Open dialogs inside it stop being open.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles;
    /// [`DomError::HierarchyRequest`] for the root.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DomError::HierarchyRequest("the root cannot be removed"));
        }
        self.detach(id)?;
        let doomed = self.subtree(id);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "dom.remove", node = %id, elements = doomed.len());
        for node in doomed {
            self.release_listeners(node);
            self.modal_stack.retain(|&m| m != node);
            if let Some(slot) = self.nodes.get_mut(node.index()) {
                *slot = None;
            }
        }
        Ok(())
    }

    // --- Listeners ---------------------------------------------------------

    /// Bind `handler` for `kind` events on `node`.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn on<F>(&mut self, node: NodeId, kind: EventKind, handler: F) -> Result<ListenerId>
    where
        F: Fn(&mut Document, &mut Event) + 'static,
    {
        self.on_handler(node, kind, Rc::new(handler))
    }

    /// Bind a shared handler.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn on_handler(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> Result<ListenerId> {
        self.element(node)?;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.entry(node).or_default().push(Listener { id, kind, handler });
        self.listener_nodes.insert(id, node);
        Ok(id)
    }

    /// Unbind a listener. Returns `false` if it was already released.
    pub fn off(&mut self, listener: ListenerId) -> bool {
        let Some(node) = self.listener_nodes.remove(&listener) else {
            return false;
        };
        if let Some(list) = self.listeners.get_mut(&node) {
            list.retain(|l| l.id != listener);
            if list.is_empty() {
                self.listeners.remove(&node);
            }
        }
        true
    }

    /// Number of listeners bound on `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    /// Number of listeners bound anywhere in the document.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.listener_nodes.len()
    }

    fn release_listeners(&mut self, node: NodeId) {
        if let Some(list) = self.listeners.remove(&node) {
            for listener in list {
                self.listener_nodes.remove(&listener.id);
            }
        }
    }

    /// Stop press and click sequences on `node` from reaching ancestors.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for dead handles.
    pub fn disable_click_propagation(&mut self, node: NodeId) -> Result<Vec<ListenerId>> {
        EventKind::CLICK_SEQUENCE
            .into_iter()
            .map(|kind| self.on(node, kind, stop_propagation))
            .collect()
    }

    // --- Dispatch ----------------------------------------------------------

    /// Dispatch a `kind` event at `target`.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `target` is dead, or any error raised by
    /// a default action.
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) -> Result<DispatchOutcome> {
        self.dispatch_event(Event::new(kind, target))
    }

    /// Dispatch a key-down event at `target`.
    ///
    /// # Errors
    ///
    /// See [`Document::dispatch`].
    pub fn dispatch_key(&mut self, target: NodeId, key: Key) -> Result<DispatchOutcome> {
        self.dispatch_event(Event::key_down(key, target))
    }

    /// Dispatch a prepared event.
    ///
    /// The propagation path is fixed before any listener runs. Listeners on
    /// one node run in binding order; a listener that stops propagation does
    /// not prevent the remaining listeners on the same node. Listeners
    /// released mid-dispatch are skipped.
    ///
    /// # Errors
    ///
    /// See [`Document::dispatch`].
    pub fn dispatch_event(&mut self, mut event: Event) -> Result<DispatchOutcome> {
        let target = event.target();
        self.element(target)?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dom.dispatch", event = event.kind().name(), target = %target)
            .entered();

        if event.kind().is_user_input() && self.is_inert(target) {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "dom.dispatch.blocked", target = %target);
            return Ok(DispatchOutcome::Blocked);
        }

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.parent(id);
        }

        let bubbles = event.kind().bubbles();
        let mut invoked = 0;
        for node in path {
            event.set_current_target(node);
            let batch: Vec<(ListenerId, Handler)> = self
                .listeners
                .get(&node)
                .map(|list| {
                    list.iter()
                        .filter(|l| l.kind == event.kind())
                        .map(|l| (l.id, Rc::clone(&l.handler)))
                        .collect()
                })
                .unwrap_or_default();
            for (id, handler) in batch {
                if !self.listener_nodes.contains_key(&id) {
                    continue;
                }
                handler(self, &mut event);
                invoked += 1;
            }
            if event.propagation_stopped() || !bubbles {
                break;
            }
        }

        let default_prevented = event.default_prevented();
        if !default_prevented {
            self.run_default_action(&event)?;
        }

        Ok(DispatchOutcome::Delivered {
            invoked,
            default_prevented,
        })
    }

    /// Native default actions.
    fn run_default_action(&mut self, event: &Event) -> Result<()> {
        if event.kind() == EventKind::KeyDown
            && event.key() == Some(Key::Escape)
            && let Some(top) = self.top_modal()
            && self.contains(top, event.target())
        {
            self.close(top)?;
        }
        Ok(())
    }
}

/// Check that `token` is usable as a single class name.
///
/// # Errors
///
/// [`DomError::InvalidToken`] for an empty token or one containing whitespace.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidToken(token.to_owned()));
    }
    Ok(())
}
