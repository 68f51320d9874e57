#![forbid(unsafe_code)]

//! Native `dialog` element primitive.
//!
//! # State machine
//!
//! | current      | `show`        | `show_modal`   | `close`          |
//! |--------------|---------------|----------------|------------------|
//! | closed       | non-modal     | modal          | no-op            |
//! | non-modal    | no-op         | `InvalidState` | closed + `close` |
//! | modal        | `InvalidState`| no-op          | closed + `close` |
//!
//! While a modal dialog is open, everything outside the most recently shown
//! modal dialog is inert: user input dispatched there is blocked. A modal
//! dialog unlinked from the document (directly or with an ancestor) stays
//! open as non-modal.

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::event::{Event, EventKind};
use crate::node::{NodeId, Presentation};

impl Document {
    fn dialog_state(&self, id: NodeId) -> Result<Option<Presentation>> {
        let el = self.element(id)?;
        if !el.is_dialog() {
            return Err(DomError::NotADialog(id));
        }
        Ok(el.open)
    }

    /// Current presentation of a dialog, `None` when closed or not a live
    /// dialog element.
    #[must_use]
    pub fn presentation(&self, id: NodeId) -> Option<Presentation> {
        self.dialog_state(id).ok().flatten()
    }

    /// Native open flag.
    #[must_use]
    pub fn is_open(&self, id: NodeId) -> bool {
        self.presentation(id).is_some()
    }

    /// Open a dialog without blocking the rest of the document.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidState`] if the dialog is already open modally;
    /// [`DomError::NotADialog`] / [`DomError::UnknownNode`] for bad handles.
    pub fn show(&mut self, id: NodeId) -> Result<()> {
        match self.dialog_state(id)? {
            Some(Presentation::NonModal) => Ok(()),
            Some(Presentation::Modal) => {
                Err(DomError::InvalidState("dialog is already open as modal"))
            }
            None => {
                self.element_mut(id)?.open = Some(Presentation::NonModal);
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "dom.dialog.show", dialog = %id, modal = false);
                Ok(())
            }
        }
    }

    /// Open a dialog modally: the rest of the document becomes inert.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidState`] if the dialog is open non-modally or is not
    /// connected to the root; [`DomError::NotADialog`] /
    /// [`DomError::UnknownNode`] for bad handles.
    pub fn show_modal(&mut self, id: NodeId) -> Result<()> {
        match self.dialog_state(id)? {
            Some(Presentation::Modal) => Ok(()),
            Some(Presentation::NonModal) => {
                Err(DomError::InvalidState("dialog is already open as non-modal"))
            }
            None => {
                if !self.is_connected(id) {
                    return Err(DomError::InvalidState("dialog is not connected"));
                }
                self.element_mut(id)?.open = Some(Presentation::Modal);
                self.modal_stack.push(id);
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "dom.dialog.show", dialog = %id, modal = true);
                Ok(())
            }
        }
    }

    /// Close a dialog and fire `close` at it. Closing a closed dialog does
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`DomError::NotADialog`] / [`DomError::UnknownNode`] for bad handles,
    /// or an error raised while delivering the `close` event.
    pub fn close(&mut self, id: NodeId) -> Result<()> {
        if self.dialog_state(id)?.is_none() {
            return Ok(());
        }
        self.element_mut(id)?.open = None;
        self.modal_stack.retain(|&m| m != id);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "dom.dialog.close", dialog = %id);
        self.dispatch_event(Event::new(EventKind::Close, id))?;
        Ok(())
    }

    /// Drop every modal dialog under `id` from the modal stack, leaving it
    /// open as non-modal. Runs whenever a subtree leaves the document.
    pub(crate) fn demote_modals(&mut self, id: NodeId) {
        if self.modal_stack.is_empty() {
            return;
        }
        for node in self.subtree(id) {
            if !self.modal_stack.contains(&node) {
                continue;
            }
            self.modal_stack.retain(|&m| m != node);
            if let Ok(el) = self.element_mut(node) {
                el.open = Some(Presentation::NonModal);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "dom.dialog.demote", dialog = %node);
        }
    }

    /// Most recently shown modal dialog that is still open.
    #[must_use]
    pub fn top_modal(&self) -> Option<NodeId> {
        self.modal_stack.last().copied()
    }

    /// Whether user input at `id` is blocked by an open modal dialog.
    #[must_use]
    pub fn is_inert(&self, id: NodeId) -> bool {
        match self.top_modal() {
            Some(top) => self.is_connected(id) && !self.contains(top, id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::event::{DispatchOutcome, Key};

    fn dialog(doc: &mut Document) -> NodeId {
        doc.create("dialog", "", Some(doc.root())).unwrap()
    }

    #[test]
    fn starts_closed() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        assert!(!doc.is_open(d));
        assert_eq!(doc.presentation(d), None);
    }

    #[test]
    fn show_then_close() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        doc.show(d).unwrap();
        assert_eq!(doc.presentation(d), Some(Presentation::NonModal));
        doc.show(d).unwrap();
        assert_eq!(doc.presentation(d), Some(Presentation::NonModal));
        doc.close(d).unwrap();
        assert!(!doc.is_open(d));
    }

    #[test]
    fn close_is_idempotent() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        let fired = Rc::new(Cell::new(0));
        {
            let fired = Rc::clone(&fired);
            doc.on(d, EventKind::Close, move |_, _| fired.set(fired.get() + 1))
                .unwrap();
        }
        doc.close(d).unwrap();
        assert_eq!(fired.get(), 0);
        doc.show_modal(d).unwrap();
        doc.close(d).unwrap();
        doc.close(d).unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn mixed_presentations_are_invalid() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        doc.show(d).unwrap();
        assert!(matches!(doc.show_modal(d), Err(DomError::InvalidState(_))));
        doc.close(d).unwrap();
        doc.show_modal(d).unwrap();
        assert!(matches!(doc.show(d), Err(DomError::InvalidState(_))));
        doc.show_modal(d).unwrap();
        assert_eq!(doc.presentation(d), Some(Presentation::Modal));
    }

    #[test]
    fn show_modal_requires_connection() {
        let mut doc = Document::new();
        let d = doc.create("dialog", "", None).unwrap();
        assert!(matches!(doc.show_modal(d), Err(DomError::InvalidState(_))));
        doc.show(d).unwrap();
        assert!(doc.is_open(d));
    }

    #[test]
    fn non_dialog_rejected() {
        let mut doc = Document::new();
        let div = doc.create("div", "", Some(doc.root())).unwrap();
        assert_eq!(doc.show(div), Err(DomError::NotADialog(div)));
        assert_eq!(doc.close(div), Err(DomError::NotADialog(div)));
        assert!(!doc.is_open(div));
    }

    #[test]
    fn modal_blocks_outside_input() {
        let mut doc = Document::new();
        let sibling = doc.create("button", "", Some(doc.root())).unwrap();
        let d = dialog(&mut doc);
        let inside = doc.create("p", "", Some(d)).unwrap();
        doc.show_modal(d).unwrap();

        assert!(doc.is_inert(sibling));
        assert!(!doc.is_inert(inside));
        assert_eq!(
            doc.dispatch(sibling, EventKind::Click),
            Ok(DispatchOutcome::Blocked)
        );
        assert!(!doc.dispatch(inside, EventKind::Click).unwrap().is_blocked());

        doc.close(d).unwrap();
        assert!(!doc.is_inert(sibling));
    }

    #[test]
    fn non_modal_blocks_nothing() {
        let mut doc = Document::new();
        let sibling = doc.create("button", "", Some(doc.root())).unwrap();
        let d = dialog(&mut doc);
        doc.show(d).unwrap();
        assert!(!doc.is_inert(sibling));
        assert!(!doc.dispatch(sibling, EventKind::Click).unwrap().is_blocked());
    }

    #[test]
    fn nested_modals_restore_previous() {
        let mut doc = Document::new();
        let first = dialog(&mut doc);
        let second = dialog(&mut doc);
        doc.show_modal(first).unwrap();
        doc.show_modal(second).unwrap();
        assert_eq!(doc.top_modal(), Some(second));
        assert!(doc.is_inert(first));
        doc.close(second).unwrap();
        assert_eq!(doc.top_modal(), Some(first));
        assert!(!doc.is_inert(first));
    }

    #[test]
    fn escape_closes_modal() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        let field = doc.create("input", "", Some(d)).unwrap();
        doc.show_modal(d).unwrap();
        doc.dispatch_key(field, Key::Enter).unwrap();
        assert!(doc.is_open(d));
        doc.dispatch_key(field, Key::Escape).unwrap();
        assert!(!doc.is_open(d));
    }

    #[test]
    fn escape_respects_prevent_default() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        doc.on(d, EventKind::KeyDown, |_, ev| ev.prevent_default())
            .unwrap();
        doc.show_modal(d).unwrap();
        let outcome = doc.dispatch_key(d, Key::Escape).unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Delivered {
                invoked: 1,
                default_prevented: true
            }
        );
        assert!(doc.is_open(d));
    }

    #[test]
    fn escape_leaves_non_modal_open() {
        let mut doc = Document::new();
        let d = dialog(&mut doc);
        doc.show(d).unwrap();
        doc.dispatch_key(d, Key::Escape).unwrap();
        assert!(doc.is_open(d));
    }

    #[test]
    fn detaching_open_modal_demotes_it() {
        let mut doc = Document::new();
        let sibling = doc.create("div", "", Some(doc.root())).unwrap();
        let panel = doc.create("section", "", Some(doc.root())).unwrap();
        let d = doc.create("dialog", "", Some(panel)).unwrap();
        doc.show_modal(d).unwrap();
        assert!(doc.is_inert(sibling));

        doc.detach(panel).unwrap();
        assert_eq!(doc.top_modal(), None);
        assert_eq!(doc.presentation(d), Some(Presentation::NonModal));
        assert!(!doc.is_inert(sibling));
        assert!(!doc.dispatch(sibling, EventKind::Click).unwrap().is_blocked());
    }

    #[test]
    fn clearing_children_demotes_modals_inside() {
        let mut doc = Document::new();
        let host = doc.create("div", "", Some(doc.root())).unwrap();
        let d = doc.create("dialog", "", Some(host)).unwrap();
        let outside = dialog(&mut doc);
        doc.show(outside).unwrap();
        doc.show_modal(d).unwrap();
        assert!(doc.is_inert(outside));

        doc.clear_children(host).unwrap();
        assert!(doc.is_open(d));
        assert_eq!(doc.presentation(d), Some(Presentation::NonModal));
        assert!(!doc.is_inert(outside));
    }

    #[test]
    fn moving_modal_within_page_demotes_it() {
        let mut doc = Document::new();
        let a = doc.create("div", "", Some(doc.root())).unwrap();
        let b = doc.create("div", "", Some(doc.root())).unwrap();
        let d = doc.create("dialog", "", Some(a)).unwrap();
        doc.show_modal(d).unwrap();
        doc.append_child(b, d).unwrap();
        assert_eq!(doc.presentation(d), Some(Presentation::NonModal));
        assert_eq!(doc.top_modal(), None);
    }

    #[test]
    fn removing_open_modal_releases_inertness() {
        let mut doc = Document::new();
        let sibling = doc.create("div", "", Some(doc.root())).unwrap();
        let d = dialog(&mut doc);
        doc.show_modal(d).unwrap();
        doc.remove(d).unwrap();
        assert_eq!(doc.top_modal(), None);
        assert!(!doc.is_inert(sibling));
    }
}
