#![forbid(unsafe_code)]

//! Dialog window: a reusable container that shows arbitrary content,
//! optionally modal, with a close control.
//!
//! The dialog owns one `dialog` element for its whole lifetime. Every
//! [`Dialog::open`] rebuilds the buttons toolbar, so exactly one close button
//! exists and stale close bindings never pile up.
//!
//! # Invariants
//!
//! 1. The container is created once, in [`Dialog::new`], and never replaced.
//! 2. Visibility is read from the native open flag; nothing is cached.
//! 3. After `open`, the container holds the toolbar followed by the content.
//! 4. Scroll, context-menu and press/click events on the container never
//!    reach the parent's listeners.
//!
//! # Failure Modes
//!
//! - Operations on a dialog whose parent was removed return
//!   [`DomError::UnknownNode`].
//! - `open` without content installs only the toolbar.
//! - `open` with a `class_name` holding more than one token fails with
//!   [`DomError::InvalidToken`] before touching the dialog.
//! - Content replaced by a later `open` is detached; modal dialogs nested in
//!   it drop to non-modal so they no longer lock the page.

use std::fmt;
use std::rc::Rc;

use mapui_dom::{
    DomError, Document, EventKind, ListenerId, NodeId, Presentation, stop_propagation,
    validate_token,
};
use mapui_i18n::Translate;

/// Events whose propagation the container always suppresses, on top of the
/// press/click sequence.
const SUPPRESSED: [EventKind; 3] = [
    EventKind::ContextMenu,
    EventKind::Wheel,
    EventKind::MozMousePixelScroll,
];

/// Markup knobs for the dialog chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    pub container_class: String,
    pub toolbar_tag: String,
    pub toolbar_class: String,
    pub item_tag: String,
    pub close_icon_class: String,
    /// Translation key of the close button label.
    pub close_label_key: String,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            container_class: "umap-dialog window".to_owned(),
            toolbar_tag: "ul".to_owned(),
            toolbar_class: "buttons".to_owned(),
            item_tag: "li".to_owned(),
            close_icon_class: "icon-close".to_owned(),
            close_label_key: "Close".to_owned(),
        }
    }
}

impl DialogConfig {
    pub fn container_class(mut self, class: impl Into<String>) -> Self {
        self.container_class = class.into();
        self
    }

    pub fn toolbar(mut self, tag: impl Into<String>, class: impl Into<String>) -> Self {
        self.toolbar_tag = tag.into();
        self.toolbar_class = class.into();
        self
    }

    pub fn item_tag(mut self, tag: impl Into<String>) -> Self {
        self.item_tag = tag.into();
        self
    }

    pub fn close_icon_class(mut self, class: impl Into<String>) -> Self {
        self.close_icon_class = class.into();
        self
    }

    pub fn close_label_key(mut self, key: impl Into<String>) -> Self {
        self.close_label_key = key.into();
        self
    }
}

/// What to show on the next [`Dialog::open`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOptions {
    /// Extra class added to the container. Classes from earlier opens stay.
    ///
    /// Must be a single class token; an empty string adds nothing.
    pub class_name: Option<String>,
    /// Body node, moved into the container after the toolbar.
    pub content: Option<NodeId>,
    pub modal: bool,
}

impl DialogOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content: NodeId) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }
}

/// Dialog window attached to a parent element.
pub struct Dialog {
    parent: NodeId,
    container: NodeId,
    toolbar: Option<NodeId>,
    config: DialogConfig,
    translator: Rc<dyn Translate>,
    bindings: Vec<ListenerId>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("parent", &self.parent)
            .field("container", &self.container)
            .field("toolbar", &self.toolbar)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dialog {
    /// Create the dialog container under `parent` with the default chrome.
    ///
    /// # Errors
    ///
    /// Propagates [`DomError`] from the document, e.g. a dead `parent`.
    pub fn new(
        doc: &mut Document,
        parent: NodeId,
        translator: Rc<dyn Translate>,
    ) -> Result<Self, DomError> {
        Self::with_config(doc, parent, translator, DialogConfig::default())
    }

    /// Create the dialog container under `parent`.
    ///
    /// # Errors
    ///
    /// Propagates [`DomError`] from the document, e.g. a dead `parent`.
    pub fn with_config(
        doc: &mut Document,
        parent: NodeId,
        translator: Rc<dyn Translate>,
        config: DialogConfig,
    ) -> Result<Self, DomError> {
        let container = doc.create("dialog", &config.container_class, Some(parent))?;
        let mut bindings = doc.disable_click_propagation(container)?;
        for kind in SUPPRESSED {
            bindings.push(doc.on(container, kind, stop_propagation)?);
        }
        Ok(Self {
            parent,
            container,
            toolbar: None,
            config,
            translator,
            bindings,
        })
    }

    #[must_use]
    pub const fn parent(&self) -> NodeId {
        self.parent
    }

    /// The `dialog` element owned by this dialog.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    #[must_use]
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// Whether the container is shown, modally or not.
    #[must_use]
    pub fn visible(&self, doc: &Document) -> bool {
        doc.is_open(self.container)
    }

    #[must_use]
    pub fn presentation(&self, doc: &Document) -> Option<Presentation> {
        doc.presentation(self.container)
    }

    /// Hide the dialog. Closing a hidden dialog does nothing.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if the container was removed.
    pub fn close(&self, doc: &mut Document) -> Result<(), DomError> {
        close_container(doc, self.container)
    }

    /// Show `options.content`, replacing whatever the dialog showed before.
    ///
    /// Opening an already open dialog re-presents it: with the same
    /// presentation it stays open with the new content, otherwise it is
    /// closed and shown again in the requested mode.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidToken`] if `class_name` is not a single class
    /// token, in which case nothing changes;
    /// [`DomError::UnknownNode`] if the container or `content` is dead;
    /// [`DomError::HierarchyRequest`] if `content` contains the container.
    pub fn open(&mut self, doc: &mut Document, options: DialogOptions) -> Result<(), DomError> {
        let wanted = Presentation::from_modal(options.modal);
        let class_name = options.class_name.as_deref().filter(|c| !c.is_empty());
        if let Some(class) = class_name {
            validate_token(class)?;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "dialog.open",
            container = %self.container,
            modal = options.modal,
            class_name = options.class_name.as_deref().unwrap_or(""),
            has_content = options.content.is_some()
        )
        .entered();

        if let Some(toolbar) = self.toolbar.take()
            && doc.exists(toolbar)
        {
            doc.remove(toolbar)?;
        }
        doc.clear_children(self.container)?;

        if doc
            .presentation(self.container)
            .is_some_and(|current| current != wanted)
        {
            doc.close(self.container)?;
        }
        match wanted {
            Presentation::Modal => doc.show_modal(self.container)?,
            Presentation::NonModal => doc.show(self.container)?,
        }

        if let Some(class) = class_name {
            doc.add_class(self.container, class)?;
        }

        let toolbar = doc.create(
            &self.config.toolbar_tag,
            &self.config.toolbar_class,
            Some(self.container),
        )?;
        self.toolbar = Some(toolbar);
        let item = doc.create(&self.config.item_tag, "", Some(toolbar))?;
        let label = self.translator.translate(&self.config.close_label_key);
        let button = doc.create_button_icon(item, &self.config.close_icon_class, &label)?;
        let container = self.container;
        doc.on(button, EventKind::Click, move |doc, _event| {
            if let Err(_err) = close_container(doc, container) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    message = "dialog.close_button.failed",
                    container = %container,
                    error = %_err
                );
            }
        })?;

        if let Some(content) = options.content {
            doc.append_child(self.container, content)?;
        }
        Ok(())
    }

    /// The close button installed by the last `open`.
    #[must_use]
    pub fn close_button(&self, doc: &Document) -> Option<NodeId> {
        let toolbar = self.toolbar.filter(|&t| doc.contains(self.container, t))?;
        doc.subtree(toolbar)
            .into_iter()
            .find(|&node| doc.tag(node) == Ok("button"))
    }

    /// Release every listener on the container and remove it from the parent.
    ///
    /// Removing the parent from the document has the same effect.
    ///
    /// # Errors
    ///
    /// Propagates [`DomError`] from the document.
    pub fn dispose(self, doc: &mut Document) -> Result<(), DomError> {
        for id in self.bindings {
            doc.off(id);
        }
        if doc.exists(self.container) {
            doc.remove(self.container)?;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "dialog.dispose", container = %self.container);
        Ok(())
    }
}

/// Close path shared by [`Dialog::close`] and the close button.
fn close_container(doc: &mut Document, container: NodeId) -> Result<(), DomError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(message = "dialog.close", container = %container);
    doc.close(container)
}
