#![forbid(unsafe_code)]

//! mapui public facade crate.
//!
//! Re-exports the element tree, translation, and widget types, and offers a
//! lightweight prelude for day-to-day usage.

use std::fmt;

// --- Element tree re-exports ----------------------------------------------

pub use mapui_dom::{
    ClassList, DispatchOutcome, Document, DomError, Event, EventFlags, EventKind, Handler, Key,
    ListenerId, NodeId, Presentation, stop_propagation,
};

// --- i18n re-exports ------------------------------------------------------

pub use mapui_i18n::{I18nError, Identity, LocaleStrings, StringCatalog, Translate};

// --- Widget re-exports ----------------------------------------------------

pub use mapui_widgets::{Dialog, DialogConfig, DialogOptions};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for mapui hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Element tree or dialog primitive failure.
    Dom(DomError),
    /// Translation catalog failure.
    I18n(I18nError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dom(err) => write!(f, "{err}"),
            Self::I18n(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dom(err) => Some(err),
            Self::I18n(err) => Some(err),
        }
    }
}

impl From<DomError> for Error {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

impl From<I18nError> for Error {
    fn from(err: I18nError) -> Self {
        Self::I18n(err)
    }
}

/// Standard result type for mapui APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Prelude for hosts embedding mapui widgets.
pub mod prelude {
    pub use crate::{
        Dialog, DialogOptions, Document, EventKind, NodeId, Presentation, Result, StringCatalog,
        Translate,
    };
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::prelude::*;
    use super::*;

    fn localized() -> std::result::Result<StringCatalog, I18nError> {
        let mut catalog = StringCatalog::new();
        catalog.add_locale("en", LocaleStrings::new().insert("Close", "Close"));
        catalog.add_locale("de", LocaleStrings::new().insert("Close", "Schließen"));
        catalog.set_locale("de")?;
        Ok(catalog)
    }

    fn show_panel() -> Result<(Document, Dialog)> {
        let mut doc = Document::new();
        let parent = doc.create("div", "umap-main", Some(doc.root()))?;
        let mut dialog = Dialog::new(&mut doc, parent, Rc::new(localized()?))?;
        let content = doc.create("div", "share-panel", None)?;
        dialog.open(&mut doc, DialogOptions::new().content(content).modal(true))?;
        Ok((doc, dialog))
    }

    #[test]
    fn facade_wires_everything() {
        let (doc, dialog) = show_panel().unwrap();
        assert_eq!(dialog.presentation(&doc), Some(Presentation::Modal));
        let button = dialog.close_button(&doc).unwrap();
        assert_eq!(doc.attribute(button, "title"), Some("Schließen"));
    }

    #[test]
    fn errors_convert_and_display() {
        let err: Error = DomError::NotADialog(NodeId::from_raw(3)).into();
        assert_eq!(err.to_string(), "node #3 is not a dialog element");
        let err: Error = I18nError::UnknownLocale("xx".into()).into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
