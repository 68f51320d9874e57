#![forbid(unsafe_code)]

//! Element storage types: node handles, class lists, and dialog presentation.

use std::fmt;

/// Handle to an element owned by a [`Document`](crate::Document).
///
/// Handles are never reused: once an element is removed, its id stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Build a handle from its raw index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an open dialog element is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presentation {
    /// Blocks interaction with everything outside the dialog.
    Modal,
    /// Leaves the rest of the page interactive.
    NonModal,
}

impl Presentation {
    /// Presentation requested by a `modal` flag.
    #[must_use]
    pub const fn from_modal(modal: bool) -> Self {
        if modal { Self::Modal } else { Self::NonModal }
    }

    #[must_use]
    pub const fn is_modal(self) -> bool {
        matches!(self, Self::Modal)
    }
}

/// Ordered, de-duplicated set of class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    /// Parse a whitespace separated class attribute.
    #[must_use]
    pub fn parse(class_names: &str) -> Self {
        let mut list = Self::default();
        for name in class_names.split_whitespace() {
            list.add(name);
        }
        list
    }

    /// Add a class. Returns `false` if it was already present.
    ///
    /// Whitespace separated input adds every token.
    pub fn add(&mut self, class_names: &str) -> bool {
        let mut added = false;
        for name in class_names.split_whitespace() {
            if !self.contains(name) {
                self.names.push(name.to_owned());
                added = true;
            }
        }
        added
    }

    /// Remove a class. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" "))
    }
}

/// A single element in the tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) classes: ClassList,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Native open flag; only ever `Some` on `dialog` elements.
    pub(crate) open: Option<Presentation>,
}

impl Element {
    pub(crate) fn new(tag: &str, class_names: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: ClassList::parse(class_names),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            open: None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value.to_owned(),
            None => self.attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    #[must_use]
    pub fn is_dialog(&self) -> bool {
        self.tag == "dialog"
    }
}
