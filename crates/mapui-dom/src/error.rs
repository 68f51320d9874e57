#![forbid(unsafe_code)]

//! Errors raised by the element tree and the native dialog primitive.

use std::fmt;

use crate::node::NodeId;

/// Failure reported by a [`Document`](crate::Document) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node handle does not refer to a live element.
    UnknownNode(NodeId),
    /// A dialog operation was invoked on an element that is not a `dialog`.
    NotADialog(NodeId),
    /// The operation is not valid in the element's current state.
    InvalidState(&'static str),
    /// The tree mutation would produce an invalid hierarchy.
    HierarchyRequest(&'static str),
    /// A class token was empty or contained whitespace.
    InvalidToken(String),
    /// An event name could not be mapped to a known event kind.
    UnknownEvent(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::NotADialog(id) => write!(f, "node {id} is not a dialog element"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::HierarchyRequest(msg) => write!(f, "hierarchy request error: {msg}"),
            Self::InvalidToken(token) => write!(f, "invalid class token {token:?}"),
            Self::UnknownEvent(name) => write!(f, "unknown event name {name:?}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Result alias for DOM operations.
pub type Result<T> = std::result::Result<T, DomError>;
