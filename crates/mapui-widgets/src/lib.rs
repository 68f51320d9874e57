#![forbid(unsafe_code)]

//! Widget library built on the mapui element tree.
//!
//! Widgets own their elements inside a [`mapui_dom::Document`] and receive
//! the document explicitly on every call. Collaborators such as translation
//! are injected at construction.

pub mod dialog;

pub use dialog::{Dialog, DialogConfig, DialogOptions};
