#![forbid(unsafe_code)]

//! Internationalization for mapui.
//!
//! Provides externalized string storage with key-based lookup, locale
//! fallback chains, and variable interpolation.
//!
//! # How it fits in the system
//! Widgets take a [`Translate`] implementation at construction instead of
//! calling a global lookup, so labels can be checked in tests without any
//! catalog at all (see [`Identity`]).

use std::borrow::Cow;
use std::rc::Rc;

pub mod catalog;

pub use catalog::{I18nError, LocaleStrings, StringCatalog, interpolate};

/// Key-based string lookup.
///
/// A missing key is not an error: implementations return the key itself so
/// the interface still shows something readable.
pub trait Translate {
    fn translate(&self, key: &str) -> Cow<'_, str>;
}

impl<T: Translate + ?Sized> Translate for &T {
    fn translate(&self, key: &str) -> Cow<'_, str> {
        (**self).translate(key)
    }
}

impl<T: Translate + ?Sized> Translate for Rc<T> {
    fn translate(&self, key: &str) -> Cow<'_, str> {
        (**self).translate(key)
    }
}

/// Returns every key untranslated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl Translate for Identity {
    fn translate(&self, key: &str) -> Cow<'_, str> {
        Cow::Owned(key.to_owned())
    }
}
