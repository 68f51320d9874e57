#![forbid(unsafe_code)]

//! String catalog with locale fallback and `{name}` interpolation.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::Translate;

/// Catalog error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The locale has no registered strings.
    UnknownLocale(String),
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLocale(locale) => write!(f, "unknown locale {locale:?}"),
        }
    }
}

impl std::error::Error for I18nError {}

/// Strings for a single locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStrings {
    entries: HashMap<String, String>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a translation.
    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Key-based string lookup across locales.
///
/// Lookup walks the active locale, then the fallback chain in order.
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<String, LocaleStrings>,
    active: Option<String>,
    fallback: Vec<String>,
}

impl StringCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register strings for `locale`. The first registered locale becomes
    /// active.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        let locale = locale.into();
        if self.active.is_none() {
            self.active = Some(locale.clone());
        }
        self.locales.insert(locale, strings);
    }

    /// Switch the active locale.
    ///
    /// # Errors
    ///
    /// [`I18nError::UnknownLocale`] if no strings were registered for it.
    pub fn set_locale(&mut self, locale: &str) -> Result<(), I18nError> {
        if !self.locales.contains_key(locale) {
            return Err(I18nError::UnknownLocale(locale.to_owned()));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "i18n.set_locale", locale);
        self.active = Some(locale.to_owned());
        Ok(())
    }

    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Locales consulted after the active one. Unregistered entries are
    /// skipped at lookup time.
    pub fn set_fallback_chain<I, S>(&mut self, chain: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback = chain.into_iter().map(Into::into).collect();
    }

    /// Look up a key through the active locale and the fallback chain.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.active
            .iter()
            .chain(self.fallback.iter())
            .filter_map(|locale| self.locales.get(locale))
            .find_map(|strings| strings.get(key))
    }

    /// Look up `key` (or use it verbatim when missing) and interpolate.
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(self.get(key).unwrap_or(key), args)
    }
}

impl Translate for StringCatalog {
    fn translate(&self, key: &str) -> Cow<'_, str> {
        match self.get(key) {
            Some(value) => Cow::Borrowed(value),
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(message = "i18n.missing", key);
                Cow::Owned(key.to_owned())
            }
        }
    }
}

/// Replace `{name}` placeholders with matching `args`.
///
/// Unknown placeholders and unbalanced braces are kept as-is. Substituted
/// values are never scanned again.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match args.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
