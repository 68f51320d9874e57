//! Property-based invariant tests for the catalog.
//!
//! 1. Interpolation with no placeholders is identity
//! 2. Interpolation is not recursive
//! 3. Missing args leave placeholder tokens intact
//! 4. Translate never fails: missing keys come back verbatim
//! 5. set_locale on an unregistered locale leaves the active locale alone

use mapui_i18n::{LocaleStrings, StringCatalog, Translate, interpolate};
use proptest::prelude::*;

proptest! {
    #[test]
    fn no_placeholders_is_identity(text in "[^{}]*") {
        prop_assert_eq!(interpolate(&text, &[("name", "x")]), text);
    }

    #[test]
    fn substitution_not_rescanned(value in "[a-z{}]{0,12}") {
        let out = interpolate("<{v}>", &[("v", value.as_str())]);
        prop_assert_eq!(out, format!("<{value}>"));
    }

    #[test]
    fn missing_args_kept(name in "[a-z]{1,8}") {
        let template = format!("a {{{name}}} b");
        prop_assert_eq!(interpolate(&template, &[]), template);
    }

    #[test]
    fn translate_missing_key_is_key(key in "\\PC{0,24}") {
        let mut catalog = StringCatalog::new();
        catalog.add_locale("en", LocaleStrings::new().insert("Close", "Close"));
        if key != "Close" {
            prop_assert_eq!(catalog.translate(&key).into_owned(), key);
        }
    }

    #[test]
    fn unknown_locale_keeps_active(locale in "[a-z]{2}") {
        let mut catalog = StringCatalog::new();
        catalog.add_locale("zz-ZZ", LocaleStrings::new());
        prop_assert!(catalog.set_locale(&locale).is_err());
        prop_assert_eq!(catalog.locale(), Some("zz-ZZ"));
    }
}
