//! Fallback planning: locale identifier → ordered resource names.
//!
//! The annotation overlay applies resource files least specific
//! first, so a regional file can overwrite values from the base
//! file. This module only plans the *names*; whether a file backs a
//! name is checked by the loader, and missing names are simply
//! skipped there.

use crate::identifier::LocaleIdentifier;

/// Candidate annotation resource names for a locale, least specific
/// first.
///
/// The base name is `language` or `language_script`; if a region is
/// present, `base_region` follows as the regional overlay. The order
/// is the overlay order: a later name's values win over an earlier
/// name's for the same emoji and field.
///
/// # Example
/// ```
/// use emopick_locale::{LocaleIdentifier, resource_names};
///
/// let id = LocaleIdentifier::parse("sr-Cyrl-BA").unwrap();
/// assert_eq!(resource_names(&id), vec!["sr_Cyrl", "sr_Cyrl_BA"]);
/// ```
#[must_use]
pub fn resource_names(locale: &LocaleIdentifier) -> Vec<String> {
    let mut base = locale.language().to_string();
    if let Some(script) = locale.script() {
        base.push('_');
        base.push_str(script);
    }

    match locale.region() {
        Some(region) => {
            let regional = format!("{base}_{region}");
            vec![base, regional]
        }
        None => vec![base],
    }
}
