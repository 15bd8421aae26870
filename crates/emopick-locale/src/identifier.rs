//! Parsing of raw locale strings into validated components.
//!
//! # Invariants
//!
//! 1. **Language is mandatory**: a parse that cannot extract a
//!    well-formed language code yields `None`, never a partial
//!    identifier.
//!
//! 2. **Script and region are best-effort in the three-component
//!    shape**: a component that fails its form check is dropped, not
//!    an error. `"sr-CYRL-BA"` parses as `sr` + region `BA` with no
//!    script. In the two-component shape the second field must be a
//!    script; regions are only valid in the third position.
//!
//! 3. **Separator-agnostic**: `-` and `_` are interchangeable on
//!    input; [`LocaleIdentifier::to_string`] always emits `_`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad language form | e.g. `"pppoe"` or `"EN"` | `parse` returns `None` |
//! | Too many components | 4+ separated fields | `parse` returns `None` |
//! | Empty input | `""` | `parse` returns `None` |
//! | Non-script second field | e.g. `"ja-US"` | `parse` returns `None` |
//! | Bad script/region in triple | e.g. `"sr-CYRL-BA"` | Component dropped |

use std::fmt;

/// A validated language / script / region triple.
///
/// Components are checked for *form* only (length and case class),
/// never against a registry of real-world codes.
///
/// # Example
/// ```
/// use emopick_locale::LocaleIdentifier;
///
/// let id = LocaleIdentifier::parse("sr-Cyrl-BA").unwrap();
/// assert_eq!(id.language(), "sr");
/// assert_eq!(id.script(), Some("Cyrl"));
/// assert_eq!(id.region(), Some("BA"));
/// assert_eq!(id.to_string(), "sr_Cyrl_BA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleIdentifier {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl LocaleIdentifier {
    /// Parse a raw identifier string.
    ///
    /// Accepts one to three components separated by `-` or `_`:
    /// language, optional script, optional region. With exactly two
    /// components the second must satisfy the script form; a region
    /// code is only recognized in the third position.
    ///
    /// Returns `None` when no well-formed language code can be
    /// extracted or when the overall shape is unrecognizable. The
    /// caller is expected to fall back to a known-good default
    /// locale in that case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.replace('-', "_");
        let parts: Vec<&str> = normalized.split('_').collect();

        match parts.as_slice() {
            [language] => {
                let language = check_language(language)?;
                Some(Self {
                    language,
                    script: None,
                    region: None,
                })
            }
            [language, second] => {
                let language = check_language(language)?;
                // In the two-component shape the second field is a
                // script; a region is only valid in the third
                // position. "ja-US" therefore fails here while
                // "ja-Jpan-US" or the language-only mode succeed.
                let script = check_script(second)?;
                Some(Self {
                    language,
                    script: Some(script),
                    region: None,
                })
            }
            [language, script, region] => {
                let language = check_language(language)?;
                Some(Self {
                    language,
                    script: check_script(script),
                    region: check_region(region),
                })
            }
            _ => None,
        }
    }

    /// Parse keeping only the language component.
    ///
    /// Truncation mode for callers that want maximum fallback
    /// generality: script and region are discarded before any
    /// resource planning, so `"ja-US"` resolves the same as `"ja"`.
    /// Still returns `None` when the language component itself is
    /// malformed.
    #[must_use]
    pub fn parse_language_only(raw: &str) -> Option<Self> {
        let normalized = raw.replace('-', "_");
        let first = normalized.split('_').next()?;
        let language = check_language(first)?;
        Some(Self {
            language,
            script: None,
            region: None,
        })
    }

    /// The language code (2–3 lowercase ASCII letters).
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The script code (4 letters, titlecase), if present and valid.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// The region code (2 uppercase letters or 3 digits), if present
    /// and valid.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for LocaleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "_{script}")?;
        }
        if let Some(region) = &self.region {
            write!(f, "_{region}")?;
        }
        Ok(())
    }
}

/// 2–3 lowercase ASCII letters.
fn check_language(s: &str) -> Option<String> {
    let ok = (2..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_lowercase());
    ok.then(|| s.to_string())
}

/// Exactly 4 ASCII letters in titlecase form: first uppercase, rest
/// lowercase (e.g. `Cyrl`, `Hant`).
fn check_script(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let ok = bytes.len() == 4
        && bytes[0].is_ascii_uppercase()
        && bytes[1..].iter().all(u8::is_ascii_lowercase);
    ok.then(|| s.to_string())
}

/// 2 uppercase ASCII letters, or 3 ASCII digits (UN M.49 area codes).
fn check_region(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let ok = (bytes.len() == 2 && bytes.iter().all(u8::is_ascii_uppercase))
        || (bytes.len() == 3 && bytes.iter().all(u8::is_ascii_digit));
    ok.then(|| s.to_string())
}
