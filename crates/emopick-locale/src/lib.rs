#![forbid(unsafe_code)]

//! Locale identifier parsing and resource fallback planning for emopick.
//!
//! Turns loosely-formed BCP-47-like strings (`"sr-Cyrl-BA"`,
//! `"ja_JP"`) into validated [`LocaleIdentifier`]s and maps them to
//! the ordered list of annotation resource names the overlay layer
//! consumes, least specific first.
//!
//! Only the *shape* of each component is checked. Whether `"qq"` is a
//! real language is out of scope here; the resource lookup simply
//! finds no file for it.

pub mod identifier;
pub mod resolver;

pub use identifier::LocaleIdentifier;
pub use resolver::resource_names;
