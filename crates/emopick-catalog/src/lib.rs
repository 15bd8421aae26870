#![forbid(unsafe_code)]

//! Emoji catalog construction, annotation overlay, and keyword
//! search.
//!
//! The catalog is built in one pass from the Unicode `emoji-test.txt`
//! format into an id-addressed set of linked records (qualification
//! variants, skin-tone modifier sequences, stable display order,
//! grouping). Locale-specific search keywords and text-to-speech
//! names are then overlaid from CLDR-style annotation documents in
//! base-then-regional order, last writer wins.
//!
//! Typical use goes through the [`EmojiCatalog`] façade:
//! construct over a [`ResourceStore`], `load` a locale, `search`.
//! [`SearchDispatcher`] moves searches off the caller's thread when
//! a UI needs that.

pub mod annotations;
pub mod builder;
pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod record;

pub use annotations::{DirStore, MemoryStore, ResourceKind, ResourceStore};
pub use builder::{CatalogBuilder, ParseMode};
pub use catalog::{CATALOG_SOURCE_FILE, EmojiCatalog, Section};
pub use dispatch::{SearchDispatcher, SearchRequest};
pub use error::CatalogError;
pub use record::{EmojiRecord, QualificationStatus, RecordId, RecordSet};
