//! The catalog façade: load, annotate, and search.
//!
//! # Invariants
//!
//! 1. **Two states**: a catalog is `Unloaded` until the first
//!    successful [`EmojiCatalog::load`], then `Loaded` until dropped.
//!    A reload replaces the whole record set; callers never observe
//!    a partially built catalog.
//!
//! 2. **Queries require `Loaded`**: searching or iterating an
//!    unloaded catalog is a programming error and panics. A soft
//!    empty result would mislead callers into treating the data set
//!    as genuinely empty.
//!
//! 3. **No internal locking**: `load`/`reload_annotations` take
//!    `&mut self` and queries take `&self`; concurrent use across
//!    threads is coordinated by the owner (see [`crate::dispatch`]).

use emopick_locale::{LocaleIdentifier, resource_names};

use crate::annotations::{self, ResourceKind, ResourceStore};
use crate::builder::{CatalogBuilder, ParseMode};
use crate::error::CatalogError;
use crate::record::{EmojiRecord, RecordSet};

/// File name of the catalog source text within the resource store.
pub const CATALOG_SOURCE_FILE: &str = "emoji-test.txt";

enum State {
    Unloaded,
    Loaded(RecordSet),
}

/// Emoji catalog with locale-resolved annotations.
///
/// Construct with a [`ResourceStore`] holding the catalog source
/// text and the annotation documents, call [`load`](Self::load)
/// once, then query. The store is consulted again on every load and
/// annotation reload.
///
/// # Example
/// ```
/// use emopick_catalog::{EmojiCatalog, MemoryStore, CATALOG_SOURCE_FILE};
/// use emopick_locale::LocaleIdentifier;
///
/// let mut store = MemoryStore::new();
/// store.insert(CATALOG_SOURCE_FILE, "1F600 ; fully-qualified # grinning face\n");
/// store.insert(
///     "en.xml",
///     r#"<ldml><annotations><annotation cp="😀">face | grin</annotation></annotations></ldml>"#,
/// );
///
/// let mut catalog = EmojiCatalog::new(store);
/// catalog.load(&LocaleIdentifier::parse("en").unwrap()).unwrap();
/// assert_eq!(catalog.search("grin").len(), 1);
/// ```
pub struct EmojiCatalog {
    store: Box<dyn ResourceStore + Send + Sync>,
    parse_mode: ParseMode,
    state: State,
}

impl EmojiCatalog {
    /// Catalog over the given store, lenient parse mode, unloaded.
    #[must_use]
    pub fn new(store: impl ResourceStore + Send + Sync + 'static) -> Self {
        Self {
            store: Box::new(store),
            parse_mode: ParseMode::Lenient,
            state: State::Unloaded,
        }
    }

    /// Switch the source parse mode (strict is meant for test
    /// configurations; see [`ParseMode`]).
    pub fn set_parse_mode(&mut self, mode: ParseMode) {
        self.parse_mode = mode;
    }

    /// Whether `load` has succeeded at least once.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    /// Build the catalog from the source text and overlay the
    /// locale's annotation resources (primary, then derived).
    ///
    /// On success the previous record set, if any, is replaced
    /// wholesale. On failure the previous state is kept untouched.
    pub fn load(&mut self, locale: &LocaleIdentifier) -> Result<(), CatalogError> {
        let source = self.read_source()?;
        let builder = match self.parse_mode {
            ParseMode::Lenient => CatalogBuilder::new(),
            ParseMode::Strict => CatalogBuilder::strict(),
        };
        let mut set = builder.build(&source)?;
        Self::overlay(&mut set, locale, self.store.as_ref())?;
        tracing::debug!(locale = %locale, records = set.len(), "catalog loaded");
        self.state = State::Loaded(set);
        Ok(())
    }

    /// Re-run only the annotation overlay for a new locale, leaving
    /// the structural links untouched. All annotation fields are
    /// cleared first, so no values from the previous locale linger.
    ///
    /// # Panics
    /// Panics if the catalog has never been loaded; reloading
    /// annotations without a catalog is a contract violation.
    pub fn reload_annotations(&mut self, locale: &LocaleIdentifier) -> Result<(), CatalogError> {
        let State::Loaded(set) = &mut self.state else {
            panic!("EmojiCatalog::reload_annotations called before load");
        };
        for record in set.records_mut() {
            record.clear_annotations();
        }
        Self::overlay(set, locale, self.store.as_ref())?;
        tracing::debug!(locale = %locale, "annotations reloaded");
        Ok(())
    }

    fn overlay(
        set: &mut RecordSet,
        locale: &LocaleIdentifier,
        store: &dyn ResourceStore,
    ) -> Result<(), CatalogError> {
        let names = resource_names(locale);
        annotations::apply(set, &names, ResourceKind::Primary, store)?;
        annotations::apply(set, &names, ResourceKind::Derived, store)?;
        Ok(())
    }

    fn read_source(&self) -> Result<String, CatalogError> {
        match self.store.read(CATALOG_SOURCE_FILE) {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(CatalogError::MissingCatalogSource {
                file_name: CATALOG_SOURCE_FILE.to_string(),
            }),
            Err(err) => Err(CatalogError::unreadable(CATALOG_SOURCE_FILE, &err)),
        }
    }

    /// The loaded record set.
    ///
    /// # Panics
    /// Panics if the catalog has never been loaded.
    #[must_use]
    pub fn records(&self) -> &RecordSet {
        match &self.state {
            State::Loaded(set) => set,
            State::Unloaded => panic!("EmojiCatalog queried before load"),
        }
    }

    /// Keyword search over the keyboard-display records.
    ///
    /// A record matches when at least one `|`-delimited segment of
    /// its annotation, trimmed of surrounding whitespace, *starts
    /// with* the keyword (case-sensitive). Results keep display
    /// order. The empty keyword returns an empty result by
    /// convention, distinct from "no filter".
    ///
    /// # Panics
    /// Panics if the catalog has never been loaded.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&EmojiRecord> {
        let set = self.records();
        if keyword.is_empty() {
            return Vec::new();
        }
        set.keyboard_records()
            .filter(|record| {
                record
                    .annotation()
                    .split('|')
                    .any(|segment| segment.trim().starts_with(keyword))
            })
            .collect()
    }

    /// Keyboard-display records grouped into consecutive
    /// (group, subgroup) sections, for section rendering.
    ///
    /// # Panics
    /// Panics if the catalog has never been loaded.
    #[must_use]
    pub fn sections(&self) -> Vec<Section<'_>> {
        let set = self.records();
        let mut sections: Vec<Section<'_>> = Vec::new();
        for record in set.keyboard_records() {
            match sections.last_mut() {
                Some(section)
                    if section.group == record.group()
                        && section.subgroup == record.subgroup() =>
                {
                    section.records.push(record);
                }
                _ => sections.push(Section {
                    group: record.group(),
                    subgroup: record.subgroup(),
                    records: vec![record],
                }),
            }
        }
        sections
    }

    /// Record for a grapheme, if the catalog knows it. Used by the
    /// presentation layer to resolve its externally-owned
    /// recently-used list.
    ///
    /// # Panics
    /// Panics if the catalog has never been loaded.
    #[must_use]
    pub fn record(&self, character: &str) -> Option<&EmojiRecord> {
        self.records().by_character(character)
    }
}

/// A run of keyboard-display records sharing a group and subgroup.
#[derive(Debug)]
pub struct Section<'a> {
    pub group: &'a str,
    pub subgroup: &'a str,
    pub records: Vec<&'a EmojiRecord>,
}
