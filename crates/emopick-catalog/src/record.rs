//! The catalog data model: records, qualification statuses, and the
//! id-addressed record set.
//!
//! # Invariants
//!
//! 1. **Unique key**: `character` is unique across a [`RecordSet`];
//!    the set is a mapping from grapheme to record.
//!
//! 2. **Stable ids**: a [`RecordId`] stays valid for the lifetime of
//!    the `RecordSet` it came from; records are never removed.
//!
//! 3. **Back-reference symmetry**: every id in a base record's
//!    `modifier_variants` names a record whose `canonical_base` is
//!    that base; likewise `degraded_forms` / `fully_qualified_form`.
//!
//! Relationship fields hold [`RecordId`]s rather than references, so
//! the variant graph (which is cyclic in both directions) needs no
//! shared-ownership cycles while keeping O(1) traversal both ways.

use smallvec::SmallVec;

use rustc_hash::FxHashMap;

/// Skin-tone modifier scalars (Fitzpatrick types 1-2 through 6).
const SKIN_TONE_MODIFIERS: std::ops::RangeInclusive<char> = '\u{1F3FB}'..='\u{1F3FF}';

/// Scalar sequence of one emoji. Inline capacity covers every
/// sequence in the current source data.
pub type ScalarSequence = SmallVec<[char; 10]>;

/// Index of a record within its [`RecordSet`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub(crate) u32);

impl RecordId {
    /// Position in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unicode qualification status of a code-point sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualificationStatus {
    /// Building block (skin tones, hair styles); never shown alone.
    Component,
    /// The fully presentable form.
    FullyQualified,
    /// Missing some, but not all, required variation selectors.
    MinimallyQualified,
    /// Missing all required variation selectors.
    Unqualified,
}

impl QualificationStatus {
    /// Map a source-data status keyword. Unknown keywords yield
    /// `None`, which the parser treats as "not a data row".
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "component" => Some(Self::Component),
            "fully-qualified" => Some(Self::FullyQualified),
            "minimally-qualified" => Some(Self::MinimallyQualified),
            "unqualified" => Some(Self::Unqualified),
            _ => None,
        }
    }
}

/// One catalog entry: a distinct code-point sequence from the source
/// data, its placement, and its locale-dependent annotation fields.
///
/// Identity fields (`character`, `status`, `display_order`, `group`,
/// `subgroup`) are fixed at parse time; `annotation` and
/// `text_to_speech` are overwritten by annotation overlays and may
/// be refreshed any number of times without rebuilding the set.
#[derive(Debug, Clone)]
pub struct EmojiRecord {
    character: String,
    status: QualificationStatus,
    display_order: u32,
    group: String,
    subgroup: String,
    is_modifier_sequence: bool,
    annotation: String,
    text_to_speech: String,
    canonical_base: Option<RecordId>,
    modifier_variants: Vec<RecordId>,
    fully_qualified_form: Option<RecordId>,
    degraded_forms: Vec<RecordId>,
}

impl EmojiRecord {
    pub(crate) fn new(
        scalars: &ScalarSequence,
        status: QualificationStatus,
        display_order: u32,
        group: &str,
        subgroup: &str,
    ) -> Self {
        Self {
            character: scalars.iter().collect(),
            status,
            display_order,
            group: group.to_string(),
            subgroup: subgroup.to_string(),
            is_modifier_sequence: is_modifier_sequence(scalars),
            annotation: String::new(),
            text_to_speech: String::new(),
            canonical_base: None,
            modifier_variants: Vec::new(),
            fully_qualified_form: None,
            degraded_forms: Vec::new(),
        }
    }

    /// The grapheme cluster identifying this record.
    #[must_use]
    pub fn character(&self) -> &str {
        &self.character
    }

    /// Qualification status from the source data.
    #[must_use]
    pub fn status(&self) -> QualificationStatus {
        self.status
    }

    /// Zero-based position among all data rows in the source text.
    #[must_use]
    pub fn display_order(&self) -> u32 {
        self.display_order
    }

    /// Group header the record appeared under.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Subgroup header the record appeared under.
    #[must_use]
    pub fn subgroup(&self) -> &str {
        &self.subgroup
    }

    /// Whether the sequence carries a skin-tone modifier scalar.
    #[must_use]
    pub fn is_modifier_sequence(&self) -> bool {
        self.is_modifier_sequence
    }

    /// Pipe-delimited search keywords for the loaded locale. Empty
    /// until an annotation overlay supplies a value.
    #[must_use]
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Canonical spoken name for the loaded locale. Empty until an
    /// annotation overlay supplies a value.
    #[must_use]
    pub fn text_to_speech(&self) -> &str {
        &self.text_to_speech
    }

    /// For a modifier sequence: the fully-qualified non-modifier
    /// record it derives from.
    #[must_use]
    pub fn canonical_base(&self) -> Option<RecordId> {
        self.canonical_base
    }

    /// For a variation base: its skin-tone modifier sequences, in
    /// source order.
    #[must_use]
    pub fn modifier_variants(&self) -> &[RecordId] {
        &self.modifier_variants
    }

    /// For a minimally-qualified or unqualified record: the
    /// fully-qualified record it degrades from.
    #[must_use]
    pub fn fully_qualified_form(&self) -> Option<RecordId> {
        self.fully_qualified_form
    }

    /// For a fully-qualified record: its minimally-qualified and
    /// unqualified variants, in source order.
    #[must_use]
    pub fn degraded_forms(&self) -> &[RecordId] {
        &self.degraded_forms
    }

    pub(crate) fn set_annotation(&mut self, value: &str) {
        self.annotation = value.to_string();
    }

    pub(crate) fn set_text_to_speech(&mut self, value: &str) {
        self.text_to_speech = value.to_string();
    }

    pub(crate) fn clear_annotations(&mut self) {
        self.annotation.clear();
        self.text_to_speech.clear();
    }
}

/// True iff a skin-tone modifier scalar appears in a non-initial
/// position of the sequence. A lone modifier scalar (the component
/// rows for the tones themselves) is not a modifier *sequence*, and
/// a ZWJ multi-person sequence without any modifier scalar is not
/// one either.
#[must_use]
pub fn is_modifier_sequence(scalars: &ScalarSequence) -> bool {
    scalars
        .iter()
        .skip(1)
        .any(|c| SKIN_TONE_MODIFIERS.contains(c))
}

/// The fully linked record set produced by one catalog build.
///
/// Records live in an arena indexed by [`RecordId`]; `by_character`
/// maps graphemes to ids, and `ordered_for_keyboard` holds the ids
/// of fully-qualified, non-modifier-sequence records in display
/// order. Component rows and variants stay reachable through the
/// character index and the relationship fields but never appear in
/// the keyboard order.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    arena: Vec<EmojiRecord>,
    by_character: FxHashMap<String, RecordId>,
    ordered_for_keyboard: Vec<RecordId>,
}

impl RecordSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning its id. The caller guarantees the
    /// character is not already present. The arena stays far below
    /// `u32::MAX` (the source data has a few thousand rows).
    pub(crate) fn insert(&mut self, record: EmojiRecord) -> RecordId {
        let id = RecordId(self.arena.len() as u32);
        self.by_character.insert(record.character.clone(), id);
        self.arena.push(record);
        id
    }

    pub(crate) fn push_keyboard_order(&mut self, id: RecordId) {
        self.ordered_for_keyboard.push(id);
    }

    pub(crate) fn link_modifier_variant(&mut self, base: RecordId, variant: RecordId) {
        self.arena[variant.index()].canonical_base = Some(base);
        self.arena[base.index()].modifier_variants.push(variant);
    }

    pub(crate) fn link_degraded_form(&mut self, full: RecordId, degraded: RecordId) {
        self.arena[degraded.index()].fully_qualified_form = Some(full);
        self.arena[full.index()].degraded_forms.push(degraded);
    }

    /// Record by id.
    #[must_use]
    pub fn record(&self, id: RecordId) -> &EmojiRecord {
        &self.arena[id.index()]
    }

    pub(crate) fn record_mut(&mut self, id: RecordId) -> &mut EmojiRecord {
        &mut self.arena[id.index()]
    }

    /// Record id for a grapheme, if the catalog knows it.
    #[must_use]
    pub fn id_for(&self, character: &str) -> Option<RecordId> {
        self.by_character.get(character).copied()
    }

    /// Record for a grapheme, if the catalog knows it.
    #[must_use]
    pub fn by_character(&self, character: &str) -> Option<&EmojiRecord> {
        self.id_for(character).map(|id| self.record(id))
    }

    /// Number of records in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Ids of all records in arena (= insertion) order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        (0..self.arena.len() as u32).map(RecordId)
    }

    /// Ids of keyboard-display records in display order.
    #[must_use]
    pub fn keyboard_order(&self) -> &[RecordId] {
        &self.ordered_for_keyboard
    }

    /// Keyboard-display records in display order.
    pub fn keyboard_records(&self) -> impl Iterator<Item = &EmojiRecord> {
        self.ordered_for_keyboard.iter().map(|id| self.record(*id))
    }

    /// All records in arena (= insertion = display) order.
    pub fn records(&self) -> impl Iterator<Item = &EmojiRecord> {
        self.arena.iter()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut EmojiRecord> {
        self.arena.iter_mut()
    }
}
