//! Single-pass construction of the record set from the Unicode
//! `emoji-test.txt` format.
//!
//! The source text is ordered so that a fully-qualified variation
//! base precedes all of its minimally-qualified, unqualified, and
//! skin-tone variants. Two "last seen" cursors (`variation_base`,
//! `last_fully_qualified`) therefore reconstruct the whole variant
//! tree in one forward pass with no lookahead. This ordering is a
//! format precondition, not something the parser verifies: reordered
//! input silently produces wrong links rather than an error, in
//! either parse mode.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown status keyword | future data revision | Row skipped as comment (lenient) |
//! | Bad hex / empty sequence | malformed row | Row skipped as comment (lenient) |
//! | Any of the above, strict mode | same | `CatalogError::StrictParse` |
//! | Out-of-order rows | precondition violated | Wrong links, no error |

use unicode_segmentation::UnicodeSegmentation;

use crate::error::CatalogError;
use crate::record::{EmojiRecord, QualificationStatus, RecordSet, ScalarSequence};

/// How the builder treats lines that look like data rows but fail to
/// parse as one.
///
/// Lenient is the default and matches the source format's
/// forward-compatibility posture: unknown future row shapes must not
/// break existing readers. Strict surfaces them instead, for test
/// configurations that want to notice a data revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Malformed data-shaped rows are reclassified as comments.
    #[default]
    Lenient,
    /// Malformed data-shaped rows abort the build.
    Strict,
}

/// Parser for the catalog source text.
///
/// `build` is a pure function of the input: identical text yields an
/// identical record set, including identical display orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBuilder {
    mode: ParseMode,
}

impl CatalogBuilder {
    /// Lenient builder (the default).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict builder; see [`ParseMode::Strict`].
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }

    /// Parse the source text into a fully linked [`RecordSet`].
    ///
    /// Lenient mode never fails; strict mode fails on the first
    /// malformed data-shaped row.
    pub fn build(&self, raw: &str) -> Result<RecordSet, CatalogError> {
        let mut set = RecordSet::new();
        let mut current_group = String::new();
        let mut current_subgroup = String::new();
        let mut variation_base = None;
        let mut last_fully_qualified = None;
        // Advanced for every non-component data row, so the orders
        // handed to keyboard-facing records stay contiguous from 0.
        // Component rows take the current position without advancing
        // it.
        let mut order: u32 = 0;
        let mut skipped = 0usize;

        for (line_index, raw_line) in raw.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim_start();
                if let Some(name) = comment.strip_prefix("group:") {
                    current_group = name.trim().to_string();
                    current_subgroup.clear();
                } else if let Some(name) = comment.strip_prefix("subgroup:") {
                    current_subgroup = name.trim().to_string();
                }
                continue;
            }

            let Some((scalars, status)) = parse_data_row(line) else {
                match self.mode {
                    ParseMode::Lenient => {
                        tracing::debug!(line = line_index + 1, "skipping malformed row");
                        skipped += 1;
                        continue;
                    }
                    ParseMode::Strict => {
                        return Err(CatalogError::StrictParse {
                            line_number: line_index + 1,
                            line: line.to_string(),
                        });
                    }
                }
            };

            let record =
                EmojiRecord::new(&scalars, status, order, &current_group, &current_subgroup);
            if record.character().graphemes(true).count() > 1 {
                // Not expected from real source data; worth a trace
                // if a future revision emits such a sequence.
                tracing::debug!(
                    character = record.character(),
                    "data row spans multiple grapheme clusters"
                );
            }
            let is_modifier = record.is_modifier_sequence();
            let id = match set.id_for(record.character()) {
                Some(existing) => existing,
                None => set.insert(record),
            };

            match status {
                QualificationStatus::FullyQualified => {
                    if is_modifier {
                        if let Some(base) = variation_base {
                            set.link_modifier_variant(base, id);
                        }
                    } else {
                        variation_base = Some(id);
                        set.push_keyboard_order(id);
                    }
                    last_fully_qualified = Some(id);
                    order += 1;
                }
                QualificationStatus::MinimallyQualified | QualificationStatus::Unqualified => {
                    if let Some(full) = last_fully_qualified {
                        set.link_degraded_form(full, id);
                    }
                    order += 1;
                }
                QualificationStatus::Component => {}
            }
        }

        tracing::debug!(
            records = set.len(),
            keyboard = set.keyboard_order().len(),
            skipped,
            "catalog build complete"
        );
        Ok(set)
    }
}

/// Parse one `<hex scalars> ; <status> # comment` row. `None` means
/// the line is not a well-formed data row.
fn parse_data_row(line: &str) -> Option<(ScalarSequence, QualificationStatus)> {
    let mut fields = line.split(';');
    let scalars_field = fields.next()?;
    let status_field = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let mut scalars = ScalarSequence::new();
    for token in scalars_field.split_whitespace() {
        let value = u32::from_str_radix(token, 16).ok()?;
        scalars.push(char::from_u32(value)?);
    }
    if scalars.is_empty() {
        return None;
    }

    // The status field carries a trailing `#`-introduced comment.
    let status = status_field
        .split('#')
        .next()
        .unwrap_or_default()
        .trim();
    let status = QualificationStatus::from_keyword(status)?;

    Some((scalars, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::QualificationStatus;
    use proptest::prelude::*;

    const SAMPLE: &str = "\
# emoji-test.txt
# Date: 2024-08-14
# group: Smileys & Emotion

# subgroup: face-smiling
1F600                                                  ; fully-qualified     # \u{1F600} E1.0 grinning face
263A FE0F                                              ; fully-qualified     # \u{263A}\u{FE0F} E0.6 smiling face
263A                                                   ; unqualified         # \u{263A} E0.6 smiling face

# group: People & Body
# subgroup: hand-fingers-open
1F44B                                                  ; fully-qualified     # \u{1F44B} E0.6 waving hand
1F44B 1F3FB                                            ; fully-qualified     # \u{1F44B}\u{1F3FB} E1.0 waving hand: light skin tone
1F44B 1F3FF                                            ; fully-qualified     # \u{1F44B}\u{1F3FF} E1.0 waving hand: dark skin tone

# subgroup: skin-tone
1F3FB                                                  ; component           # \u{1F3FB} E1.0 light skin tone
";

    fn build(raw: &str) -> RecordSet {
        CatalogBuilder::new().build(raw).unwrap()
    }

    #[test]
    fn groups_and_subgroups_assigned() {
        let set = build(SAMPLE);
        let grin = set.by_character("\u{1F600}").unwrap();
        assert_eq!(grin.group(), "Smileys & Emotion");
        assert_eq!(grin.subgroup(), "face-smiling");
        let wave = set.by_character("\u{1F44B}").unwrap();
        assert_eq!(wave.group(), "People & Body");
        assert_eq!(wave.subgroup(), "hand-fingers-open");
    }

    #[test]
    fn keyboard_order_is_fully_qualified_non_modifier_only() {
        let set = build(SAMPLE);
        let chars: Vec<&str> = set.keyboard_records().map(|r| r.character()).collect();
        assert_eq!(chars, vec!["\u{1F600}", "\u{263A}\u{FE0F}", "\u{1F44B}"]);
    }

    #[test]
    fn display_orders_contiguous_for_non_component() {
        let set = build(SAMPLE);
        let mut orders: Vec<u32> = set
            .records()
            .filter(|r| r.status() != QualificationStatus::Component)
            .map(|r| r.display_order())
            .collect();
        orders.sort_unstable();
        let expected: Vec<u32> = (0..orders.len() as u32).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn degraded_form_links_back() {
        let set = build(SAMPLE);
        let full = set.by_character("\u{263A}\u{FE0F}").unwrap();
        let degraded = set.by_character("\u{263A}").unwrap();
        let full_id = set.id_for("\u{263A}\u{FE0F}").unwrap();
        let degraded_id = set.id_for("\u{263A}").unwrap();
        assert_eq!(full.degraded_forms(), &[degraded_id]);
        assert_eq!(degraded.fully_qualified_form(), Some(full_id));
        assert_eq!(degraded.canonical_base(), None);
    }

    #[test]
    fn modifier_variants_link_back() {
        let set = build(SAMPLE);
        let base_id = set.id_for("\u{1F44B}").unwrap();
        let light_id = set.id_for("\u{1F44B}\u{1F3FB}").unwrap();
        let dark_id = set.id_for("\u{1F44B}\u{1F3FF}").unwrap();
        let base = set.record(base_id);
        assert_eq!(base.modifier_variants(), &[light_id, dark_id]);
        assert_eq!(set.record(light_id).canonical_base(), Some(base_id));
        assert_eq!(set.record(dark_id).canonical_base(), Some(base_id));
        assert!(set.record(light_id).is_modifier_sequence());
        assert!(!base.is_modifier_sequence());
    }

    #[test]
    fn component_rows_are_indexed_but_not_keyboard_visible() {
        let set = build(SAMPLE);
        let tone = set.by_character("\u{1F3FB}").unwrap();
        assert_eq!(tone.status(), QualificationStatus::Component);
        assert!(
            !set.keyboard_records()
                .any(|r| r.status() == QualificationStatus::Component)
        );
    }

    #[test]
    fn modifier_sequence_does_not_steal_variation_base() {
        // A fully-qualified modifier sequence must leave the cursor
        // on its base so later siblings link to the same base.
        let raw = "\
1F9D4                ; fully-qualified # bearded person
1F9D4 1F3FB          ; fully-qualified # light
1F9D4 1F3FC          ; fully-qualified # medium-light
";
        let set = build(raw);
        let base_id = set.id_for("\u{1F9D4}").unwrap();
        assert_eq!(set.record(base_id).modifier_variants().len(), 2);
    }

    #[test]
    fn degraded_form_links_to_last_fully_qualified_of_any_kind() {
        // An unqualified row after a modifier sequence degrades from
        // the modifier sequence, not from the variation base.
        let raw = "\
270B                 ; fully-qualified # raised hand
270B 1F3FB           ; fully-qualified # raised hand: light
270B 1F3FB FE0F      ; unqualified     # hypothetical degraded form
";
        let set = build(raw);
        let modifier_id = set.id_for("\u{270B}\u{1F3FB}").unwrap();
        let degraded_id = set.id_for("\u{270B}\u{1F3FB}\u{FE0F}").unwrap();
        assert_eq!(
            set.record(degraded_id).fully_qualified_form(),
            Some(modifier_id)
        );
    }

    #[test]
    fn lenient_mode_skips_malformed_rows() {
        let raw = "\
1F600 ; fully-qualified # fine
NOTHEX ; fully-qualified # bad scalars
1F601 ; non-rgi # unknown status
1F602 ; fully-qualified ; extra-field
 ; fully-qualified # empty scalars
random prose line
1F603 ; fully-qualified # fine again
";
        let set = build(raw);
        assert_eq!(set.len(), 2);
        // Skipped rows consume no display order.
        assert_eq!(set.by_character("\u{1F603}").unwrap().display_order(), 1);
    }

    #[test]
    fn strict_mode_rejects_malformed_rows() {
        let raw = "1F600 ; fully-qualified\nNOTHEX ; fully-qualified\n";
        let err = CatalogBuilder::strict().build(raw).unwrap_err();
        match err {
            CatalogError::StrictParse { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_mode_still_ignores_comments_and_headers() {
        let raw = "# free-form comment\n# group: Flags\n1F3C1 ; fully-qualified # chequered flag\n";
        let set = CatalogBuilder::strict().build(raw).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.by_character("\u{1F3C1}").unwrap().group(), "Flags");
    }

    #[test]
    fn surrogate_code_points_are_malformed() {
        let set = build("D800 ; fully-qualified # lone surrogate\n");
        assert!(set.is_empty());
    }

    #[test]
    fn build_is_idempotent() {
        let a = build(SAMPLE);
        let b = build(SAMPLE);
        let orders_a: Vec<u32> = a.records().map(|r| r.display_order()).collect();
        let orders_b: Vec<u32> = b.records().map(|r| r.display_order()).collect();
        assert_eq!(orders_a, orders_b);
        assert_eq!(a.keyboard_order(), b.keyboard_order());
    }

    proptest! {
        /// Any interleaving of well-formed rows yields contiguous
        /// display orders over the non-component records.
        #[test]
        fn non_component_orders_contiguous(
            statuses in proptest::collection::vec(0u8..4, 1..40)
        ) {
            let mut raw = String::from("1F600 ; fully-qualified # seed base\n");
            for (i, s) in statuses.iter().enumerate() {
                let cp = 0x1F400 + i as u32;
                let status = match s {
                    0 => "fully-qualified",
                    1 => "minimally-qualified",
                    2 => "unqualified",
                    _ => "component",
                };
                raw.push_str(&format!("{cp:X} ; {status}\n"));
            }
            let set = build(&raw);
            let mut orders: Vec<u32> = set
                .records()
                .filter(|r| r.status() != QualificationStatus::Component)
                .map(|r| r.display_order())
                .collect();
            orders.sort_unstable();
            for (expected, actual) in orders.iter().enumerate() {
                prop_assert_eq!(*actual as usize, expected);
            }
        }
    }
}
