//! Annotation overlay: CLDR-style annotation resources applied onto
//! a built record set.
//!
//! Resource names come from the locale resolver in
//! least-to-most-specific order; each loaded file overwrites the
//! annotation or text-to-speech field of every record it mentions.
//! Last writer wins — the regional file's value replaces the base
//! file's, never merges with it.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Resource name has no file | locale lacks an overlay | Skipped silently |
//! | File unreadable or not XML | packaging defect | `CatalogError::CorruptResource` |
//! | `cp` unknown to the catalog | resource covers more emoji | Entry ignored |
//! | No resource mentions a record | sparse locale | Fields stay empty |

use std::io;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::error::CatalogError;
use crate::record::RecordSet;

/// Which of the two annotation documents a name refers to.
///
/// The primary document covers single-character emoji; the derived
/// document covers multi-scalar sequences (skin tones, flags) and
/// lives beside it under the `_derived` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Primary,
    Derived,
}

impl ResourceKind {
    /// File name for a resolved resource name.
    #[must_use]
    pub fn file_name(self, resource_name: &str) -> String {
        match self {
            Self::Primary => format!("{resource_name}.xml"),
            Self::Derived => format!("{resource_name}_derived.xml"),
        }
    }
}

/// Read access to bundled resource files.
///
/// `Ok(None)` means the file does not exist — expected for most
/// regional overlays and skipped without comment. `Err` means the
/// file exists but could not be read, which the overlay reports as a
/// corrupt resource.
pub trait ResourceStore {
    fn read(&self, file_name: &str) -> io::Result<Option<String>>;
}

/// Store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceStore for DirStore {
    fn read(&self, file_name: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.root.join(file_name)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Store backed by in-memory file contents, for embedded resources
/// (`include_str!`) and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: FxHashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(file_name.into(), contents.into());
    }
}

impl ResourceStore for MemoryStore {
    fn read(&self, file_name: &str) -> io::Result<Option<String>> {
        Ok(self.files.get(file_name).cloned())
    }
}

/// Apply one kind of annotation resource for each name, in order,
/// onto the record set.
///
/// Mutates matching records in place. Returns an error only for a
/// present-but-unreadable or unparseable file; a missing file and an
/// unknown `cp` are both no-ops.
pub fn apply(
    set: &mut RecordSet,
    resource_names: &[String],
    kind: ResourceKind,
    store: &dyn ResourceStore,
) -> Result<(), CatalogError> {
    for name in resource_names {
        let file_name = kind.file_name(name);
        let Some(text) = store
            .read(&file_name)
            .map_err(|err| CatalogError::unreadable(&file_name, &err))?
        else {
            tracing::debug!(file = %file_name, "annotation resource not present");
            continue;
        };
        apply_document(set, &file_name, &text)?;
    }
    Ok(())
}

/// Overlay a single parsed document onto the set.
fn apply_document(set: &mut RecordSet, file_name: &str, text: &str) -> Result<(), CatalogError> {
    let document =
        roxmltree::Document::parse(text).map_err(|err| CatalogError::corrupt(file_name, &err))?;

    let mut applied = 0usize;
    for node in document
        .descendants()
        .filter(|n| n.has_tag_name("annotation"))
    {
        let Some(cp) = node.attribute("cp") else {
            continue;
        };
        let Some(phrase) = node.text() else {
            continue;
        };
        // The cp attribute holds the sequence as literal characters,
        // matching the catalog key form directly.
        let Some(id) = set.id_for(cp) else {
            continue;
        };
        let record = set.record_mut(id);
        if node.attribute("type") == Some("tts") {
            record.set_text_to_speech(phrase.trim());
        } else {
            record.set_annotation(phrase.trim());
        }
        applied += 1;
    }

    tracing::debug!(file = %file_name, applied, "annotation resource applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CatalogBuilder;

    const SOURCE: &str = "\
# group: Smileys & Emotion
# subgroup: face-smiling
1F600 ; fully-qualified # grinning face
# group: People & Body
# subgroup: hand-fingers-open
1F44B 1F3FD ; fully-qualified # waving hand: medium skin tone
";

    fn built() -> RecordSet {
        CatalogBuilder::new().build(SOURCE).unwrap()
    }

    fn store_with(files: &[(&str, &str)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for (name, contents) in files {
            store.insert(*name, *contents);
        }
        store
    }

    #[test]
    fn annotation_and_tts_fields_routed_by_type() {
        let mut set = built();
        let store = store_with(&[(
            "en.xml",
            r#"<ldml><annotations>
                <annotation cp="😀">face | grin | grinning face</annotation>
                <annotation cp="😀" type="tts">grinning face</annotation>
            </annotations></ldml>"#,
        )]);
        apply(&mut set, &["en".into()], ResourceKind::Primary, &store).unwrap();
        let grin = set.by_character("😀").unwrap();
        assert_eq!(grin.annotation(), "face | grin | grinning face");
        assert_eq!(grin.text_to_speech(), "grinning face");
    }

    #[test]
    fn later_resource_wins() {
        let mut set = built();
        let store = store_with(&[
            (
                "sr_Cyrl.xml",
                r#"<ldml><annotations><annotation cp="😀">base value</annotation></annotations></ldml>"#,
            ),
            (
                "sr_Cyrl_BA.xml",
                r#"<ldml><annotations><annotation cp="😀">regional value</annotation></annotations></ldml>"#,
            ),
        ]);
        apply(
            &mut set,
            &["sr_Cyrl".into(), "sr_Cyrl_BA".into()],
            ResourceKind::Primary,
            &store,
        )
        .unwrap();
        assert_eq!(set.by_character("😀").unwrap().annotation(), "regional value");
    }

    #[test]
    fn overwrite_replaces_not_concatenates() {
        let mut set = built();
        let store = store_with(&[
            (
                "en.xml",
                r#"<ldml><annotations><annotation cp="😀">one | two</annotation></annotations></ldml>"#,
            ),
            (
                "en_GB.xml",
                r#"<ldml><annotations><annotation cp="😀">three</annotation></annotations></ldml>"#,
            ),
        ]);
        apply(
            &mut set,
            &["en".into(), "en_GB".into()],
            ResourceKind::Primary,
            &store,
        )
        .unwrap();
        assert_eq!(set.by_character("😀").unwrap().annotation(), "three");
    }

    #[test]
    fn missing_resources_are_skipped() {
        let mut set = built();
        let store = store_with(&[(
            "en.xml",
            r#"<ldml><annotations><annotation cp="😀">face</annotation></annotations></ldml>"#,
        )]);
        // en_US.xml does not exist; not an error.
        apply(
            &mut set,
            &["en".into(), "en_US".into()],
            ResourceKind::Primary,
            &store,
        )
        .unwrap();
        assert_eq!(set.by_character("😀").unwrap().annotation(), "face");
    }

    #[test]
    fn derived_kind_reads_suffixed_file() {
        let mut set = built();
        let store = store_with(&[(
            "en_derived.xml",
            r#"<ldml><annotations>
                <annotation cp="👋🏽">hand | wave | medium skin tone</annotation>
                <annotation cp="👋🏽" type="tts">waving hand: medium skin tone</annotation>
            </annotations></ldml>"#,
        )]);
        apply(&mut set, &["en".into()], ResourceKind::Derived, &store).unwrap();
        let wave = set.by_character("👋🏽").unwrap();
        assert_eq!(wave.text_to_speech(), "waving hand: medium skin tone");
    }

    #[test]
    fn unknown_cp_is_ignored() {
        let mut set = built();
        let store = store_with(&[(
            "en.xml",
            r#"<ldml><annotations><annotation cp="🦖">not in this catalog</annotation></annotations></ldml>"#,
        )]);
        apply(&mut set, &["en".into()], ResourceKind::Primary, &store).unwrap();
        assert_eq!(set.by_character("😀").unwrap().annotation(), "");
    }

    #[test]
    fn corrupt_xml_is_an_error() {
        let mut set = built();
        let store = store_with(&[("en.xml", "<ldml><annotations><annotation")]);
        let err = apply(&mut set, &["en".into()], ResourceKind::Primary, &store).unwrap_err();
        assert!(matches!(err, CatalogError::CorruptResource { .. }));
    }

    #[test]
    fn unreadable_resource_is_an_error() {
        struct FailingStore;
        impl ResourceStore for FailingStore {
            fn read(&self, _file_name: &str) -> io::Result<Option<String>> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }
        let mut set = built();
        let err = apply(
            &mut set,
            &["en".into()],
            ResourceKind::Primary,
            &FailingStore,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::CorruptResource { .. }));
    }

    #[test]
    fn records_without_entries_keep_empty_fields() {
        let mut set = built();
        let store = MemoryStore::new();
        apply(&mut set, &["zz".into()], ResourceKind::Primary, &store).unwrap();
        let grin = set.by_character("😀").unwrap();
        assert_eq!(grin.annotation(), "");
        assert_eq!(grin.text_to_speech(), "");
    }
}
