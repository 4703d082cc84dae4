//! Term definitions and the color lookup table
//!
//! Definitions come from an external term file that was produced against a
//! colorized copy of the document: every definition and reference is located
//! by the colors of its first and last words.
//!
//! [`TermTable::build`] indexes the definitions by start marker and the
//! references by their own start marker. Input order matters: when two
//! definitions share a start marker the later one is moved onto its end
//! marker, so callers hand definitions over sorted by id ([`TermFile`] does).

use crate::color::ColorHex;
use crate::error::TermError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Start and end markers of one reference to a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceMarker {
    /// Color of the first word of the reference
    pub reference_start_hex: ColorHex,
    /// Color of the last word of the reference
    pub reference_end_hex: ColorHex,
}

/// A term definition located by color markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Record id from the term file
    pub id: u64,
    /// Term name
    pub name: String,
    /// Color of the first word of the definition
    pub term_start_hex: ColorHex,
    /// Color of the last word of the definition
    pub term_end_hex: ColorHex,
    /// References to this definition
    #[serde(default)]
    pub references: Vec<ReferenceMarker>,
}

impl Definition {
    /// Create a definition without references
    pub fn new(id: u64, name: impl Into<String>, start: ColorHex, end: ColorHex) -> Self {
        Self {
            id,
            name: name.into(),
            term_start_hex: start,
            term_end_hex: end,
            references: Vec::new(),
        }
    }

    /// Add a reference
    #[must_use]
    pub fn with_reference(mut self, start: ColorHex, end: ColorHex) -> Self {
        self.references.push(ReferenceMarker {
            reference_start_hex: start,
            reference_end_hex: end,
        });
        self
    }
}

/// Raw record as found in a term file, markers still unchecked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    /// Record id
    pub id: u64,
    /// Term name
    pub name: String,
    /// Start marker text
    pub term_start_hex: String,
    /// End marker text
    pub term_end_hex: String,
    /// Reference markers
    #[serde(default)]
    pub references: Vec<ReferenceRecord>,
}

/// Raw reference record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    /// Start marker text
    pub reference_start_hex: String,
    /// End marker text
    pub reference_end_hex: String,
}

impl TryFrom<TermRecord> for Definition {
    type Error = TermError;

    fn try_from(record: TermRecord) -> Result<Self, Self::Error> {
        let marker = |field: &'static str, value: &str| {
            ColorHex::parse(value).map_err(|source| TermError::InvalidMarker {
                id: record.id,
                name: record.name.clone(),
                field,
                source,
            })
        };

        let term_start_hex = marker("termStartHex", &record.term_start_hex)?;
        let term_end_hex = marker("termEndHex", &record.term_end_hex)?;
        let references = record
            .references
            .iter()
            .map(|r| {
                Ok(ReferenceMarker {
                    reference_start_hex: marker("referenceStartHex", &r.reference_start_hex)?,
                    reference_end_hex: marker("referenceEndHex", &r.reference_end_hex)?,
                })
            })
            .collect::<Result<Vec<_>, TermError>>()?;

        Ok(Self {
            id: record.id,
            name: record.name,
            term_start_hex,
            term_end_hex,
            references,
        })
    }
}

/// Definitions loaded from a term file, sorted by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFile {
    definitions: Vec<Definition>,
}

impl TermFile {
    /// Parse a JSON array of [`TermRecord`]s
    ///
    /// # Errors
    /// Malformed JSON or an invalid color marker.
    pub fn from_json(json: &str) -> Result<Self, TermError> {
        let records: Vec<TermRecord> = serde_json::from_str(json)?;
        let mut definitions = records
            .into_iter()
            .map(Definition::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        definitions.sort_by_key(|d| d.id);
        debug!(definitions = definitions.len(), "term file parsed");
        Ok(Self { definitions })
    }

    /// Read and parse a term file
    ///
    /// # Errors
    /// I/O failures, malformed JSON or an invalid color marker.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TermError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TermError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Definitions in id order
    #[inline]
    #[must_use]
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Consume into the sorted definitions
    #[must_use]
    pub fn into_definitions(self) -> Vec<Definition> {
        self.definitions
    }
}

/// Reference entry with the start marker of the definition it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Reference markers
    pub marker: ReferenceMarker,
    /// Start marker of the owning definition, after collision handling
    pub term_start_hex: ColorHex,
}

/// Color lookup table for one pass
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    definitions: HashMap<ColorHex, Definition>,
    references: HashMap<ColorHex, ResolvedReference>,
    collisions: usize,
    overwrites: usize,
}

impl TermTable {
    /// Index definitions in the order given
    ///
    /// A definition whose start marker is already taken is moved onto its
    /// end marker (a one-word span on its last word). If that marker is taken
    /// too, the later definition replaces the earlier one.
    pub fn build(definitions: impl IntoIterator<Item = Definition>) -> Self {
        let mut table = Self::default();

        for mut definition in definitions {
            if let Some(first) = table.definitions.get(&definition.term_start_hex) {
                warn!(
                    term_start_hex = %definition.term_start_hex,
                    first_id = first.id,
                    first_name = %first.name,
                    first_end = %first.term_end_hex,
                    second_id = definition.id,
                    second_name = %definition.name,
                    second_end = %definition.term_end_hex,
                    "duplicate definition start marker, moving start onto end marker"
                );
                table.collisions += 1;
                definition.term_start_hex = definition.term_end_hex;

                if let Some(previous) = table.definitions.get(&definition.term_start_hex) {
                    warn!(
                        term_start_hex = %definition.term_start_hex,
                        replaced_id = previous.id,
                        id = definition.id,
                        "definition still collides after moving, replacing earlier entry"
                    );
                    table.overwrites += 1;
                }
            }

            for marker in &definition.references {
                table.references.insert(
                    marker.reference_start_hex,
                    ResolvedReference {
                        marker: *marker,
                        term_start_hex: definition.term_start_hex,
                    },
                );
            }

            table
                .definitions
                .insert(definition.term_start_hex, definition);
        }

        info!(
            definitions = table.definitions.len(),
            references = table.references.len(),
            collisions = table.collisions,
            "term table built"
        );
        table
    }

    /// Definition starting at `hex`
    #[inline]
    #[must_use]
    pub fn definition(&self, hex: ColorHex) -> Option<&Definition> {
        self.definitions.get(&hex)
    }

    /// Reference starting at `hex`
    #[inline]
    #[must_use]
    pub fn reference(&self, hex: ColorHex) -> Option<&ResolvedReference> {
        self.references.get(&hex)
    }

    /// Number of indexed definitions
    #[inline]
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Number of indexed references
    #[inline]
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Start marker collisions seen while building
    #[inline]
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Definitions dropped because they collided even after moving
    #[inline]
    #[must_use]
    pub fn overwrites(&self) -> usize {
        self.overwrites
    }

    /// Whether the table has no definitions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hex(value: u32) -> ColorHex {
        ColorHex::new(value).unwrap()
    }

    #[test]
    fn build_indexes_definitions_and_references() {
        let table = TermTable::build([
            Definition::new(1, "alpha", hex(0x200), hex(0x201)).with_reference(hex(0x400), hex(0x401)),
            Definition::new(2, "beta", hex(0x202), hex(0x202)),
        ]);

        assert_eq!(table.definition_count(), 2);
        assert_eq!(table.reference_count(), 1);
        assert_eq!(table.definition(hex(0x200)).unwrap().name, "alpha");
        let reference = table.reference(hex(0x400)).unwrap();
        assert_eq!(reference.term_start_hex, hex(0x200));
        assert_eq!(reference.marker.reference_end_hex, hex(0x401));
        assert_eq!(table.collisions(), 0);
    }

    #[test]
    fn collision_moves_later_definition_to_end_marker() {
        let table = TermTable::build([
            Definition::new(1, "first", hex(0x200), hex(0x201)),
            Definition::new(2, "second", hex(0x200), hex(0x203)).with_reference(hex(0x600), hex(0x600)),
        ]);

        assert_eq!(table.collisions(), 1);
        assert_eq!(table.overwrites(), 0);
        assert_eq!(table.definition(hex(0x200)).unwrap().name, "first");
        let second = table.definition(hex(0x203)).unwrap();
        assert_eq!(second.name, "second");
        assert_eq!(second.term_start_hex, second.term_end_hex);
        // references follow the moved start marker
        assert_eq!(table.reference(hex(0x600)).unwrap().term_start_hex, hex(0x203));
    }

    #[test]
    fn double_collision_overwrites() {
        let table = TermTable::build([
            Definition::new(1, "a", hex(0x200), hex(0x205)),
            Definition::new(2, "b", hex(0x205), hex(0x205)),
            Definition::new(3, "c", hex(0x200), hex(0x205)),
        ]);
        assert_eq!(table.collisions(), 1);
        assert_eq!(table.overwrites(), 1);
        assert_eq!(table.definition(hex(0x205)).unwrap().name, "c");
    }

    #[test]
    fn term_file_sorts_by_id() {
        let json = r#"[
            {"id": 7, "name": "later", "termStartHex": "000200", "termEndHex": "000201"},
            {"id": 3, "name": "earlier", "termStartHex": "000200", "termEndHex": "000202",
             "references": [{"referenceStartHex": "000400", "referenceEndHex": "000401"}]}
        ]"#;
        let file = TermFile::from_json(json).unwrap();
        let names: Vec<_> = file.definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["earlier", "later"]);
        assert_eq!(file.definitions()[0].references.len(), 1);

        // the earlier id wins the shared start marker
        let table = TermTable::build(file.into_definitions());
        assert_eq!(table.definition(hex(0x200)).unwrap().name, "earlier");
        assert_eq!(table.definition(hex(0x201)).unwrap().name, "later");
    }

    #[test]
    fn term_file_rejects_invalid_markers() {
        let json = r#"[{"id": 1, "name": "bad", "termStartHex": "0002", "termEndHex": "000201"}]"#;
        let err = TermFile::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            TermError::InvalidMarker { id: 1, field: "termStartHex", .. }
        ));

        let json = r#"[{"id": 1, "name": "bad", "termStartHex": "000200", "termEndHex": "000201",
            "references": [{"referenceStartHex": "000400", "referenceEndHex": "nothex"}]}]"#;
        assert!(matches!(
            TermFile::from_json(json),
            Err(TermError::InvalidMarker { field: "referenceEndHex", .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TermFile::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TermError::Io { .. }));
    }
}
