use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

use super::Coordinate;

/// One verse. Field names follow the upstream API so the cached JSON and the
/// network payload share a single shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(rename = "number")]
    pub id: u32,
    #[serde(rename = "numberInSurah")]
    pub ordinal_in_section: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    #[serde(rename = "number")]
    pub id: u32,
    #[serde(rename = "englishName")]
    pub title: String,
    /// Title in the original script, when the source provides one.
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    #[serde(rename = "ayahs")]
    pub items: Vec<Item>,
}

/// The full ordered collection of sections. Never mutated after load; a
/// reload produces a new `Corpus`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Corpus {
    sections: Vec<Section>,
}

impl Corpus {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    pub fn item(&self, coordinate: Coordinate) -> Option<&Item> {
        self.sections
            .get(coordinate.section_index)?
            .items
            .get(coordinate.item_index)
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.item(coordinate).is_some()
    }

    /// Checks the structural guarantees the rest of the crate relies on:
    /// non-empty sections, unique ids and contiguous 1-based ordinals.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.sections.is_empty() {
            return Err(LoadError::Format("corpus has no sections".into()));
        }

        let mut section_ids = HashSet::new();
        let mut item_ids = HashSet::new();

        for section in &self.sections {
            if !section_ids.insert(section.id) {
                return Err(LoadError::Format(format!(
                    "duplicate section id {}",
                    section.id
                )));
            }
            if section.items.is_empty() {
                return Err(LoadError::Format(format!(
                    "section {} has no items",
                    section.id
                )));
            }

            for (index, item) in section.items.iter().enumerate() {
                if !item_ids.insert(item.id) {
                    return Err(LoadError::Format(format!("duplicate item id {}", item.id)));
                }
                let expected = index as u32 + 1;
                if item.ordinal_in_section != expected {
                    return Err(LoadError::Format(format!(
                        "section {} item {} has ordinal {}, expected {}",
                        section.id, item.id, item.ordinal_in_section, expected
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: u32, first_item: u32, len: u32) -> Section {
        Section {
            id,
            title: format!("Section {id}"),
            native_name: None,
            items: (0..len)
                .map(|offset| Item {
                    id: first_item + offset,
                    ordinal_in_section: offset + 1,
                    text: format!("text {}", first_item + offset),
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_well_formed_corpus() {
        let corpus = Corpus::new(vec![section(1, 1, 2), section(2, 3, 1)]);
        assert!(corpus.validate().is_ok());
        assert_eq!(corpus.item_count(), 3);
    }

    #[test]
    fn rejects_empty_section() {
        let corpus = Corpus::new(vec![section(1, 1, 2), section(2, 3, 0)]);
        let err = corpus.validate().unwrap_err();
        assert!(matches!(err, LoadError::Format(msg) if msg.contains("section 2")));
    }

    #[test]
    fn rejects_empty_corpus() {
        assert!(Corpus::default().validate().is_err());
    }

    #[test]
    fn rejects_duplicate_item_ids_across_sections() {
        let corpus = Corpus::new(vec![section(1, 1, 2), section(2, 2, 2)]);
        assert!(matches!(corpus.validate(), Err(LoadError::Format(_))));
    }

    #[test]
    fn rejects_gap_in_ordinals() {
        let mut broken = section(1, 1, 3);
        broken.items[2].ordinal_in_section = 5;
        assert!(Corpus::new(vec![broken]).validate().is_err());
    }

    #[test]
    fn reads_upstream_field_names() {
        let raw = r#"[{"number":1,"name":"الفاتحة","englishName":"Al-Faatiha",
            "revelationType":"Meccan",
            "ayahs":[{"number":1,"numberInSurah":1,"text":"In the name of God","juz":1}]}]"#;
        let corpus = Corpus::from_json(raw).unwrap();

        assert_eq!(corpus.sections()[0].title, "Al-Faatiha");
        assert_eq!(corpus.sections()[0].native_name.as_deref(), Some("الفاتحة"));
        assert_eq!(corpus.sections()[0].items[0].ordinal_in_section, 1);
    }

    #[test]
    fn cached_json_reads_back_identically() {
        let corpus = Corpus::new(vec![section(7, 10, 3)]);
        let raw = corpus.to_json().unwrap();
        assert!(raw.contains("\"englishName\""));
        assert_eq!(Corpus::from_json(&raw).unwrap(), corpus);
    }
}
