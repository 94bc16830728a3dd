use serde::{Deserialize, Serialize};

use super::Corpus;

/// Position of one item: which section, and which item inside it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub section_index: usize,
    pub item_index: usize,
}

impl Coordinate {
    pub const fn new(section_index: usize, item_index: usize) -> Self {
        Self {
            section_index,
            item_index,
        }
    }
}

/// Item count of every section, in order. This is all the highlight
/// scheduler needs to know about a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLayout {
    item_counts: Vec<usize>,
}

impl SectionLayout {
    pub fn new(item_counts: Vec<usize>) -> Self {
        Self { item_counts }
    }

    pub fn section_count(&self) -> usize {
        self.item_counts.len()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.item_counts
            .get(coordinate.section_index)
            .is_some_and(|&count| coordinate.item_index < count)
    }

    /// The coordinate that follows `coordinate` in reading order, crossing
    /// into the first item of the next non-empty section when needed.
    /// `None` past the last item, or when `coordinate` is not in this layout.
    pub fn next_after(&self, coordinate: Coordinate) -> Option<Coordinate> {
        if !self.contains(coordinate) {
            return None;
        }

        let next_item = coordinate.item_index + 1;
        if next_item < self.item_counts[coordinate.section_index] {
            return Some(Coordinate::new(coordinate.section_index, next_item));
        }

        // Validated corpora never contain empty sections; skipping them keeps
        // the walk total for layouts built by hand.
        self.item_counts
            .iter()
            .enumerate()
            .skip(coordinate.section_index + 1)
            .find(|(_, &count)| count > 0)
            .map(|(section_index, _)| Coordinate::new(section_index, 0))
    }
}

impl From<&Corpus> for SectionLayout {
    fn from(corpus: &Corpus) -> Self {
        Self::new(
            corpus
                .sections()
                .iter()
                .map(|section| section.items.len())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_across_section_boundaries() {
        let layout = SectionLayout::new(vec![2, 1, 3]);
        let mut seen = vec![Coordinate::new(0, 0)];
        while let Some(next) = layout.next_after(*seen.last().unwrap()) {
            seen.push(next);
        }

        let expected: Vec<_> = [(0, 0), (0, 1), (1, 0), (2, 0), (2, 1), (2, 2)]
            .into_iter()
            .map(|(s, i)| Coordinate::new(s, i))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn out_of_range_coordinate_has_no_successor() {
        let layout = SectionLayout::new(vec![2]);
        assert_eq!(layout.next_after(Coordinate::new(0, 2)), None);
        assert_eq!(layout.next_after(Coordinate::new(3, 0)), None);
    }

    #[test]
    fn skips_empty_sections() {
        let layout = SectionLayout::new(vec![1, 0, 1]);
        assert_eq!(
            layout.next_after(Coordinate::new(0, 0)),
            Some(Coordinate::new(2, 0))
        );
    }
}
