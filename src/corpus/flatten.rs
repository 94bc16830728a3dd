//! Linear view of a corpus for list rendering.
//!
//! The view borrows from the corpus it was built from, so it cannot outlive a
//! reload: a new corpus means calling [`flatten`] again.

use super::{Coordinate, Corpus, Item, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatNode<'a> {
    SectionHeader {
        section_index: usize,
        section: &'a Section,
    },
    Item {
        section_index: usize,
        item_index: usize,
        item: &'a Item,
    },
}

impl FlatNode<'_> {
    /// Stable rendering key. Section and item ids come from different
    /// numbering domains, so the prefix keeps them apart.
    pub fn key(&self) -> String {
        match self {
            FlatNode::SectionHeader { section, .. } => format!("section-{}", section.id),
            FlatNode::Item { item, .. } => format!("item-{}", item.id),
        }
    }

    pub fn section_index(&self) -> usize {
        match self {
            FlatNode::SectionHeader { section_index, .. }
            | FlatNode::Item { section_index, .. } => *section_index,
        }
    }

    /// Headers are not selectable and have no coordinate.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            FlatNode::SectionHeader { .. } => None,
            FlatNode::Item {
                section_index,
                item_index,
                ..
            } => Some(Coordinate::new(*section_index, *item_index)),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, FlatNode::SectionHeader { .. })
    }
}

/// Header first, then that section's items, for every section in order.
pub fn flatten(corpus: &Corpus) -> Vec<FlatNode<'_>> {
    let mut nodes = Vec::with_capacity(corpus.sections().len() + corpus.item_count());

    for (section_index, section) in corpus.sections().iter().enumerate() {
        nodes.push(FlatNode::SectionHeader {
            section_index,
            section,
        });
        nodes.extend(
            section
                .items
                .iter()
                .enumerate()
                .map(|(item_index, item)| FlatNode::Item {
                    section_index,
                    item_index,
                    item,
                }),
        );
    }

    nodes
}

/// Row index of the item at `coordinate`, for scrolling the list to it.
pub fn position_of(nodes: &[FlatNode<'_>], coordinate: Coordinate) -> Option<usize> {
    nodes
        .iter()
        .position(|node| node.coordinate() == Some(coordinate))
}
