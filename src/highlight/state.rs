use serde::{Deserialize, Serialize};

use crate::corpus::{Coordinate, SectionLayout};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum HighlightState {
    #[default]
    Idle,
    Highlighting { coordinate: Coordinate },
}

impl HighlightState {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            HighlightState::Idle => None,
            HighlightState::Highlighting { coordinate } => Some(*coordinate),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, HighlightState::Idle)
    }

    /// One timer step. Walking off the end of the layout, or holding a
    /// coordinate the layout no longer contains, lands in `Idle`.
    pub fn advance(self, layout: &SectionLayout) -> HighlightState {
        self.coordinate()
            .and_then(|coordinate| layout.next_after(coordinate))
            .map_or(HighlightState::Idle, |coordinate| {
                HighlightState::Highlighting { coordinate }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(section_index: usize, item_index: usize) -> HighlightState {
        HighlightState::Highlighting {
            coordinate: Coordinate::new(section_index, item_index),
        }
    }

    #[test]
    fn defaults_to_idle() {
        let state = HighlightState::default();
        assert!(state.is_idle());
        assert_eq!(state.coordinate(), None);
    }

    #[test]
    fn idle_stays_idle() {
        let layout = SectionLayout::new(vec![3]);
        assert_eq!(HighlightState::Idle.advance(&layout), HighlightState::Idle);
    }

    #[test]
    fn crosses_into_first_item_of_next_section() {
        let layout = SectionLayout::new(vec![2, 1, 3]);
        assert_eq!(at(0, 1).advance(&layout), at(1, 0));
        assert_eq!(at(1, 0).advance(&layout), at(2, 0));
    }

    #[test]
    fn last_item_goes_idle() {
        let layout = SectionLayout::new(vec![2, 1, 3]);
        assert!(at(2, 2).advance(&layout).is_idle());
    }

    #[test]
    fn coordinate_outside_replaced_layout_goes_idle() {
        let layout = SectionLayout::new(vec![1]);
        assert!(at(4, 7).advance(&layout).is_idle());
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(at(1, 2)).unwrap();
        assert_eq!(json["status"], "highlighting");
        assert_eq!(json["coordinate"]["itemIndex"], 2);
    }
}
