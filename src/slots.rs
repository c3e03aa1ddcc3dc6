//! Manual-mode image slots.
//!
//! Manual mode holds up to six images, one per (section, state) pair. Moving
//! an image between two slots of the same section swaps them; moving it into
//! the other section copies it and leaves the source in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::{ButtonState, StateSet};

/// OFF or ON half of a toggle icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Off,
    On,
}

/// One of the six manual image slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ManualSlot {
    OffNormal,
    OffHover,
    OffActive,
    OnNormal,
    OnHover,
    OnActive,
}

impl ManualSlot {
    pub const ALL: [ManualSlot; 6] = [
        Self::OffNormal,
        Self::OffHover,
        Self::OffActive,
        Self::OnNormal,
        Self::OnHover,
        Self::OnActive,
    ];

    pub fn new(section: Section, state: ButtonState) -> Self {
        match (section, state) {
            (Section::Off, ButtonState::Normal) => Self::OffNormal,
            (Section::Off, ButtonState::Hover) => Self::OffHover,
            (Section::Off, ButtonState::Active) => Self::OffActive,
            (Section::On, ButtonState::Normal) => Self::OnNormal,
            (Section::On, ButtonState::Hover) => Self::OnHover,
            (Section::On, ButtonState::Active) => Self::OnActive,
        }
    }

    pub fn section(self) -> Section {
        match self {
            Self::OffNormal | Self::OffHover | Self::OffActive => Section::Off,
            Self::OnNormal | Self::OnHover | Self::OnActive => Section::On,
        }
    }

    pub fn state(self) -> ButtonState {
        match self {
            Self::OffNormal | Self::OnNormal => ButtonState::Normal,
            Self::OffHover | Self::OnHover => ButtonState::Hover,
            Self::OffActive | Self::OnActive => ButtonState::Active,
        }
    }

    /// Stable identifier, e.g. `off_normal`.
    pub fn id(self) -> &'static str {
        match self {
            Self::OffNormal => "off_normal",
            Self::OffHover => "off_hover",
            Self::OffActive => "off_active",
            Self::OnNormal => "on_normal",
            Self::OnHover => "on_hover",
            Self::OnActive => "on_active",
        }
    }

    /// Parses an identifier as produced by [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.id() == id)
    }
}

/// Six optional images keyed by [`ManualSlot`], plus a selected slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBoard<T> {
    images: HashMap<ManualSlot, T>,
    selected: Option<ManualSlot>,
}

impl<T> Default for SlotBoard<T> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
            selected: None,
        }
    }
}

impl<T> SlotBoard<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ManualSlot) -> Option<&T> {
        self.images.get(&slot)
    }

    /// Stores an image in a slot, returning the one it replaced.
    pub fn set(&mut self, slot: ManualSlot, image: T) -> Option<T> {
        self.images.insert(slot, image)
    }

    /// Empties a slot, returning its image.
    pub fn clear(&mut self, slot: ManualSlot) -> Option<T> {
        self.images.remove(&slot)
    }

    pub fn is_filled(&self, slot: ManualSlot) -> bool {
        self.images.contains_key(&slot)
    }

    pub fn filled_count(&self) -> usize {
        self.images.len()
    }

    pub fn selected(&self) -> Option<ManualSlot> {
        self.selected
    }

    pub fn select(&mut self, slot: Option<ManualSlot>) {
        self.selected = slot;
    }

    /// Clears the selected slot and the selection itself.
    pub fn delete_selected(&mut self) -> Option<T> {
        let slot = self.selected.take()?;
        self.clear(slot)
    }

    /// Returns the three images of a section, only if all are present.
    pub fn section(&self, section: Section) -> Option<StateSet<&T>> {
        StateSet::new(
            self.get(ManualSlot::new(section, ButtonState::Normal)),
            self.get(ManualSlot::new(section, ButtonState::Hover)),
            self.get(ManualSlot::new(section, ButtonState::Active)),
        )
        .transpose()
    }

    /// Returns true if every slot of the section is filled.
    pub fn is_section_complete(&self, section: Section) -> bool {
        self.section(section).is_some()
    }
}

impl<T: Clone> SlotBoard<T> {
    /// Moves an image from one slot to another.
    ///
    /// Within a section the two slots swap contents (an empty slot swaps as
    /// empty). Across sections the source image is copied into the
    /// destination and the source keeps its image; moving from an empty slot
    /// across sections clears the destination.
    pub fn move_image(&mut self, from: ManualSlot, to: ManualSlot) {
        if from == to {
            return;
        }

        if from.section() == to.section() {
            let source = self.images.remove(&from);
            let dest = self.images.remove(&to);
            if let Some(image) = dest {
                self.images.insert(from, image);
            }
            if let Some(image) = source {
                self.images.insert(to, image);
            }
        } else {
            match self.images.get(&from).cloned() {
                Some(image) => {
                    self.images.insert(to, image);
                }
                None => {
                    self.images.remove(&to);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_roles() {
        for slot in ManualSlot::ALL {
            assert_eq!(ManualSlot::new(slot.section(), slot.state()), slot);
            assert_eq!(ManualSlot::from_id(slot.id()), Some(slot));
        }
        assert_eq!(ManualSlot::from_id("sideways"), None);
    }

    #[test]
    fn same_section_move_swaps() {
        let mut board = SlotBoard::new();
        board.set(ManualSlot::OffNormal, "a");
        board.set(ManualSlot::OffActive, "b");

        board.move_image(ManualSlot::OffNormal, ManualSlot::OffActive);
        assert_eq!(board.get(ManualSlot::OffNormal), Some(&"b"));
        assert_eq!(board.get(ManualSlot::OffActive), Some(&"a"));
    }

    #[test]
    fn same_section_move_into_empty_slot() {
        let mut board = SlotBoard::new();
        board.set(ManualSlot::OnHover, "a");

        board.move_image(ManualSlot::OnHover, ManualSlot::OnNormal);
        assert_eq!(board.get(ManualSlot::OnHover), None);
        assert_eq!(board.get(ManualSlot::OnNormal), Some(&"a"));
    }

    #[test]
    fn cross_section_move_copies() {
        let mut board = SlotBoard::new();
        board.set(ManualSlot::OffHover, "a");
        board.set(ManualSlot::OnHover, "b");

        board.move_image(ManualSlot::OffHover, ManualSlot::OnHover);
        assert_eq!(board.get(ManualSlot::OffHover), Some(&"a"));
        assert_eq!(board.get(ManualSlot::OnHover), Some(&"a"));
    }

    #[test]
    fn delete_selected_clears_slot_and_selection() {
        let mut board = SlotBoard::new();
        board.set(ManualSlot::OffActive, 7);
        board.select(Some(ManualSlot::OffActive));

        assert_eq!(board.delete_selected(), Some(7));
        assert!(!board.is_filled(ManualSlot::OffActive));
        assert_eq!(board.selected(), None);
        assert_eq!(board.delete_selected(), None);
    }

    #[test]
    fn section_requires_all_three() {
        let mut board = SlotBoard::new();
        board.set(ManualSlot::OffNormal, 1);
        board.set(ManualSlot::OffHover, 2);
        assert!(!board.is_section_complete(Section::Off));

        board.set(ManualSlot::OffActive, 3);
        let off = board.section(Section::Off).unwrap();
        assert_eq!((*off.normal, *off.hover, *off.active), (1, 2, 3));
        assert!(board.section(Section::On).is_none());
    }

    #[test]
    fn slot_ids_serialize_snake_case() {
        let json = serde_json::to_string(&ManualSlot::OnActive).unwrap();
        assert_eq!(json, "\"on_active\"");
    }
}
