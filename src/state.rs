//! Toolbar button interaction states.

use serde::{Deserialize, Serialize};

/// One of the three states a toolbar button renders.
///
/// The declaration order is the left-to-right tile order in a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ButtonState {
    Normal,
    Hover,
    Active,
}

impl ButtonState {
    /// All states in sprite-sheet order.
    pub const ALL: [ButtonState; 3] = [Self::Normal, Self::Hover, Self::Active];

    /// Zero-based tile index within a sprite sheet.
    pub fn index(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Hover => 1,
            Self::Active => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hover => "hover",
            Self::Active => "active",
        }
    }
}

/// One value per button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct StateSet<T> {
    pub normal: T,
    pub hover: T,
    pub active: T,
}

impl<T> StateSet<T> {
    pub fn new(normal: T, hover: T, active: T) -> Self {
        Self {
            normal,
            hover,
            active,
        }
    }

    /// Returns the value for a state.
    pub fn get(&self, state: ButtonState) -> &T {
        match state {
            ButtonState::Normal => &self.normal,
            ButtonState::Hover => &self.hover,
            ButtonState::Active => &self.active,
        }
    }

    /// Returns a mutable reference to the value for a state.
    pub fn get_mut(&mut self, state: ButtonState) -> &mut T {
        match state {
            ButtonState::Normal => &mut self.normal,
            ButtonState::Hover => &mut self.hover,
            ButtonState::Active => &mut self.active,
        }
    }

    pub fn each_ref(&self) -> StateSet<&T> {
        StateSet::new(&self.normal, &self.hover, &self.active)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> StateSet<U> {
        StateSet::new(f(self.normal), f(self.hover), f(self.active))
    }

    /// Iterates values in sprite-sheet order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.normal, &self.hover, &self.active].into_iter()
    }
}

impl<T> StateSet<Option<T>> {
    /// Returns `Some` only if all three states hold a value.
    pub fn transpose(self) -> Option<StateSet<T>> {
        Some(StateSet::new(self.normal?, self.hover?, self.active?))
    }
}

impl<T> IntoIterator for StateSet<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 3>;

    fn into_iter(self) -> Self::IntoIter {
        [self.normal, self.hover, self.active].into_iter()
    }
}
