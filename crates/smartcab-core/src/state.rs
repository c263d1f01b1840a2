//! Discrete state key for the tabular agent

use serde::{Deserialize, Serialize};

use crate::types::{Action, Direction, Light};

/// Decision state: (waypoint, light, oncoming)
///
/// Every combination has a dense index in `0..StateKey::COUNT`, so tables
/// keyed by state can be fixed-size arrays that never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub waypoint: Direction,
    pub light: Light,
    pub oncoming: Action,
}

impl StateKey {
    /// Size of the state space: 3 waypoints x 2 lights x 4 oncoming actions
    pub const COUNT: usize = Direction::ALL.len() * Light::ALL.len() * Action::COUNT;

    pub fn new(waypoint: Direction, light: Light, oncoming: Action) -> Self {
        Self {
            waypoint,
            light,
            oncoming,
        }
    }

    /// Dense index of this state
    pub fn index(self) -> usize {
        (self.waypoint.index() * Light::ALL.len() + self.light.index()) * Action::COUNT
            + self.oncoming.index()
    }

    /// Inverse of [`StateKey::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::COUNT {
            return None;
        }
        let oncoming = Action::ALL[index % Action::COUNT];
        let rest = index / Action::COUNT;
        let light = Light::ALL[rest % Light::ALL.len()];
        let waypoint = Direction::ALL[rest / Light::ALL.len()];
        Some(Self::new(waypoint, light, oncoming))
    }

    /// Every state in index order
    pub fn all() -> impl Iterator<Item = StateKey> {
        Direction::ALL.into_iter().flat_map(|waypoint| {
            Light::ALL.into_iter().flat_map(move |light| {
                Action::ALL
                    .into_iter()
                    .map(move |oncoming| StateKey::new(waypoint, light, oncoming))
            })
        })
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.waypoint, self.light, self.oncoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_space_size() {
        assert_eq!(StateKey::COUNT, 24);
        assert_eq!(StateKey::all().count(), 24);
    }

    #[test]
    fn test_all_yields_index_order() {
        for (i, state) in StateKey::all().enumerate() {
            assert_eq!(state.index(), i);
        }
    }

    #[test]
    fn test_index_is_bijective() {
        let indices: HashSet<usize> = StateKey::all().map(StateKey::index).collect();
        assert_eq!(indices.len(), StateKey::COUNT);

        for i in 0..StateKey::COUNT {
            let state = StateKey::from_index(i).unwrap();
            assert_eq!(state.index(), i);
        }
        assert!(StateKey::from_index(StateKey::COUNT).is_none());
    }

    #[test]
    fn test_display() {
        let state = StateKey::new(Direction::Left, Light::Green, Action::None);
        assert_eq!(state.to_string(), "(left, green, none)");
    }
}
