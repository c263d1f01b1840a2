//! Percept to state mapping

use smartcab_core::{Direction, Percept, StateKey};

/// Maps raw percepts onto the discrete decision state
///
/// Only the waypoint, the light, and the oncoming vehicle are kept. Traffic
/// from the left and right is dropped to keep the table at 24 states, even
/// though it matters for some right-on-red and left-turn collisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEncoder;

impl StateEncoder {
    pub fn encode(waypoint: Direction, percept: &Percept) -> StateKey {
        StateKey::new(waypoint, percept.light, percept.oncoming)
    }
}
