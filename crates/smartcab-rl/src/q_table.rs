//! Action-value table over the full state space

use rand::Rng;
use serde::{Deserialize, Serialize};

use smartcab_core::{Action, StateKey};

/// One estimate per action, in [`Action::ALL`] order
pub type ActionValues = [f64; Action::COUNT];

/// Q-table with an entry for every [`StateKey`]
///
/// Entries are created up front and only ever mutated in place, so lookups
/// cannot miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: [ActionValues; StateKey::COUNT],
}

/// Named view of a single table row, used for dumps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QEntry {
    pub state: StateKey,
    pub values: ActionValues,
}

impl QTable {
    /// Table with independent uniform priors in [0, 1) for every slot
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = [[0.0; Action::COUNT]; StateKey::COUNT];
        for row in &mut values {
            for slot in row.iter_mut() {
                *slot = rng.gen::<f64>();
            }
        }
        Self { values }
    }

    /// Table with every slot set to `value`
    pub fn filled(value: f64) -> Self {
        Self {
            values: [[value; Action::COUNT]; StateKey::COUNT],
        }
    }

    pub fn values(&self, state: StateKey) -> &ActionValues {
        &self.values[state.index()]
    }

    pub fn set_values(&mut self, state: StateKey, values: ActionValues) {
        self.values[state.index()] = values;
    }

    pub fn value(&self, state: StateKey, action: Action) -> f64 {
        self.values[state.index()][action.index()]
    }

    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.values[state.index()][action.index()] = value;
    }

    /// Best estimate available from `state`
    pub fn max_value(&self, state: StateKey) -> f64 {
        self.values(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of states held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows in state index order
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, &ActionValues)> {
        StateKey::all().zip(self.values.iter())
    }

    /// True when no estimate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.values.iter().flatten().all(|v| v.is_finite())
    }

    pub fn entries(&self) -> Vec<QEntry> {
        self.iter()
            .map(|(state, values)| QEntry {
                state,
                values: *values,
            })
            .collect()
    }
}
