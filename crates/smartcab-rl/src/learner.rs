//! One-step bootstrapped value update

use serde::{Deserialize, Serialize};
use tracing::warn;

use smartcab_core::{Action, Reward, StateKey};

use crate::q_table::QTable;

/// Learning hyperparameters, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningParams {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.2,
        }
    }
}

/// A single (s, a, r, s') interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub reward: Reward,
    pub next_state: StateKey,
}

/// Applies `Q(s,a) <- (1 - α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))`
#[derive(Debug, Clone, Copy, Default)]
pub struct Learner {
    params: LearningParams,
}

impl Learner {
    pub fn new(params: LearningParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> LearningParams {
        self.params
    }

    /// Blend a current estimate with the bootstrapped target
    pub fn blend(&self, current: f64, reward: Reward, next_max: f64) -> f64 {
        let LearningParams { alpha, gamma } = self.params;
        (1.0 - alpha) * current + alpha * (reward + gamma * next_max)
    }

    /// Update the slot for `transition.action` in `transition.state` and
    /// return the new value. No other slot is written.
    pub fn update(&self, table: &mut QTable, transition: &Transition) -> f64 {
        let current = table.value(transition.state, transition.action);
        let next_max = table.max_value(transition.next_state);
        let updated = self.blend(current, transition.reward, next_max);
        if !updated.is_finite() {
            warn!(
                state = %transition.state,
                action = %transition.action,
                reward = transition.reward,
                "Learner.update(): non-finite Q-value"
            );
        }
        table.set(transition.state, transition.action, updated);
        updated
    }
}
