//! Action selection over a state's value vector

use smartcab_core::Action;

use crate::q_table::ActionValues;

/// Picks an action from a vector of action values
pub trait Policy {
    fn select(&self, values: &ActionValues) -> Action;
}

/// Always takes the highest-valued action
///
/// There is no exploration step. Whatever exploration happens comes from
/// the random priors the table starts with, so state/action pairs whose
/// prior loses every tie-break early may never be tried.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn select(&self, values: &ActionValues) -> Action {
        Action::from_index(greedy_index(values)).unwrap_or_default()
    }
}

/// Index of the maximum value; ties go to the lowest index
///
/// `Iterator::max_by` would return the last of equal elements, so the scan
/// only moves on a strictly greater value.
pub fn greedy_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}
